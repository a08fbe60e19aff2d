pub mod achievements;
pub mod approaches;
pub mod contact;
pub mod profile;
pub mod projects;
pub mod skills;

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::{ConfigError, ServerConfig};
use crate::models::ReorderItem;

/// Collections that carry a manual `sort_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedCollection {
    Projects,
    Skills,
    Achievements,
    EngineeringApproaches,
}

impl OrderedCollection {
    pub fn table(self) -> &'static str {
        match self {
            OrderedCollection::Projects => "projects",
            OrderedCollection::Skills => "skills",
            OrderedCollection::Achievements => "achievements",
            OrderedCollection::EngineeringApproaches => "engineering_approaches",
        }
    }
}

const RESOURCE_TABLES: [&str; 6] = [
    "contact_messages",
    "engineering_approaches",
    "achievements",
    "skills",
    "projects",
    "profile",
];

pub async fn connect_db(config: &ServerConfig, config_path: &Path) -> Result<SqlitePool, ConfigError> {
    if config.database.sqlite_path.trim() == ":memory:" {
        return connect_memory()
            .await
            .map_err(|e| ConfigError::Invalid(format!("sqlite connect failed: {e}")));
    }

    let base_dir = config_path
        .parent()
        .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;

    let path = config.sqlite_path(base_dir);
    let url = format!("sqlite://{}", path.display());

    let options = SqliteConnectOptions::from_str(&url)
        .map_err(|e| ConfigError::Invalid(format!("invalid sqlite path: {e}")))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| ConfigError::Invalid(format!("sqlite connect failed: {e}")))?;

    tracing::info!(path = %path.display(), "sqlite connected");
    Ok(pool)
}

/// A private in-memory database. A single connection that never expires, since
/// every new in-memory connection would start empty.
pub async fn connect_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

pub async fn reset_server_data(pool: &SqlitePool) -> Result<(), ConfigError> {
    for table in RESOURCE_TABLES {
        let query = format!("DELETE FROM {}", quote_ident(table));

        sqlx::query(&query)
            .execute(pool)
            .await
            .map_err(|e| ConfigError::Invalid(format!("cleanup {table} failed: {e}")))?;
    }

    tracing::warn!("dev reset: all resource tables emptied");
    Ok(())
}

/// Sets `sort_order` for every listed id in one transaction. Ids that do not
/// exist are skipped.
pub async fn apply_reorder(
    pool: &SqlitePool,
    collection: OrderedCollection,
    items: &[ReorderItem],
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let stmt = format!(
        "UPDATE {} SET sort_order = ?1, updated_at = ?2 WHERE id = ?3",
        quote_ident(collection.table())
    );
    let updated_at = ts(&now);

    let mut tx = pool.begin().await?;
    let mut touched = 0;
    for item in items {
        touched += sqlx::query(&stmt)
            .bind(item.order)
            .bind(&updated_at)
            .bind(&item.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;

    tracing::debug!(table = collection.table(), requested = items.len(), touched, "reorder applied");
    Ok(touched)
}

pub async fn count(pool: &SqlitePool, collection: OrderedCollection) -> Result<i64, sqlx::Error> {
    let query = format!("SELECT COUNT(*) FROM {}", quote_ident(collection.table()));
    sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await
}

pub async fn delete_by_id(pool: &SqlitePool, table: &str, id: &str) -> Result<u64, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = ?1", quote_ident(table));
    Ok(sqlx::query(&query)
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected())
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
pub(crate) fn ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(ts(&a), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn quote_ident_escapes() {
        assert_eq!(quote_ident("skills"), "\"skills\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
