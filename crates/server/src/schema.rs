use std::path::Path;

use sqlx::{Pool, Sqlite};
use tokio::fs;

use crate::config::ConfigError;

/// Compiled-in copy of `res/sql/sqlite/schema.sql`.
pub const SQLITE_SCHEMA: &str = include_str!("../res/sql/sqlite/schema.sql");

/// Applies `sql/sqlite/schema.sql` next to the config file. Every statement
/// is `IF NOT EXISTS`, so this runs on each start.
pub async fn apply_server_schema(pool: &Pool<Sqlite>, config_path: &Path) -> Result<(), ConfigError> {
    let base_dir = config_path
        .parent()
        .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;
    let schema_path = base_dir.join("sql").join("sqlite").join("schema.sql");

    let content = match fs::read_to_string(&schema_path).await {
        Ok(content) => content,
        Err(_) => {
            tracing::warn!(path = %schema_path.display(), "schema file missing, using built-in schema");
            SQLITE_SCHEMA.to_string()
        }
    };
    execute_schema_sqlite(pool, &content).await
}

pub async fn execute_schema_sqlite(pool: &Pool<Sqlite>, content: &str) -> Result<(), ConfigError> {
    let mut applied = 0usize;
    for stmt in content.split(';') {
        let trimmed = stmt.trim();
        if trimmed.is_empty() {
            continue;
        }
        sqlx::query(trimmed)
            .execute(pool)
            .await
            .map_err(|e| ConfigError::Invalid(format!("schema apply error: {e}")))?;
        applied += 1;
    }
    tracing::debug!(statements = applied, "schema applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;

    #[tokio::test]
    async fn schema_is_idempotent() {
        let pool = connect_memory().await.expect("pool");
        execute_schema_sqlite(&pool, SQLITE_SCHEMA).await.expect("first apply");
        execute_schema_sqlite(&pool, SQLITE_SCHEMA).await.expect("second apply");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("tables");
        assert_eq!(
            tables,
            vec![
                "achievements",
                "contact_messages",
                "engineering_approaches",
                "profile",
                "projects",
                "skills"
            ]
        );
    }
}
