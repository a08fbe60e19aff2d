use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::ts;
use crate::models::{ContactMessage, ContactStatus};

const COLUMNS: &str = "id, name, email, subject, message, status, created_at, updated_at";
pub const TABLE: &str = "contact_messages";

pub async fn list(
    pool: &SqlitePool,
    status: Option<ContactStatus>,
) -> Result<Vec<ContactMessage>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM contact_messages"));
    if let Some(status) = status {
        qb.push(" WHERE status = ").push_bind(status);
    }
    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<ContactMessage>().fetch_all(pool).await
}

pub async fn insert(pool: &SqlitePool, message: &ContactMessage) -> Result<(), sqlx::Error> {
    let query = format!("INSERT INTO contact_messages ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)");
    sqlx::query(&query)
        .bind(&message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.status)
        .bind(ts(&message.created_at))
        .bind(ts(&message.updated_at))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_status(
    pool: &SqlitePool,
    id: &str,
    status: ContactStatus,
    now: DateTime<Utc>,
) -> Result<Option<ContactMessage>, sqlx::Error> {
    let query = format!(
        "UPDATE contact_messages SET status = ?1, updated_at = ?2 WHERE id = ?3 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ContactMessage>(&query)
        .bind(status)
        .bind(ts(&now))
        .bind(id)
        .fetch_optional(pool)
        .await
}
