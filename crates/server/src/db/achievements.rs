use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::ts;
use crate::models::Achievement;

const COLUMNS: &str = "id, title, description, issued_by, date, link, category, sort_order, \
                       created_at, updated_at";

/// Manual order first, then most recent date. Undated entries sort last.
pub async fn list(pool: &SqlitePool, category: Option<&str>) -> Result<Vec<Achievement>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM achievements"));
    if let Some(category) = category {
        qb.push(" WHERE category = ").push_bind(category.to_string());
    }
    qb.push(" ORDER BY sort_order ASC, date IS NULL, date DESC, created_at DESC");

    qb.build_query_as::<Achievement>().fetch_all(pool).await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Achievement>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM achievements WHERE id = ?1");
    sqlx::query_as::<_, Achievement>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, achievement: &Achievement) -> Result<(), sqlx::Error> {
    let query = format!("INSERT INTO achievements ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
    sqlx::query(&query)
        .bind(&achievement.id)
        .bind(&achievement.title)
        .bind(&achievement.description)
        .bind(&achievement.issued_by)
        .bind(achievement.date.as_ref().map(ts))
        .bind(&achievement.link)
        .bind(&achievement.category)
        .bind(achievement.order)
        .bind(ts(&achievement.created_at))
        .bind(ts(&achievement.updated_at))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, achievement: &Achievement) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE achievements SET title = ?, description = ?, issued_by = ?, date = ?, link = ?, \
         category = ?, sort_order = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&achievement.title)
    .bind(&achievement.description)
    .bind(&achievement.issued_by)
    .bind(achievement.date.as_ref().map(ts))
    .bind(&achievement.link)
    .bind(&achievement.category)
    .bind(achievement.order)
    .bind(ts(&achievement.updated_at))
    .bind(&achievement.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
