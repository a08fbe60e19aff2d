use sqlx::SqlitePool;

use super::ts;
use crate::models::EngineeringApproach;

const COLUMNS: &str = "id, title, points, sort_order, created_at, updated_at";

pub async fn list(pool: &SqlitePool) -> Result<Vec<EngineeringApproach>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM engineering_approaches ORDER BY sort_order ASC, created_at DESC"
    );
    sqlx::query_as::<_, EngineeringApproach>(&query)
        .fetch_all(pool)
        .await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<EngineeringApproach>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM engineering_approaches WHERE id = ?1");
    sqlx::query_as::<_, EngineeringApproach>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, approach: &EngineeringApproach) -> Result<(), sqlx::Error> {
    let query = format!("INSERT INTO engineering_approaches ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)");
    sqlx::query(&query)
        .bind(&approach.id)
        .bind(&approach.title)
        .bind(&approach.points)
        .bind(approach.order)
        .bind(ts(&approach.created_at))
        .bind(ts(&approach.updated_at))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, approach: &EngineeringApproach) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE engineering_approaches SET title = ?1, points = ?2, sort_order = ?3, \
         updated_at = ?4 WHERE id = ?5",
    )
    .bind(&approach.title)
    .bind(&approach.points)
    .bind(approach.order)
    .bind(ts(&approach.updated_at))
    .bind(&approach.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
