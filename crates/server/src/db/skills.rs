use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::ts;
use crate::models::Skill;

const COLUMNS: &str =
    "id, name, proficiency, category, icon_url, description, sort_order, created_at, updated_at";

pub async fn list(pool: &SqlitePool, category: Option<&str>) -> Result<Vec<Skill>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT {COLUMNS} FROM skills"));
    if let Some(category) = category {
        qb.push(" WHERE category = ").push_bind(category.to_string());
    }
    qb.push(" ORDER BY sort_order ASC, created_at DESC");

    qb.build_query_as::<Skill>().fetch_all(pool).await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Skill>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM skills WHERE id = ?1");
    sqlx::query_as::<_, Skill>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, skill: &Skill) -> Result<(), sqlx::Error> {
    let query = format!("INSERT INTO skills ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)");
    sqlx::query(&query)
        .bind(&skill.id)
        .bind(&skill.name)
        .bind(skill.proficiency)
        .bind(&skill.category)
        .bind(&skill.icon_url)
        .bind(&skill.description)
        .bind(skill.order)
        .bind(ts(&skill.created_at))
        .bind(ts(&skill.updated_at))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, skill: &Skill) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE skills SET name = ?, proficiency = ?, category = ?, icon_url = ?, \
         description = ?, sort_order = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&skill.name)
    .bind(skill.proficiency)
    .bind(&skill.category)
    .bind(&skill.icon_url)
    .bind(&skill.description)
    .bind(skill.order)
    .bind(ts(&skill.updated_at))
    .bind(&skill.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
