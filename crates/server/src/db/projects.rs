use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::ts;
use crate::models::Project;

const COLUMNS: &str = "id, title, description, long_description, technologies, images, \
                       github_link, live_link, category, featured, sort_order, problem, \
                       architecture, engineering_decisions, scaling_considerations, metrics, \
                       created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectFilter<'a> {
    pub category: Option<&'a str>,
    pub featured: Option<bool>,
}

pub async fn list(pool: &SqlitePool, filter: ProjectFilter<'_>) -> Result<Vec<Project>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT {COLUMNS} FROM projects WHERE 1 = 1"));

    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
    qb.push(" ORDER BY sort_order ASC, created_at DESC");

    qb.build_query_as::<Project>().fetch_all(pool).await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Project>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ?1");
    sqlx::query_as::<_, Project>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, project: &Project) -> Result<(), sqlx::Error> {
    let query = format!(
        "INSERT INTO projects ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    sqlx::query(&query)
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(&project.technologies)
        .bind(&project.images)
        .bind(&project.github_link)
        .bind(&project.live_link)
        .bind(project.category)
        .bind(project.featured)
        .bind(project.order)
        .bind(&project.problem)
        .bind(&project.architecture)
        .bind(&project.engineering_decisions)
        .bind(&project.scaling_considerations)
        .bind(&project.metrics)
        .bind(ts(&project.created_at))
        .bind(ts(&project.updated_at))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, project: &Project) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE projects SET title = ?, description = ?, long_description = ?, technologies = ?, \
         images = ?, github_link = ?, live_link = ?, category = ?, featured = ?, sort_order = ?, \
         problem = ?, architecture = ?, engineering_decisions = ?, scaling_considerations = ?, \
         metrics = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.long_description)
    .bind(&project.technologies)
    .bind(&project.images)
    .bind(&project.github_link)
    .bind(&project.live_link)
    .bind(project.category)
    .bind(project.featured)
    .bind(project.order)
    .bind(&project.problem)
    .bind(&project.architecture)
    .bind(&project.engineering_decisions)
    .bind(&project.scaling_considerations)
    .bind(&project.metrics)
    .bind(ts(&project.updated_at))
    .bind(&project.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
