use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use super::extract::ApiJson;
use super::reorder;
use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::db::{self, projects::ProjectFilter, OrderedCollection};
use crate::errors::{map_db_error, ServerError};
use crate::models::{now_timestamp, Project, ProjectInput, ProjectListQuery, ReorderResponse};

const NOT_FOUND: &str = "Project not found";

pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<Vec<Project>>, ServerError> {
    let filter = ProjectFilter {
        category: query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        featured: query.featured_filter(),
    };
    let rows = db::projects::list(&state.pool, filter)
        .await
        .map_err(|e| map_db_error(e, "project list failed"))?;
    Ok(Json(rows))
}

pub async fn get_project(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<Project>, ServerError> {
    db::projects::get(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(e, "project load failed"))?
        .map(Json)
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))
}

pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), ServerError> {
    require_admin(&state, &headers)?;

    let order = reorder::next_order(&state, OrderedCollection::Projects).await?;
    let project = Project::create(payload, now_timestamp(), order)?;
    db::projects::insert(&state.pool, &project)
        .await
        .map_err(|e| map_db_error(e, "project already exists"))?;

    tracing::info!(id = %project.id, title = %project.title, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    ApiJson(payload): ApiJson<ProjectInput>,
) -> Result<Json<Project>, ServerError> {
    require_admin(&state, &headers)?;

    let mut project = db::projects::get(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(e, "project load failed"))?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;
    project.apply(payload, now_timestamp())?;

    let updated = db::projects::update(&state.pool, &project)
        .await
        .map_err(|e| map_db_error(e, "project update failed"))?;
    if updated == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let deleted = db::delete_by_id(&state.pool, OrderedCollection::Projects.table(), &id)
        .await
        .map_err(|e| map_db_error(e, "project delete failed"))?;
    if deleted == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    tracing::info!(id = %id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ReorderResponse<Project>>, ServerError> {
    require_admin(&state, &headers)?;

    if !reorder::apply_payload(&state, OrderedCollection::Projects, &payload).await? {
        return Ok(Json(ReorderResponse::skipped()));
    }
    let rows = db::projects::list(&state.pool, ProjectFilter::default())
        .await
        .map_err(|e| map_db_error(e, "project list failed"))?;
    Ok(Json(ReorderResponse::Applied(rows)))
}
