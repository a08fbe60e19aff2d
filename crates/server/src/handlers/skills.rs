use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use super::extract::ApiJson;
use super::reorder;
use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::db::{self, OrderedCollection};
use crate::errors::{map_db_error, ServerError};
use crate::models::{now_timestamp, ReorderResponse, Skill, SkillInput, SkillListQuery};

const NOT_FOUND: &str = "Skill not found";

pub async fn list_skills(
    State(state): State<AppState>,
    Query(query): Query<SkillListQuery>,
) -> Result<Json<Vec<Skill>>, ServerError> {
    let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let rows = db::skills::list(&state.pool, category)
        .await
        .map_err(|e| map_db_error(e, "skill list failed"))?;
    Ok(Json(rows))
}

pub async fn create_skill(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<SkillInput>,
) -> Result<(StatusCode, Json<Skill>), ServerError> {
    require_admin(&state, &headers)?;

    let order = reorder::next_order(&state, OrderedCollection::Skills).await?;
    let skill = Skill::create(payload, now_timestamp(), order)?;
    db::skills::insert(&state.pool, &skill)
        .await
        .map_err(|e| map_db_error(e, "skill already exists"))?;

    tracing::info!(id = %skill.id, name = %skill.name, "skill created");
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    ApiJson(payload): ApiJson<SkillInput>,
) -> Result<Json<Skill>, ServerError> {
    require_admin(&state, &headers)?;

    let mut skill = db::skills::get(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(e, "skill load failed"))?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;
    skill.apply(payload, now_timestamp())?;

    if db::skills::update(&state.pool, &skill)
        .await
        .map_err(|e| map_db_error(e, "skill update failed"))?
        == 0
    {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(Json(skill))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let deleted = db::delete_by_id(&state.pool, OrderedCollection::Skills.table(), &id)
        .await
        .map_err(|e| map_db_error(e, "skill delete failed"))?;
    if deleted == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_skills(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ReorderResponse<Skill>>, ServerError> {
    require_admin(&state, &headers)?;

    if !reorder::apply_payload(&state, OrderedCollection::Skills, &payload).await? {
        return Ok(Json(ReorderResponse::skipped()));
    }
    let rows = db::skills::list(&state.pool, None)
        .await
        .map_err(|e| map_db_error(e, "skill list failed"))?;
    Ok(Json(ReorderResponse::Applied(rows)))
}
