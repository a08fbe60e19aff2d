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
use crate::models::{
    now_timestamp, Achievement, AchievementInput, AchievementListQuery, ReorderResponse,
};

const NOT_FOUND: &str = "Achievement not found";

pub async fn list_achievements(
    State(state): State<AppState>,
    Query(query): Query<AchievementListQuery>,
) -> Result<Json<Vec<Achievement>>, ServerError> {
    let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let rows = db::achievements::list(&state.pool, category)
        .await
        .map_err(|e| map_db_error(e, "achievement list failed"))?;
    Ok(Json(rows))
}

pub async fn create_achievement(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<AchievementInput>,
) -> Result<(StatusCode, Json<Achievement>), ServerError> {
    require_admin(&state, &headers)?;

    let order = reorder::next_order(&state, OrderedCollection::Achievements).await?;
    let achievement = Achievement::create(payload, now_timestamp(), order)?;
    db::achievements::insert(&state.pool, &achievement)
        .await
        .map_err(|e| map_db_error(e, "achievement already exists"))?;

    tracing::info!(id = %achievement.id, "achievement created");
    Ok((StatusCode::CREATED, Json(achievement)))
}

pub async fn update_achievement(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    ApiJson(payload): ApiJson<AchievementInput>,
) -> Result<Json<Achievement>, ServerError> {
    require_admin(&state, &headers)?;

    let mut achievement = db::achievements::get(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(e, "achievement load failed"))?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;
    achievement.apply(payload, now_timestamp())?;

    let updated = db::achievements::update(&state.pool, &achievement)
        .await
        .map_err(|e| map_db_error(e, "achievement update failed"))?;
    if updated == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(Json(achievement))
}

pub async fn delete_achievement(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let deleted = db::delete_by_id(&state.pool, OrderedCollection::Achievements.table(), &id)
        .await
        .map_err(|e| map_db_error(e, "achievement delete failed"))?;
    if deleted == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_achievements(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ReorderResponse<Achievement>>, ServerError> {
    require_admin(&state, &headers)?;

    if !reorder::apply_payload(&state, OrderedCollection::Achievements, &payload).await? {
        return Ok(Json(ReorderResponse::skipped()));
    }
    let rows = db::achievements::list(&state.pool, None)
        .await
        .map_err(|e| map_db_error(e, "achievement list failed"))?;
    Ok(Json(ReorderResponse::Applied(rows)))
}
