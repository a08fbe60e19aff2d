use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use super::extract::ApiJson;
use super::reorder;
use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::db::{self, OrderedCollection};
use crate::errors::{map_db_error, ServerError};
use crate::models::{now_timestamp, EngineeringApproach, EngineeringApproachInput, ReorderResponse};

const NOT_FOUND: &str = "Engineering approach not found";

pub async fn list_approaches(
    State(state): State<AppState>,
) -> Result<Json<Vec<EngineeringApproach>>, ServerError> {
    let rows = db::approaches::list(&state.pool)
        .await
        .map_err(|e| map_db_error(e, "approach list failed"))?;
    Ok(Json(rows))
}

pub async fn get_approach(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<EngineeringApproach>, ServerError> {
    db::approaches::get(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(e, "approach load failed"))?
        .map(Json)
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))
}

pub async fn create_approach(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<EngineeringApproachInput>,
) -> Result<(StatusCode, Json<EngineeringApproach>), ServerError> {
    require_admin(&state, &headers)?;

    let order = reorder::next_order(&state, OrderedCollection::EngineeringApproaches).await?;
    let approach = EngineeringApproach::create(payload, now_timestamp(), order)?;
    db::approaches::insert(&state.pool, &approach)
        .await
        .map_err(|e| map_db_error(e, "approach already exists"))?;

    tracing::info!(id = %approach.id, "engineering approach created");
    Ok((StatusCode::CREATED, Json(approach)))
}

pub async fn update_approach(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    ApiJson(payload): ApiJson<EngineeringApproachInput>,
) -> Result<Json<EngineeringApproach>, ServerError> {
    require_admin(&state, &headers)?;

    let mut approach = db::approaches::get(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(e, "approach load failed"))?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;
    approach.apply(payload, now_timestamp())?;

    let updated = db::approaches::update(&state.pool, &approach)
        .await
        .map_err(|e| map_db_error(e, "approach update failed"))?;
    if updated == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(Json(approach))
}

pub async fn delete_approach(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let deleted = db::delete_by_id(
        &state.pool,
        OrderedCollection::EngineeringApproaches.table(),
        &id,
    )
    .await
    .map_err(|e| map_db_error(e, "approach delete failed"))?;
    if deleted == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_approaches(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ReorderResponse<EngineeringApproach>>, ServerError> {
    require_admin(&state, &headers)?;

    if !reorder::apply_payload(&state, OrderedCollection::EngineeringApproaches, &payload).await? {
        return Ok(Json(ReorderResponse::skipped()));
    }
    let rows = db::approaches::list(&state.pool)
        .await
        .map_err(|e| map_db_error(e, "approach list failed"))?;
    Ok(Json(ReorderResponse::Applied(rows)))
}
