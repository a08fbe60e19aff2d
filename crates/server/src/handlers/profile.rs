use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::db;
use crate::errors::{map_db_error, ServerError};
use crate::models::{now_timestamp, Profile, ProfileInput};

pub async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, ServerError> {
    let profile = db::profile::get_or_create(&state.pool, now_timestamp())
        .await
        .map_err(|e| map_db_error(e, "profile load failed"))?;
    Ok(Json(profile))
}

/// Upsert: only the sent fields change.
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<ProfileInput>,
) -> Result<Json<Profile>, ServerError> {
    require_admin(&state, &headers)?;
    let now = now_timestamp();

    let mut profile = db::profile::get_or_create(&state.pool, now)
        .await
        .map_err(|e| map_db_error(e, "profile load failed"))?;
    profile.apply(payload, now)?;

    db::profile::save(&state.pool, &profile)
        .await
        .map_err(|e| map_db_error(e, "profile update failed"))?;

    tracing::info!(id = %profile.id, "profile updated");
    Ok(Json(profile))
}
