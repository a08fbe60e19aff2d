use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::{now_unix, require_admin};
use crate::errors::ServerError;
use crate::models::{LoginRequest, TokenResponse};

pub async fn login(
    State(state): State<AppState>,
    payload: Option<ApiJson<LoginRequest>>,
) -> Result<Json<TokenResponse>, ServerError> {
    // A missing or non-JSON body counts as an empty one.
    let password = payload.and_then(|ApiJson(body)| body.password);
    let password = match password {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Err(ServerError::bad_request("Password is required")),
    };

    // argon2 verification is CPU bound.
    let auth = state.auth.clone();
    let accepted = tokio::task::spawn_blocking(move || auth.check_password(&password))
        .await
        .map_err(|e| ServerError::internal(format!("password check failed: {e}")))?;

    if !accepted {
        tracing::warn!("admin login rejected");
        return Err(ServerError::unauthorized("Invalid credentials"));
    }

    let token = issue(&state)?;
    tracing::info!("admin login");
    Ok(Json(TokenResponse { token }))
}

pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ServerError> {
    require_admin(&state, &headers)?;
    Ok(Json(TokenResponse { token: issue(&state)? }))
}

fn issue(state: &AppState) -> Result<String, ServerError> {
    state
        .auth
        .issue_token(now_unix())
        .map_err(|e| ServerError::internal(format!("token issue failed: {e}")))
}
