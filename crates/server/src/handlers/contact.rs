use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use super::extract::{client_key, ApiJson};
use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::db;
use crate::errors::{map_db_error, ServerError};
use crate::models::{
    now_timestamp, ContactInput, ContactListQuery, ContactMessage, ContactStatus,
    StatusUpdateRequest, SubmitResponse,
};
use crate::notify;

const NOT_FOUND: &str = "Message not found";
const RATE_LIMITED: &str = "Too many submissions from this IP, please try again later.";

pub async fn submit_contact(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<SubmitResponse>), ServerError> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let key = client_key(&headers, peer, state.http.trust_forwarded_for);
    if !state.contact_limiter.allow(&key).await {
        tracing::warn!(client = %key, "contact submission rate limited");
        return Err(ServerError::new(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED));
    }

    let message = ContactMessage::create(payload, now_timestamp())?;
    db::contact::insert(&state.pool, &message)
        .await
        .map_err(|e| map_db_error(e, "contact message already exists"))?;

    tracing::info!(id = %message.id, client = %key, "contact message received");
    notify::dispatch(state.notifier.clone(), message.clone());

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Message received",
            data: message,
        }),
    ))
}

pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<Vec<ContactMessage>>, ServerError> {
    require_admin(&state, &headers)?;

    let status = match query.status.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Some(s.parse::<ContactStatus>()?),
        _ => None,
    };
    let rows = db::contact::list(&state.pool, status)
        .await
        .map_err(|e| map_db_error(e, "contact list failed"))?;
    Ok(Json(rows))
}

pub async fn update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    ApiJson(payload): ApiJson<StatusUpdateRequest>,
) -> Result<Json<ContactMessage>, ServerError> {
    require_admin(&state, &headers)?;

    let status = payload
        .status
        .as_deref()
        .ok_or_else(|| ServerError::bad_request("Status is required"))?
        .parse::<ContactStatus>()?;

    let message = db::contact::set_status(&state.pool, &id, status, now_timestamp())
        .await
        .map_err(|e| map_db_error(e, "contact update failed"))?
        .ok_or_else(|| ServerError::not_found(NOT_FOUND))?;

    tracing::info!(id = %message.id, status = %status, "contact status updated");
    Ok(Json(message))
}

pub async fn delete_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers)?;

    let deleted = db::delete_by_id(&state.pool, db::contact::TABLE, &id)
        .await
        .map_err(|e| map_db_error(e, "contact delete failed"))?;
    if deleted == 0 {
        return Err(ServerError::not_found(NOT_FOUND));
    }
    Ok(StatusCode::NO_CONTENT)
}
