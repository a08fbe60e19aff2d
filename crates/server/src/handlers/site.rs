use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;

use crate::app_state::AppState;
use crate::db::{self, projects::ProjectFilter};
use crate::errors::ServerError;
use crate::models::{now_timestamp, HealthResponse};
use crate::render::{render_landing, LandingData};

const ADMIN_HTML: &str = include_str!("../../res/admin.html");

/// Server-rendered public page. A store failure degrades to the placeholder
/// page instead of an error.
pub async fn landing(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    let data = match load_landing(&state).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = %e, "landing data load failed; rendering placeholder");
            LandingData::default()
        }
    };
    let page = render_landing(&state.site, &data)
        .map_err(|e| ServerError::internal(format!("landing render failed: {e}")))?;
    Ok(Html(page))
}

async fn load_landing(state: &AppState) -> Result<LandingData, sqlx::Error> {
    let pool = &state.pool;
    let featured = ProjectFilter {
        category: None,
        featured: Some(true),
    };
    let (profile, projects, skills, achievements, approaches) = tokio::try_join!(
        db::profile::get(pool),
        db::projects::list(pool, featured),
        db::skills::list(pool, None),
        db::achievements::list(pool, None),
        db::approaches::list(pool),
    )?;
    Ok(LandingData {
        profile,
        projects,
        skills,
        achievements,
        approaches,
    })
}

pub async fn admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time: now_timestamp(),
    })
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> ServerError {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    ServerError::new(StatusCode::NOT_FOUND, format!("Not Found - {target}"))
}
