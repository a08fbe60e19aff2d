mod achievements;
mod approaches;
mod auth;
mod contact;
mod docs;
pub mod extract;
mod profile;
mod projects;
mod reorder;
mod site;
mod skills;
pub mod upload;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Method;
use axum::routing::{delete, get, patch, post, put, MethodRouter};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Slack on top of `uploads.max_bytes` for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let upload_limit = state.uploads.max_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api = Router::new()
        .route("/auth/login", or_not_found(post(auth::login)))
        .route("/auth/refresh", or_not_found(post(auth::refresh)))
        .route(
            "/profile",
            or_not_found(get(profile::get_profile).put(profile::update_profile)),
        )
        .route(
            "/projects",
            or_not_found(get(projects::list_projects).post(projects::create_project)),
        )
        .route("/projects/reorder", or_not_found(patch(projects::reorder_projects)))
        .route(
            "/projects/:id",
            or_not_found(
                get(projects::get_project)
                    .put(projects::update_project)
                    .delete(projects::delete_project),
            ),
        )
        .route(
            "/skills",
            or_not_found(get(skills::list_skills).post(skills::create_skill)),
        )
        .route("/skills/reorder", or_not_found(patch(skills::reorder_skills)))
        .route(
            "/skills/:id",
            or_not_found(put(skills::update_skill).delete(skills::delete_skill)),
        )
        .route(
            "/achievements",
            or_not_found(
                get(achievements::list_achievements).post(achievements::create_achievement),
            ),
        )
        .route(
            "/achievements/reorder",
            or_not_found(patch(achievements::reorder_achievements)),
        )
        .route(
            "/achievements/:id",
            or_not_found(
                put(achievements::update_achievement).delete(achievements::delete_achievement),
            ),
        )
        .route(
            "/engineering-approach",
            or_not_found(get(approaches::list_approaches).post(approaches::create_approach)),
        )
        .route(
            "/engineering-approach/reorder",
            or_not_found(patch(approaches::reorder_approaches)),
        )
        .route(
            "/engineering-approach/:id",
            or_not_found(
                get(approaches::get_approach)
                    .put(approaches::update_approach)
                    .delete(approaches::delete_approach),
            ),
        )
        .route(
            "/contact",
            or_not_found(get(contact::list_messages).post(contact::submit_contact)),
        )
        .route("/contact/:id/status", or_not_found(patch(contact::update_status)))
        .route("/contact/:id", or_not_found(delete(contact::delete_message)))
        .route(
            "/upload",
            or_not_found(post(upload::upload_image)).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ));

    let app = Router::new()
        .route("/", get(site::landing))
        .route("/admin", get(site::admin))
        .route("/health", get(site::health))
        .route("/openapi.json", get(docs::openapi))
        .route("/docs", get(docs::openapi_html))
        .nest("/api", api)
        .nest_service(&state.uploads.public_prefix, ServeDir::new(&state.uploads.dir))
        .fallback(site::not_found)
        .layer(DefaultBodyLimit::max(state.http.request_limit_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(&state.http.cors_origins));

    let app = if state.http.request_tracing {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    app.with_state(state)
}

/// Unsupported methods on a known API path answer like an unknown path.
fn or_not_found(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(site::not_found)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, HeaderName::from_static("x-requested-with")])
        .max_age(Duration::from_secs(60 * 60));

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}
