use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::AuthSettings;
use crate::config::{AppMode, ServerConfig, SiteConfig};
use crate::notify::{build_notifier, Notifier};
use crate::rate_limit::RateLimiter;

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_bytes: usize,
    /// URL prefix files are served under, e.g. `/uploads`.
    pub public_prefix: String,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_limit_bytes: usize,
    pub cors_origins: Vec<String>,
    pub trust_forwarded_for: bool,
    pub request_tracing: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: Arc<AuthSettings>,
    pub uploads: Arc<UploadSettings>,
    pub contact_limiter: Arc<RateLimiter>,
    pub notifier: Arc<dyn Notifier>,
    pub site: Arc<SiteConfig>,
    pub http: Arc<HttpSettings>,
}

impl AppState {
    /// Wires the runtime state from config plus secrets. `uploads_dir` is the
    /// resolved absolute directory.
    pub fn from_config(config: ServerConfig, pool: SqlitePool, uploads_dir: PathBuf) -> Self {
        let auth = AuthSettings::from_secrets(config.auth.token_ttl_seconds);
        let notifier = build_notifier(&config.notify, config.app.timezone.as_deref());

        Self {
            pool,
            auth: Arc::new(auth),
            uploads: Arc::new(UploadSettings {
                dir: uploads_dir,
                max_bytes: config.uploads.max_bytes,
                public_prefix: config.uploads.mount_prefix(),
            }),
            contact_limiter: Arc::new(RateLimiter::new(
                config.contact.limit,
                Duration::from_secs(config.contact.window_seconds),
            )),
            notifier,
            http: Arc::new(HttpSettings {
                request_limit_bytes: config.http.request_limit_bytes,
                cors_origins: config.http.cors_origins,
                trust_forwarded_for: config.http.trust_forwarded_for,
                request_tracing: config.app.mode == AppMode::Dev,
            }),
            site: Arc::new(config.site),
        }
    }
}
