use std::net::SocketAddr;
use std::path::Path;

use folio_server::config::{AppMode, ConfigError, ServerConfig};
use folio_server::{db, logging, router, schema, AppState};
use tokio::signal;

const DEFAULT_CONFIG_PATH: &str = "crates/server/res/config.toml";

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    let config_path =
        std::env::var("SERVER_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config_path = Path::new(&config_path);

    let config = ServerConfig::load(config_path).await?;
    logging::init_tracing(&config)?;
    logging::log_startup(&config);
    if let Some(tz) = config.app.timezone.as_deref() {
        tracing::info!(timezone = tz, "server timezone configured");
    }

    let pool = db::connect_db(&config, config_path).await?;
    schema::apply_server_schema(&pool, config_path).await?;

    if config.app.mode == AppMode::Dev && config.dev.reset_on_start {
        db::reset_server_data(&pool).await?;
    }

    let base_dir = config_path
        .parent()
        .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;
    let uploads_dir = config.uploads_dir(base_dir);
    tokio::fs::create_dir_all(&uploads_dir).await?;
    tracing::info!(path = %uploads_dir.display(), "uploads directory ready");

    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ConfigError::Invalid(format!("invalid http bind: {e}")))?;

    let state = AppState::from_config(config, pool.clone(), uploads_dir);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ConfigError::Invalid(format!("http server error: {e}")))?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
        tracing::info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
