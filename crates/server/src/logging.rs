use tracing_subscriber::EnvFilter;

use crate::config::{AppMode, ConfigError, ServerConfig};

/// Installs the global subscriber. `RUST_LOG` wins over `logging.level`.
/// Calling it twice is harmless; the first subscriber stays.
pub fn init_tracing(config: &ServerConfig) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(config.logging.level.as_deref())?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.app.mode {
        AppMode::Dev => builder.with_target(true).try_init(),
        AppMode::Prod => builder.with_target(false).with_ansi(false).compact().try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

fn build_filter(level: Option<&str>) -> Result<EnvFilter, ConfigError> {
    let level = level.map(str::trim).filter(|l| !l.is_empty()).unwrap_or("info");
    EnvFilter::try_new(level)
        .map_err(|e| ConfigError::Invalid(format!("invalid logging.level: {e}")))
}

pub fn log_startup(config: &ServerConfig) {
    tracing::info!(
        mode = ?config.app.mode,
        host = %config.http.host,
        port = config.http.port,
        sqlite = %config.database.sqlite_path,
        uploads = %config.uploads.directory,
        notify = config.notify.smtp_host.is_some(),
        "starting folio server"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_defaults_to_info() {
        assert!(build_filter(None).is_ok());
        assert!(build_filter(Some("  ")).is_ok());
        assert!(build_filter(Some("info,folio_server=debug")).is_ok());
    }

    #[test]
    fn bad_filter_is_rejected() {
        assert!(build_filter(Some("folio_server=loud")).is_err());
    }
}
