use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Dev,
    Prod,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub app: AppConfig,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub dev: DevConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub mode: AppMode,
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_limit_bytes")]
    pub request_limit_bytes: usize,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Take the client address from `X-Forwarded-For` when running behind a proxy.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite_path: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct DevConfig {
    #[serde(default)]
    pub reset_on_start: bool,
}

#[derive(Debug, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_uploads_dir")]
    pub directory: String,
    #[serde(default = "default_upload_max_bytes")]
    pub max_bytes: usize,
    #[serde(default = "default_uploads_prefix")]
    pub public_prefix: String,
}

impl UploadsConfig {
    /// Mount point for stored files without a trailing slash. A bare `/`
    /// falls back to the default so files never mount at the site root.
    pub fn mount_prefix(&self) -> String {
        let trimmed = self.public_prefix.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            default_uploads_prefix()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            directory: default_uploads_dir(),
            max_bytes: default_upload_max_bytes(),
            public_prefix: default_uploads_prefix(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_contact_limit")]
    pub limit: u32,
    #[serde(default = "default_contact_window_seconds")]
    pub window_seconds: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            limit: default_contact_limit(),
            window_seconds: default_contact_window_seconds(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NotifyConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    #[serde(default)]
    pub smtp_secure: bool,
    pub from: Option<String>,
    pub recipient: Option<String>,
    pub admin_url: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: String::new(),
        }
    }
}

fn default_request_limit_bytes() -> usize {
    1024 * 1024
}

fn default_token_ttl_seconds() -> u64 {
    7 * 24 * 60 * 60
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_upload_max_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_uploads_prefix() -> String {
    "/uploads".to_string()
}

fn default_contact_limit() -> u32 {
    10
}

fn default_contact_window_seconds() -> u64 {
    15 * 60
}

fn default_site_title() -> String {
    "Portfolio".to_string()
}

impl ServerConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let base_dir = path
            .parent()
            .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;

        let schema_path = base_dir.join("schemas").join("server.schema.json");
        let schema = load_schema(&schema_path).await?;
        let content = tokio::fs::read_to_string(path).await?;

        Self::parse(&schema, &content, &path.display().to_string())
    }

    /// Validates `content` against the JSON schema before deserializing it.
    pub fn parse(schema: &str, content: &str, name: &str) -> Result<Self, ConfigError> {
        validate_toml(schema, content, name)?;
        let config: ServerConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.contact.limit == 0 || self.contact.window_seconds == 0 {
            return Err(ConfigError::Invalid(
                "contact.limit and contact.window_seconds must be positive".into(),
            ));
        }
        if !self.uploads.public_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "uploads.public_prefix '{}' must start with '/'",
                self.uploads.public_prefix
            )));
        }
        if let Some(tz) = self.notify.timezone.as_deref() {
            tz.parse::<chrono_tz::Tz>()
                .map_err(|e| ConfigError::Invalid(format!("invalid notify.timezone: {e}")))?;
        }
        Ok(())
    }

    pub fn sqlite_path(&self, base_dir: &Path) -> PathBuf {
        let raw = self.database.sqlite_path.trim();

        if raw.is_empty() {
            return base_dir.join("folio.sqlite");
        }

        base_dir.join(raw)
    }

    pub fn uploads_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.uploads.directory.trim())
    }
}

async fn load_schema(path: &Path) -> Result<String, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|_| ConfigError::Invalid(format!("schema not found at {}", path.display())))?;

    Ok(content)
}

fn validate_toml(schema: &str, toml_input: &str, name: &str) -> Result<(), ConfigError> {
    let schema_json: serde_json::Value = serde_json::from_str(schema)
        .map_err(|e| ConfigError::Invalid(format!("schema parse error: {e}")))?;

    let compiled = jsonschema::validator_for(&schema_json)
        .map_err(|e| ConfigError::Invalid(format!("schema compile error: {e}")))?;

    let toml_value: toml::Value =
        toml::from_str(toml_input).map_err(|e| ConfigError::Invalid(format!("{name}: {e}")))?;

    let json_value =
        serde_json::to_value(toml_value).map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let mut errors = compiled.iter_errors(&json_value);

    if let Some(err) = errors.next() {
        let mut messages = vec![err.to_string()];

        for e in errors.take(4) {
            messages.push(e.to_string());
        }

        return Err(ConfigError::Invalid(format!(
            "schema validation failed for {name}: {}",
            messages.join("; ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = include_str!("../res/schemas/server.schema.json");
    const SAMPLE: &str = include_str!("../res/config.toml");

    #[test]
    fn bundled_config_passes_schema() {
        let config = ServerConfig::parse(SCHEMA, SAMPLE, "config.toml").expect("valid config");
        assert_eq!(config.app.mode, AppMode::Dev);
        assert_eq!(config.contact.limit, 10);
        assert_eq!(config.uploads.public_prefix, "/uploads");
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let raw = r#"
            [app]
            mode = "prod"

            [http]
            host = "127.0.0.1"
            port = 5000

            [database]

            [logging]

            [auth]
        "#;
        let config = ServerConfig::parse(SCHEMA, raw, "inline").expect("valid config");
        assert_eq!(config.http.request_limit_bytes, 1024 * 1024);
        assert_eq!(config.auth.token_ttl_seconds, 604_800);
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.contact.window_seconds, 900);
        assert!(!config.dev.reset_on_start);
        assert_eq!(
            config.sqlite_path(Path::new("/srv/folio")),
            PathBuf::from("/srv/folio/folio.sqlite")
        );
    }

    #[test]
    fn upload_prefix_is_normalized() {
        let mut uploads = UploadsConfig::default();
        assert_eq!(uploads.mount_prefix(), "/uploads");

        uploads.public_prefix = "/media/".to_string();
        assert_eq!(uploads.mount_prefix(), "/media");

        uploads.public_prefix = "/".to_string();
        assert_eq!(uploads.mount_prefix(), "/uploads");

        uploads.public_prefix = "///".to_string();
        assert_eq!(uploads.mount_prefix(), "/uploads");
    }

    #[test]
    fn schema_rejects_unknown_mode() {
        let raw = r#"
            [app]
            mode = "staging"

            [http]
            host = "0.0.0.0"
            port = 5000

            [database]
            [logging]
            [auth]
        "#;
        let err = ServerConfig::parse(SCHEMA, raw, "inline").unwrap_err();
        assert!(err.to_string().contains("schema validation failed"), "{err}");
    }

    #[test]
    fn rejects_zero_contact_window() {
        let raw = r#"
            [app]
            mode = "dev"

            [http]
            host = "0.0.0.0"
            port = 5000

            [database]
            [logging]
            [auth]

            [contact]
            limit = 5
            window_seconds = 0
        "#;
        assert!(matches!(
            ServerConfig::parse(SCHEMA, raw, "inline"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
