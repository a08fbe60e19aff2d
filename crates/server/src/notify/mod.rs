//! Outbound notification when a visitor submits the contact form.
//!
//! Delivery is fire-and-forget: the HTTP response never waits on it and a
//! failure only reaches the logs.

pub mod smtp;
pub mod template;

use std::sync::Arc;

use chrono_tz::Tz;
use thiserror::Error;

use crate::config::NotifyConfig;
use crate::models::ContactMessage;
use crate::secrets::get_secret;

pub use smtp::{SmtpNotifier, SmtpSettings};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    Address(String),
    #[error("message build failed: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("template render failed: {0}")]
    Render(#[from] std::fmt::Error),
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn contact_received(&self, message: &ContactMessage) -> Result<(), NotifyError>;
}

/// Used when SMTP or the recipient is not configured.
pub struct DisabledNotifier {
    reason: &'static str,
}

impl DisabledNotifier {
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

#[async_trait::async_trait]
impl Notifier for DisabledNotifier {
    async fn contact_received(&self, message: &ContactMessage) -> Result<(), NotifyError> {
        tracing::info!(id = %message.id, reason = self.reason, "email notification skipped");
        Ok(())
    }
}

/// Zone for rendered timestamps: `notify.timezone`, then `app.timezone`, then
/// Asia/Kolkata.
pub fn resolve_timezone(notify_tz: Option<&str>, app_tz: Option<&str>) -> Tz {
    for raw in [notify_tz, app_tz].into_iter().flatten() {
        match raw.trim().parse::<Tz>() {
            Ok(tz) => return tz,
            Err(e) => tracing::warn!(timezone = raw, error = %e, "unknown timezone ignored"),
        }
    }
    template::DEFAULT_TIMEZONE
}

pub fn build_notifier(config: &NotifyConfig, app_tz: Option<&str>) -> Arc<dyn Notifier> {
    let settings = match smtp_settings(config, app_tz, get_secret("SMTP_PASS")) {
        Ok(settings) => settings,
        Err(reason) => return Arc::new(DisabledNotifier::new(reason)),
    };

    match SmtpNotifier::new(settings) {
        Ok(notifier) => {
            tracing::info!("smtp notifier ready");
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::error!(error = %e, "smtp notifier disabled");
            Arc::new(DisabledNotifier::new("SMTP setup failed"))
        }
    }
}

fn smtp_settings(
    config: &NotifyConfig,
    app_tz: Option<&str>,
    password: Option<String>,
) -> Result<SmtpSettings, &'static str> {
    let host = non_blank(config.smtp_host.as_deref()).ok_or("SMTP not configured")?;
    let recipient = non_blank(config.recipient.as_deref()).ok_or("notification recipient not set")?;
    let user = non_blank(config.smtp_user.as_deref());
    let from = non_blank(config.from.as_deref())
        .or_else(|| user.clone())
        .ok_or("no sender address (notify.from or smtp_user)")?;

    Ok(SmtpSettings {
        host,
        port: config.smtp_port.unwrap_or(if config.smtp_secure { 465 } else { 587 }),
        secure: config.smtp_secure,
        user,
        password,
        from,
        recipient,
        admin_url: non_blank(config.admin_url.as_deref()),
        timezone: resolve_timezone(config.timezone.as_deref(), app_tz),
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Sends in the background; errors are logged, never returned.
pub fn dispatch(notifier: Arc<dyn Notifier>, message: ContactMessage) {
    tokio::spawn(async move {
        if let Err(e) = notifier.contact_received(&message).await {
            tracing::warn!(id = %message.id, error = %e, "contact notification failed");
        }
    });
}
