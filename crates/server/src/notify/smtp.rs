//! SMTP delivery for contact notifications, backed by `lettre`.

use chrono_tz::Tz;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::template::{self, EmailContent};
use super::{NotifyError, Notifier};
use crate::models::ContactMessage;

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise.
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub recipient: String,
    pub admin_url: Option<String>,
    pub timezone: Tz,
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipient: Mailbox,
    admin_url: Option<String>,
    timezone: Tz,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Result<Self, NotifyError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        };
        let mut builder = builder.port(settings.port);
        if let Some(user) = settings.user.clone() {
            builder = builder.credentials(Credentials::new(
                user,
                settings.password.clone().unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&settings.from, "notify.from")?,
            recipient: parse_mailbox(&settings.recipient, "notify.recipient")?,
            admin_url: settings.admin_url,
            timezone: settings.timezone,
        })
    }

    fn build_message(&self, contact: &ContactMessage, content: EmailContent) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.recipient.clone())
            .subject(content.subject);
        // A bad submitter address only costs the Reply-To header.
        match contact.email.parse::<Mailbox>() {
            Ok(reply_to) => builder = builder.reply_to(reply_to),
            Err(e) => tracing::debug!(error = %e, "reply-to omitted"),
        }
        Ok(builder.multipart(MultiPart::alternative_plain_html(content.text, content.html))?)
    }
}

fn parse_mailbox(raw: &str, field: &str) -> Result<Mailbox, NotifyError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::Address(format!("{field}: {e}")))
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn contact_received(&self, contact: &ContactMessage) -> Result<(), NotifyError> {
        let content = template::render(contact, self.admin_url.as_deref(), self.timezone)?;
        let email = self.build_message(contact, content)?;
        let start = tokio::time::Instant::now();
        self.transport.send(email).await?;
        tracing::info!(
            id = %contact.id,
            latency_ms = start.elapsed().as_millis() as u64,
            "contact notification sent"
        );
        Ok(())
    }
}
