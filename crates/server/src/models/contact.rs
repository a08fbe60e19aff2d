use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, optional_text, required};
use crate::errors::ServerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ContactStatus {
    #[default]
    #[serde(rename = "new")]
    #[sqlx(rename = "new")]
    New,
    #[serde(rename = "in-progress")]
    #[sqlx(rename = "in-progress")]
    InProgress,
    #[serde(rename = "closed")]
    #[sqlx(rename = "closed")]
    Closed,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::InProgress => "in-progress",
            ContactStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(ContactStatus::New),
            "in-progress" => Ok(ContactStatus::InProgress),
            "closed" => Ok(ContactStatus::Closed),
            other => Err(ServerError::bad_request(format!(
                "Invalid status '{other}'; expected new, in-progress or closed"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub data: ContactMessage,
}

pub const DEFAULT_SUBJECT: &str = "General Inquiry";

impl ContactMessage {
    /// Public submissions always start as `new`.
    pub fn create(input: ContactInput, now: DateTime<Utc>) -> Result<Self, ServerError> {
        let name = required(input.name, "Name is required")?;
        let email = required(input.email, "Email is required")?;
        let message = match input.message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(ServerError::bad_request("Message is required")),
        };
        let subject = input
            .subject
            .and_then(optional_text)
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        Ok(ContactMessage {
            id: new_id(),
            name,
            email,
            subject,
            message,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing() {
        assert_eq!("in-progress".parse::<ContactStatus>().expect("status"), ContactStatus::InProgress);
        assert_eq!(" closed ".parse::<ContactStatus>().expect("status"), ContactStatus::Closed);
        assert!("archived".parse::<ContactStatus>().is_err());
        assert_eq!(
            serde_json::to_value(ContactStatus::InProgress).expect("json"),
            serde_json::json!("in-progress")
        );
    }

    #[test]
    fn create_defaults_subject_and_trims() {
        let msg = ContactMessage::create(
            ContactInput {
                name: Some("  Ada ".into()),
                email: Some(" ada@example.com ".into()),
                subject: Some(" ".into()),
                message: Some("Hello\nthere".into()),
            },
            Utc::now(),
        )
        .expect("message");
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.email, "ada@example.com");
        assert_eq!(msg.subject, DEFAULT_SUBJECT);
        assert_eq!(msg.message, "Hello\nthere");
        assert_eq!(msg.status, ContactStatus::New);
    }

    #[test]
    fn create_requires_fields() {
        let err = ContactMessage::create(
            ContactInput {
                name: Some("Ada".into()),
                email: None,
                subject: None,
                message: Some("hi".into()),
            },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.message(), "Email is required");
    }
}
