mod achievement;
mod approach;
mod contact;
mod profile;
mod project;
mod skill;

pub use achievement::{Achievement, AchievementInput, AchievementListQuery};
pub use approach::{ApproachPoint, EngineeringApproach, EngineeringApproachInput};
pub use contact::{
    ContactInput, ContactListQuery, ContactMessage, ContactStatus, StatusUpdateRequest,
    SubmitResponse,
};
pub use profile::{Profile, ProfileInput, SocialLink, DEFAULT_NAME};
pub use project::{
    Architecture, EngineeringDecision, Metric, Project, ProjectCategory, ProjectInput,
    ProjectListQuery,
};
pub use skill::{Proficiency, Skill, SkillInput, SkillListQuery};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServerError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub mimetype: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderItem {
    pub id: String,
    pub order: i64,
}

/// A reorder either returns the whole collection in display order or, when
/// nothing was sent, a plain message.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReorderResponse<T> {
    Applied(Vec<T>),
    Skipped(MessageResponse),
}

impl<T> ReorderResponse<T> {
    pub fn skipped() -> Self {
        ReorderResponse::Skipped(MessageResponse {
            message: "No updates applied".to_string(),
        })
    }
}

pub fn parse_reorder(payload: &Value) -> Result<Vec<ReorderItem>, ServerError> {
    let entries = payload
        .as_array()
        .ok_or_else(|| ServerError::bad_request("Payload must be an array"))?;

    entries
        .iter()
        .map(|entry| {
            let id = entry.get("id").and_then(Value::as_str).map(str::trim);
            let order = entry.get("order").and_then(Value::as_i64);
            match (id, order) {
                (Some(id), Some(order)) if !id.is_empty() => Ok(ReorderItem {
                    id: id.to_string(),
                    order,
                }),
                _ => Err(ServerError::bad_request(
                    "Each entry needs a string id and an integer order",
                )),
            }
        })
        .collect()
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time truncated to what the store keeps.
pub(crate) fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, ServerError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ServerError::bad_request(message)),
    }
}

/// Empty strings clear optional text fields.
pub(crate) fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) mod string_list {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    /// Accepts `["a", "b"]` or `"a, b"`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<ListOrCsv> = Option::deserialize(deserializer)?;
        Ok(raw.map(|value| match value {
            ListOrCsv::List(items) => normalize(items.iter().map(String::as_str)),
            ListOrCsv::Csv(text) => normalize(text.split(',')),
        }))
    }

    fn normalize<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
        items
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reorder_requires_array() {
        let err = parse_reorder(&json!({"id": "a", "order": 1})).unwrap_err();
        assert_eq!(err.message(), "Payload must be an array");
    }

    #[test]
    fn reorder_parses_entries() {
        let items = parse_reorder(&json!([{"id": "a", "order": 2}, {"id": " b ", "order": 0}]))
            .expect("valid payload");
        assert_eq!(
            items,
            vec![
                ReorderItem { id: "a".into(), order: 2 },
                ReorderItem { id: "b".into(), order: 0 },
            ]
        );
        assert!(parse_reorder(&json!([])).expect("empty").is_empty());
    }

    #[test]
    fn reorder_rejects_bad_entries() {
        assert!(parse_reorder(&json!([{"id": "a"}])).is_err());
        assert!(parse_reorder(&json!([{"id": 3, "order": 1}])).is_err());
        assert!(parse_reorder(&json!([{"id": "a", "order": "1"}])).is_err());
    }

    #[test]
    fn required_trims() {
        assert_eq!(required(Some("  hi ".into()), "m").expect("ok"), "hi");
        assert!(required(Some("   ".into()), "m").is_err());
        assert!(required(None, "m").is_err());
    }

    #[derive(Deserialize)]
    struct Tags {
        #[serde(default, deserialize_with = "string_list::deserialize")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn string_list_accepts_csv_and_arrays() {
        let csv: Tags = serde_json::from_value(json!({"tags": "rust, axum,, sqlx "})).expect("csv");
        assert_eq!(csv.tags, Some(vec!["rust".into(), "axum".into(), "sqlx".into()]));

        let list: Tags = serde_json::from_value(json!({"tags": ["a", " ", "b"]})).expect("list");
        assert_eq!(list.tags, Some(vec!["a".into(), "b".into()]));

        let missing: Tags = serde_json::from_value(json!({})).expect("missing");
        assert_eq!(missing.tags, None);

        let null: Tags = serde_json::from_value(json!({"tags": null})).expect("null");
        assert_eq!(null.tags, None);
    }
}
