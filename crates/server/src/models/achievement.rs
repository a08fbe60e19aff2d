use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, optional_text, required};
use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub issued_by: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub category: String,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub issued_by: Option<String>,
    /// RFC 3339 or `YYYY-MM-DD`; an empty string clears the date.
    pub date: Option<String>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AchievementListQuery {
    pub category: Option<String>,
}

const DEFAULT_CATEGORY: &str = "general";

impl Achievement {
    pub fn create(
        input: AchievementInput,
        now: DateTime<Utc>,
        default_order: i64,
    ) -> Result<Self, ServerError> {
        let mut achievement = Achievement {
            id: new_id(),
            title: required(input.title.clone(), "Achievement title is required")?,
            description: None,
            issued_by: None,
            date: None,
            link: None,
            category: DEFAULT_CATEGORY.to_string(),
            order: default_order,
            created_at: now,
            updated_at: now,
        };
        achievement.apply(input, now)?;
        Ok(achievement)
    }

    pub fn apply(
        &mut self,
        input: AchievementInput,
        now: DateTime<Utc>,
    ) -> Result<(), ServerError> {
        if let Some(title) = input.title {
            self.title = required(Some(title), "Achievement title is required")?;
        }
        if let Some(v) = input.description {
            self.description = optional_text(v);
        }
        if let Some(v) = input.issued_by {
            self.issued_by = optional_text(v);
        }
        if let Some(v) = input.date {
            self.date = parse_date(&v)?;
        }
        if let Some(v) = input.link {
            self.link = optional_text(v);
        }
        if let Some(v) = input.category {
            self.category = optional_text(v)
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        }
        if let Some(v) = input.order {
            self.order = v;
        }
        self.updated_at = now;
        Ok(())
    }
}

fn parse_date(raw: &str) -> Result<Option<DateTime<Utc>>, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| ServerError::bad_request(format!("Invalid achievement date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        assert_eq!(
            parse_date("2024-03-01").expect("date"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-03-01T10:30:00+05:30").expect("date"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap())
        );
        assert_eq!(parse_date("").expect("empty"), None);
        assert!(parse_date("March 1st").is_err());
    }

    #[test]
    fn create_and_clear_date() {
        let input: AchievementInput = serde_json::from_value(json!({
            "title": "Hackathon winner",
            "issuedBy": "ACM",
            "date": "2023-11-20"
        }))
        .expect("input");
        let mut achievement = Achievement::create(input, Utc::now(), 1).expect("achievement");
        assert_eq!(achievement.category, "general");
        assert!(achievement.date.is_some());

        let clear: AchievementInput = serde_json::from_value(json!({"date": ""})).expect("input");
        achievement.apply(clear, Utc::now()).expect("apply");
        assert_eq!(achievement.date, None);
        assert_eq!(achievement.issued_by.as_deref(), Some("ACM"));
    }
}
