use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::{new_id, optional_text, required};
use crate::errors::ServerError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// The single portfolio-owner document.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub role: String,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub socials: Json<Vec<SocialLink>>,
    pub resume_url: Option<String>,
    pub hero_image: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: Option<String>,
    pub role: Option<String>,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub socials: Option<Vec<SocialLink>>,
    pub resume_url: Option<String>,
    pub hero_image: Option<String>,
    pub available: Option<bool>,
}

pub const DEFAULT_NAME: &str = "Your Name";
pub const DEFAULT_ROLE: &str = "Full Stack Engineer";

impl Profile {
    pub fn new_default(now: DateTime<Utc>) -> Self {
        Profile {
            id: new_id(),
            name: DEFAULT_NAME.to_string(),
            role: DEFAULT_ROLE.to_string(),
            headline: None,
            about: None,
            location: None,
            email: None,
            phone: None,
            socials: Json(Vec::new()),
            resume_url: None,
            hero_image: None,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: ProfileInput, now: DateTime<Utc>) -> Result<(), ServerError> {
        if let Some(v) = input.name {
            self.name = required(Some(v), "Profile name is required")?;
        }
        if let Some(v) = input.role {
            self.role = required(Some(v), "Profile role is required")?;
        }
        if let Some(v) = input.headline {
            self.headline = optional_text(v);
        }
        if let Some(v) = input.about {
            self.about = optional_text(v);
        }
        if let Some(v) = input.location {
            self.location = optional_text(v);
        }
        if let Some(v) = input.email {
            self.email = optional_text(v);
        }
        if let Some(v) = input.phone {
            self.phone = optional_text(v);
        }
        if let Some(v) = input.socials {
            self.socials = Json(v);
        }
        if let Some(v) = input.resume_url {
            self.resume_url = optional_text(v);
        }
        if let Some(v) = input.hero_image {
            self.hero_image = optional_text(v);
        }
        if let Some(v) = input.available {
            self.available = v;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_profile() {
        let profile = Profile::new_default(Utc::now());
        assert_eq!(profile.name, DEFAULT_NAME);
        assert_eq!(profile.role, DEFAULT_ROLE);
        assert!(profile.available);
        assert!(profile.socials.is_empty());
    }

    #[test]
    fn apply_only_touches_sent_fields() {
        let mut profile = Profile::new_default(Utc::now());
        let input: ProfileInput = serde_json::from_value(json!({
            "headline": "Systems person",
            "available": false,
            "socials": [{"label": "GitHub", "url": "https://github.com/x"}]
        }))
        .expect("input");
        profile.apply(input, Utc::now()).expect("apply");

        assert_eq!(profile.name, DEFAULT_NAME);
        assert_eq!(profile.headline.as_deref(), Some("Systems person"));
        assert!(!profile.available);
        assert_eq!(profile.socials[0].label, "GitHub");
        assert_eq!(profile.socials[0].icon, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut profile = Profile::new_default(Utc::now());
        let input: ProfileInput = serde_json::from_value(json!({"name": "  "})).expect("input");
        assert!(profile.apply(input, Utc::now()).is_err());
        assert_eq!(profile.name, DEFAULT_NAME);
    }
}
