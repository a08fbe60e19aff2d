use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, optional_text, required};
use crate::errors::ServerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    #[default]
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn as_str(self) -> &'static str {
        match self {
            Proficiency::Beginner => "beginner",
            Proficiency::Intermediate => "intermediate",
            Proficiency::Advanced => "advanced",
            Proficiency::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub proficiency: Proficiency,
    pub category: String,
    pub icon_url: Option<String>,
    pub description: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    pub name: Option<String>,
    pub proficiency: Option<Proficiency>,
    pub category: Option<String>,
    #[serde(alias = "icon")]
    pub icon_url: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillListQuery {
    pub category: Option<String>,
}

const DEFAULT_CATEGORY: &str = "general";

impl Skill {
    pub fn create(
        input: SkillInput,
        now: DateTime<Utc>,
        default_order: i64,
    ) -> Result<Self, ServerError> {
        let mut skill = Skill {
            id: new_id(),
            name: required(input.name.clone(), "Skill name is required")?,
            proficiency: Proficiency::default(),
            category: DEFAULT_CATEGORY.to_string(),
            icon_url: None,
            description: None,
            order: default_order,
            created_at: now,
            updated_at: now,
        };
        skill.apply(input, now)?;
        Ok(skill)
    }

    pub fn apply(&mut self, input: SkillInput, now: DateTime<Utc>) -> Result<(), ServerError> {
        if let Some(name) = input.name {
            self.name = required(Some(name), "Skill name is required")?;
        }
        if let Some(v) = input.proficiency {
            self.proficiency = v;
        }
        if let Some(v) = input.category {
            self.category = optional_text(v)
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        }
        if let Some(v) = input.icon_url {
            self.icon_url = optional_text(v);
        }
        if let Some(v) = input.description {
            self.description = optional_text(v);
        }
        if let Some(v) = input.order {
            self.order = v;
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
    fn defaults_and_icon_alias() {
        let input: SkillInput =
            serde_json::from_value(json!({"name": "Rust", "icon": "/uploads/rust.png"}))
                .expect("input");
        let skill = Skill::create(input, Utc::now(), 2).expect("skill");
        assert_eq!(skill.proficiency, Proficiency::Advanced);
        assert_eq!(skill.category, "general");
        assert_eq!(skill.icon_url.as_deref(), Some("/uploads/rust.png"));
        assert_eq!(skill.order, 2);
    }

    #[test]
    fn blank_category_falls_back_to_general() {
        let input: SkillInput =
            serde_json::from_value(json!({"name": "Go", "category": "  "})).expect("input");
        assert_eq!(Skill::create(input, Utc::now(), 0).expect("skill").category, "general");
    }

    #[test]
    fn name_is_required() {
        let input: SkillInput = serde_json::from_value(json!({"category": "db"})).expect("input");
        assert!(Skill::create(input, Utc::now(), 0).is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let input: SkillInput =
            serde_json::from_value(json!({"name": "SQL", "proficiency": "expert"})).expect("input");
        let value = serde_json::to_value(Skill::create(input, Utc::now(), 0).expect("skill"))
            .expect("json");
        assert_eq!(value["proficiency"], "expert");
        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["order"], 0);
    }
}
