use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::{new_id, optional_text, required, string_list};
use crate::errors::ServerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProjectCategory {
    #[default]
    Web,
    Mobile,
    Desktop,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Architecture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineeringDecision {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub technologies: Json<Vec<String>>,
    pub images: Json<Vec<String>>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub category: ProjectCategory,
    pub featured: bool,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub problem: Option<String>,
    pub architecture: Option<Json<Architecture>>,
    pub engineering_decisions: Json<Vec<EngineeringDecision>>,
    pub scaling_considerations: Json<Vec<String>>,
    pub metrics: Json<Vec<Metric>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub technologies: Option<Vec<String>>,
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub images: Option<Vec<String>>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
    pub order: Option<i64>,
    pub problem: Option<String>,
    pub architecture: Option<Architecture>,
    pub engineering_decisions: Option<Vec<EngineeringDecision>>,
    #[serde(default, deserialize_with = "string_list::deserialize")]
    pub scaling_considerations: Option<Vec<String>>,
    pub metrics: Option<Vec<Metric>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
}

impl ProjectListQuery {
    /// Any value other than `true` selects non-featured projects.
    pub fn featured_filter(&self) -> Option<bool> {
        self.featured.as_deref().map(|v| v == "true")
    }
}

impl Project {
    pub fn create(
        input: ProjectInput,
        now: DateTime<Utc>,
        default_order: i64,
    ) -> Result<Self, ServerError> {
        let mut project = Project {
            id: new_id(),
            title: String::new(),
            description: String::new(),
            long_description: None,
            technologies: Json(Vec::new()),
            images: Json(Vec::new()),
            github_link: None,
            live_link: None,
            category: ProjectCategory::default(),
            featured: false,
            order: input.order.unwrap_or(default_order),
            problem: None,
            architecture: None,
            engineering_decisions: Json(Vec::new()),
            scaling_considerations: Json(Vec::new()),
            metrics: Json(Vec::new()),
            created_at: now,
            updated_at: now,
        };
        project.title = required(input.title.clone(), "Project title is required")?;
        project.description =
            required(input.description.clone(), "Project description is required")?;
        project.apply(input, now)?;
        Ok(project)
    }

    /// Overwrites the fields present in `input`; the rest stay as stored.
    pub fn apply(&mut self, input: ProjectInput, now: DateTime<Utc>) -> Result<(), ServerError> {
        if let Some(title) = input.title {
            self.title = required(Some(title), "Project title is required")?;
        }
        if let Some(description) = input.description {
            self.description = required(Some(description), "Project description is required")?;
        }
        if let Some(v) = input.long_description {
            self.long_description = optional_text(v);
        }
        if let Some(v) = input.technologies {
            self.technologies = Json(v);
        }
        if let Some(v) = input.images {
            self.images = Json(v);
        }
        if let Some(v) = input.github_link {
            self.github_link = optional_text(v);
        }
        if let Some(v) = input.live_link {
            self.live_link = optional_text(v);
        }
        if let Some(v) = input.category {
            self.category = v;
        }
        if let Some(v) = input.featured {
            self.featured = v;
        }
        if let Some(v) = input.order {
            self.order = v;
        }
        if let Some(v) = input.problem {
            self.problem = optional_text(v);
        }
        if let Some(v) = input.architecture {
            self.architecture = Some(Json(v));
        }
        if let Some(v) = input.engineering_decisions {
            self.engineering_decisions = Json(v);
        }
        if let Some(v) = input.scaling_considerations {
            self.scaling_considerations = Json(v);
        }
        if let Some(v) = input.metrics {
            self.metrics = Json(v);
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> ProjectInput {
        serde_json::from_value(value).expect("project input")
    }

    #[test]
    fn create_applies_defaults() {
        let now = Utc::now();
        let project = Project::create(
            input(json!({"title": "  Folio ", "description": "CMS", "technologies": "rust, axum"})),
            now,
            4,
        )
        .expect("project");

        assert_eq!(project.title, "Folio");
        assert_eq!(project.category, ProjectCategory::Web);
        assert!(!project.featured);
        assert_eq!(project.order, 4);
        assert_eq!(project.technologies.0, vec!["rust", "axum"]);
        assert_eq!(project.created_at, now);
    }

    #[test]
    fn create_requires_title_and_description() {
        let err = Project::create(input(json!({"description": "x"})), Utc::now(), 0).unwrap_err();
        assert_eq!(err.message(), "Project title is required");
        let err = Project::create(input(json!({"title": "x"})), Utc::now(), 0).unwrap_err();
        assert_eq!(err.message(), "Project description is required");
    }

    #[test]
    fn explicit_order_wins() {
        let project = Project::create(
            input(json!({"title": "a", "description": "b", "order": 0})),
            Utc::now(),
            9,
        )
        .expect("project");
        assert_eq!(project.order, 0);
    }

    #[test]
    fn apply_is_partial() {
        let mut project = Project::create(
            input(json!({"title": "a", "description": "b", "liveLink": "https://x"})),
            Utc::now(),
            0,
        )
        .expect("project");

        project
            .apply(input(json!({"featured": true, "category": "mobile"})), Utc::now())
            .expect("apply");
        assert!(project.featured);
        assert_eq!(project.category, ProjectCategory::Mobile);
        assert_eq!(project.live_link.as_deref(), Some("https://x"));

        project.apply(input(json!({"liveLink": ""})), Utc::now()).expect("apply");
        assert_eq!(project.live_link, None);

        assert!(project.apply(input(json!({"title": " "})), Utc::now()).is_err());
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(serde_json::from_value::<ProjectInput>(json!({"category": "game"})).is_err());
    }

    #[test]
    fn featured_filter() {
        let q = ProjectListQuery {
            category: None,
            featured: Some("true".into()),
        };
        assert_eq!(q.featured_filter(), Some(true));
        let q = ProjectListQuery {
            category: None,
            featured: Some("yes".into()),
        };
        assert_eq!(q.featured_filter(), Some(false));
        assert_eq!(ProjectListQuery::default().featured_filter(), None);
    }
}
