use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::{new_id, required};
use crate::errors::ServerError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachPoint {
    pub heading: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EngineeringApproach {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub points: Json<Vec<ApproachPoint>>,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EngineeringApproachInput {
    pub title: Option<String>,
    pub points: Option<Vec<ApproachPoint>>,
    pub order: Option<i64>,
}

impl EngineeringApproach {
    pub fn create(
        input: EngineeringApproachInput,
        now: DateTime<Utc>,
        default_order: i64,
    ) -> Result<Self, ServerError> {
        let mut approach = EngineeringApproach {
            id: new_id(),
            title: required(input.title.clone(), "Engineering approach title is required")?,
            points: Json(Vec::new()),
            order: default_order,
            created_at: now,
            updated_at: now,
        };
        approach.apply(input, now)?;
        Ok(approach)
    }

    pub fn apply(
        &mut self,
        input: EngineeringApproachInput,
        now: DateTime<Utc>,
    ) -> Result<(), ServerError> {
        if let Some(title) = input.title {
            self.title = required(Some(title), "Engineering approach title is required")?;
        }
        if let Some(points) = input.points {
            self.points = Json(points);
        }
        if let Some(order) = input.order {
            self.order = order;
        }
        self.updated_at = now;
        Ok(())
    }
}
