use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct RecommendationDto {
    /// One of `hub`, `event`, `programme`.
    pub kind: String,
    pub id: i32,
    pub title: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub starts_at: Option<DateTime<Utc>>,
}
