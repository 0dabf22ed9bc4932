use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct JoinRequestDto {
    pub id: i32,
    /// One of `hub`, `project`, `programme`.
    pub target_type: String,
    pub target_id: i32,
    pub user_id: i32,
    pub message: Option<String>,
    /// One of `pending`, `approved`, `rejected`, `cancelled`.
    pub status: String,
    pub reviewed_by: Option<i32>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct JoinDto {
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct RejectJoinRequestDto {
    pub reason: Option<String>,
}

/// Result of a join attempt.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct JoinOutcomeDto {
    /// `joined` when membership was granted immediately, `pending` when awaiting review.
    pub status: String,
    pub request: Option<JoinRequestDto>,
}
