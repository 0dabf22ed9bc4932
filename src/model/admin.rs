use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct AuditLogDto {
    pub id: i32,
    pub actor_id: Option<i32>,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<i32>,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PaginatedAuditLogsDto {
    pub items: Vec<AuditLogDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SettingDto {
    pub key: String,
    /// Effective value: a boolean or an integer depending on the key.
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    /// Whether the value is the built-in default rather than a stored override.
    pub is_default: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct UpdateSettingDto {
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PlatformStatsDto {
    pub total_users: u64,
    pub new_users_last_7_days: u64,
    pub total_hubs: u64,
    pub total_projects: u64,
    pub total_programmes: u64,
    pub upcoming_events: u64,
    pub pending_join_requests: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct InsightDto {
    pub title: String,
    pub detail: String,
    /// One of `info`, `warning`, `critical`.
    pub severity: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct InsightReportDto {
    /// `model` when produced by the completion API, `rules` for the fixed fallback rules.
    pub source: String,
    pub stats: PlatformStatsDto,
    pub insights: Vec<InsightDto>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ClaimAdminDto {
    pub code: String,
}
