use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ProgrammeDto {
    pub id: i32,
    pub hub_id: i32,
    pub created_by: i32,
    pub name: String,
    pub description: String,
    pub capacity: Option<i32>,
    pub requires_approval: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub member_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PaginatedProgrammesDto {
    pub items: Vec<ProgrammeDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateProgrammeDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub requires_approval: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateProgrammeDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub requires_approval: Option<bool>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ProgrammeMemberDto {
    pub user_id: i32,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}
