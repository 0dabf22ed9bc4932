use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub department: Option<String>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Set when an administrator has deactivated the account.
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PaginatedUsersDto {
    pub items: Vec<UserDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Profile changes. Omitted fields are left untouched, and an empty `department` clears it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateProfileDto {
    pub name: Option<String>,
    pub department: Option<String>,
    pub interests: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct SetAdminDto {
    pub admin: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct HubMembershipDto {
    pub hub_id: i32,
    pub hub_name: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ProjectMembershipDto {
    pub project_id: i32,
    pub project_name: String,
    pub hub_id: i32,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ProgrammeMembershipDto {
    pub programme_id: i32,
    pub programme_name: String,
    pub hub_id: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct EventRegistrationSummaryDto {
    pub event_id: i32,
    pub event_title: String,
    pub starts_at: DateTime<Utc>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct MembershipsDto {
    pub hubs: Vec<HubMembershipDto>,
    pub projects: Vec<ProjectMembershipDto>,
    pub programmes: Vec<ProgrammeMembershipDto>,
    pub events: Vec<EventRegistrationSummaryDto>,
}
