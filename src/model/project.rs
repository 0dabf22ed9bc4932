use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ProjectDto {
    pub id: i32,
    pub hub_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    /// One of `planning`, `active`, `completed`, `archived`.
    pub status: String,
    pub max_members: Option<i32>,
    pub member_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PaginatedProjectsDto {
    pub items: Vec<ProjectDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateProjectDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
    pub max_members: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateProjectDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub max_members: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ProjectMemberDto {
    pub user_id: i32,
    pub name: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}
