//! Project domain models and parameters.

use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

use crate::{
    model::project::{PaginatedProjectsDto, ProjectDto, ProjectMemberDto},
    server::{error::AppError, model::pagination::Paginated, util::parse::parse_stored},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRole {
    Owner,
    Member,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i32,
    pub hub_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub max_members: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Converts an entity model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Project)` - Converted project
    /// - `Err(AppError::InternalErr(InvalidStoredValue))` - Unknown stored status
    pub fn from_entity(entity: entity::project::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            hub_id: entity.hub_id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            status: parse_stored("project.status", entity.status)?,
            max_members: entity.max_members,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    /// Whether `member_count` has reached the project's member limit.
    pub fn is_full(&self, member_count: u64) -> bool {
        self.max_members
            .is_some_and(|max| member_count >= max.max(0) as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectWithStats {
    pub project: Project,
    pub member_count: u64,
}

impl ProjectWithStats {
    pub fn into_dto(self) -> ProjectDto {
        ProjectDto {
            id: self.project.id,
            hub_id: self.project.hub_id,
            owner_id: self.project.owner_id,
            name: self.project.name,
            description: self.project.description,
            status: self.project.status.to_string(),
            max_members: self.project.max_members,
            member_count: self.member_count,
            created_at: self.project.created_at,
            updated_at: self.project.updated_at,
        }
    }
}

impl Paginated<ProjectWithStats> {
    pub fn into_dto(self) -> PaginatedProjectsDto {
        let page = self.map(ProjectWithStats::into_dto);
        PaginatedProjectsDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMember {
    pub user_id: i32,
    pub name: String,
    pub role: ProjectRole,
    pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
    pub fn into_dto(self) -> ProjectMemberDto {
        ProjectMemberDto {
            user_id: self.user_id,
            name: self.name,
            role: self.role.to_string(),
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProjectParam {
    pub hub_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub max_members: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProjectParam {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub max_members: Option<i32>,
}
