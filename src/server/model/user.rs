//! User domain models and parameters.
//!
//! Provides the domain model for platform accounts and the parameter types for
//! registration, profile updates and admin user listings.

use chrono::{DateTime, Utc};

use crate::{
    model::user::{
        EventRegistrationSummaryDto, HubMembershipDto, MembershipsDto, PaginatedUsersDto,
        ProgrammeMembershipDto, ProjectMembershipDto, UserDto,
    },
    server::{
        model::{hub::HubRole, pagination::Paginated, project::ProjectRole},
        util::parse::split_interests,
    },
};

/// Platform account with profile data used for recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    /// Lowercased, unique email address.
    pub email: String,
    pub name: String,
    /// Whether the user has platform admin privileges.
    pub admin: bool,
    pub department: Option<String>,
    /// Lowercase interest tags.
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Set when the account has been deactivated.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account can log in and act.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Converts the user domain model to a DTO for API responses.
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            email: self.email,
            name: self.name,
            admin: self.admin,
            department: self.department,
            interests: self.interests,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
        }
    }

    /// Converts an entity model to a user domain model at the repository boundary.
    ///
    /// The password hash never leaves the data layer through this model.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            interests: split_interests(&entity.interests),
            email: entity.email,
            name: entity.name,
            admin: entity.admin,
            department: entity.department,
            created_at: entity.created_at,
            deleted_at: entity.deleted_at,
        }
    }
}

/// Parameters for creating a new account. The email is already normalised.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// Validated profile changes. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileParam {
    pub name: Option<String>,
    /// `Some(None)` clears the department.
    pub department: Option<Option<String>>,
    pub interests: Option<Vec<String>>,
}

/// Filters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of the name or email.
    pub search: Option<String>,
    pub include_deleted: bool,
}

impl Paginated<User> {
    pub fn into_dto(self) -> PaginatedUsersDto {
        let page = self.map(User::into_dto);
        PaginatedUsersDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// A hub the user belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct HubMembership {
    pub hub_id: i32,
    pub hub_name: String,
    pub role: HubRole,
    pub joined_at: DateTime<Utc>,
}

/// A project the user belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMembership {
    pub project_id: i32,
    pub project_name: String,
    pub hub_id: i32,
    pub role: ProjectRole,
    pub joined_at: DateTime<Utc>,
}

/// A programme the user is enrolled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeMembership {
    pub programme_id: i32,
    pub programme_name: String,
    pub hub_id: i32,
    pub joined_at: DateTime<Utc>,
}

/// An event the user is registered for.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRegistrationSummary {
    pub event_id: i32,
    pub event_title: String,
    pub starts_at: DateTime<Utc>,
    pub registered_at: DateTime<Utc>,
}

/// Everything a user is part of.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Memberships {
    pub hubs: Vec<HubMembership>,
    pub projects: Vec<ProjectMembership>,
    pub programmes: Vec<ProgrammeMembership>,
    pub events: Vec<EventRegistrationSummary>,
}

impl Memberships {
    pub fn into_dto(self) -> MembershipsDto {
        MembershipsDto {
            hubs: self
                .hubs
                .into_iter()
                .map(|m| HubMembershipDto {
                    hub_id: m.hub_id,
                    hub_name: m.hub_name,
                    role: m.role.to_string(),
                    joined_at: m.joined_at,
                })
                .collect(),
            projects: self
                .projects
                .into_iter()
                .map(|m| ProjectMembershipDto {
                    project_id: m.project_id,
                    project_name: m.project_name,
                    hub_id: m.hub_id,
                    role: m.role.to_string(),
                    joined_at: m.joined_at,
                })
                .collect(),
            programmes: self
                .programmes
                .into_iter()
                .map(|m| ProgrammeMembershipDto {
                    programme_id: m.programme_id,
                    programme_name: m.programme_name,
                    hub_id: m.hub_id,
                    joined_at: m.joined_at,
                })
                .collect(),
            events: self
                .events
                .into_iter()
                .map(|r| EventRegistrationSummaryDto {
                    event_id: r.event_id,
                    event_title: r.event_title,
                    starts_at: r.starts_at,
                    registered_at: r.registered_at,
                })
                .collect(),
        }
    }
}
