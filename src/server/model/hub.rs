//! Hub domain models and parameters.

use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

use crate::{
    model::hub::{HubDto, HubMemberDto, PaginatedHubsDto},
    server::model::pagination::Paginated,
};

/// A member's role within a hub.
///
/// Owners and admins are hub managers: they review join requests and manage members,
/// projects, programmes and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubRole {
    Owner,
    Admin,
    Member,
}

impl HubRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Whether the role grants hub management rights.
    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl fmt::Display for HubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HubRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hub {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub owner_id: i32,
    pub is_private: bool,
    pub max_members: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hub {
    pub fn from_entity(entity: entity::hub::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            category: entity.category,
            owner_id: entity.owner_id,
            is_private: entity.is_private,
            max_members: entity.max_members,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Whether `member_count` has reached the hub's member limit.
    pub fn is_full(&self, member_count: u64) -> bool {
        self.max_members
            .is_some_and(|max| member_count >= max.max(0) as u64)
    }
}

/// Hub with its member count and, when known, the caller's role.
#[derive(Debug, Clone, PartialEq)]
pub struct HubWithStats {
    pub hub: Hub,
    pub member_count: u64,
    pub my_role: Option<HubRole>,
}

impl HubWithStats {
    pub fn into_dto(self) -> HubDto {
        HubDto {
            id: self.hub.id,
            name: self.hub.name,
            description: self.hub.description,
            category: self.hub.category,
            owner_id: self.hub.owner_id,
            is_private: self.hub.is_private,
            max_members: self.hub.max_members,
            member_count: self.member_count,
            my_role: self.my_role.map(|r| r.to_string()),
            created_at: self.hub.created_at,
            updated_at: self.hub.updated_at,
        }
    }
}

impl Paginated<HubWithStats> {
    pub fn into_dto(self) -> PaginatedHubsDto {
        let page = self.map(HubWithStats::into_dto);
        PaginatedHubsDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// A hub member joined with their display name.
#[derive(Debug, Clone, PartialEq)]
pub struct HubMember {
    pub user_id: i32,
    pub name: String,
    pub role: HubRole,
    pub joined_at: DateTime<Utc>,
}

impl HubMember {
    pub fn into_dto(self) -> HubMemberDto {
        HubMemberDto {
            user_id: self.user_id,
            name: self.name,
            role: self.role.to_string(),
            joined_at: self.joined_at,
        }
    }
}

/// Validated parameters for creating a hub.
#[derive(Debug, Clone)]
pub struct CreateHubParam {
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_private: bool,
    pub max_members: Option<i32>,
}

/// Validated hub changes. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateHubParam {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_private: Option<bool>,
    pub max_members: Option<i32>,
}

/// Filters for the hub listing.
#[derive(Debug, Clone, Default)]
pub struct HubFilter {
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managers_are_owner_and_admin() {
        assert!(HubRole::Owner.is_manager());
        assert!(HubRole::Admin.is_manager());
        assert!(!HubRole::Member.is_manager());
    }

    #[test]
    fn role_parses_from_its_string() {
        for role in [HubRole::Owner, HubRole::Admin, HubRole::Member] {
            assert_eq!(role.as_str().parse::<HubRole>(), Ok(role));
        }
        assert!("moderator".parse::<HubRole>().is_err());
    }
}
