//! Programme domain models and parameters.
//!
//! A programme is a structured learning track inside a hub with an optional enrolment
//! capacity and an optional approval step.

use chrono::{DateTime, Utc};

use crate::{
    model::programme::{PaginatedProgrammesDto, ProgrammeDto, ProgrammeMemberDto},
    server::model::pagination::Paginated,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Programme {
    pub id: i32,
    pub hub_id: i32,
    pub created_by: i32,
    pub name: String,
    pub description: String,
    pub capacity: Option<i32>,
    pub requires_approval: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Programme {
    pub fn from_entity(entity: entity::programme::Model) -> Self {
        Self {
            id: entity.id,
            hub_id: entity.hub_id,
            created_by: entity.created_by,
            name: entity.name,
            description: entity.description,
            capacity: entity.capacity,
            requires_approval: entity.requires_approval,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Whether `member_count` has reached the enrolment capacity.
    pub fn is_full(&self, member_count: u64) -> bool {
        self.capacity
            .is_some_and(|cap| member_count >= cap.max(0) as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeWithStats {
    pub programme: Programme,
    pub member_count: u64,
}

impl ProgrammeWithStats {
    pub fn into_dto(self) -> ProgrammeDto {
        ProgrammeDto {
            id: self.programme.id,
            hub_id: self.programme.hub_id,
            created_by: self.programme.created_by,
            name: self.programme.name,
            description: self.programme.description,
            capacity: self.programme.capacity,
            requires_approval: self.programme.requires_approval,
            starts_at: self.programme.starts_at,
            ends_at: self.programme.ends_at,
            member_count: self.member_count,
            created_at: self.programme.created_at,
            updated_at: self.programme.updated_at,
        }
    }
}

impl Paginated<ProgrammeWithStats> {
    pub fn into_dto(self) -> PaginatedProgrammesDto {
        let page = self.map(ProgrammeWithStats::into_dto);
        PaginatedProgrammesDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgrammeMember {
    pub user_id: i32,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl ProgrammeMember {
    pub fn into_dto(self) -> ProgrammeMemberDto {
        ProgrammeMemberDto {
            user_id: self.user_id,
            name: self.name,
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProgrammeParam {
    pub hub_id: i32,
    pub created_by: i32,
    pub name: String,
    pub description: String,
    pub capacity: Option<i32>,
    pub requires_approval: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProgrammeParam {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub requires_approval: Option<bool>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}
