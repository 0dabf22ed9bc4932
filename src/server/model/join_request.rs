//! Join request domain models.
//!
//! Hubs, projects and programmes share one request table. The target is stored as a
//! `(target_type, target_id)` pair and exposed here as the [`JoinTarget`] enum.

use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

use crate::{
    model::join_request::{JoinOutcomeDto, JoinRequestDto},
    server::{
        error::{internal::InternalError, AppError},
        util::parse::parse_stored,
    },
};

/// The group a join request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinTarget {
    Hub(i32),
    Project(i32),
    Programme(i32),
}

impl JoinTarget {
    pub const HUB: &'static str = "hub";
    pub const PROJECT: &'static str = "project";
    pub const PROGRAMME: &'static str = "programme";

    /// Value stored in the `target_type` column.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hub(_) => Self::HUB,
            Self::Project(_) => Self::PROJECT,
            Self::Programme(_) => Self::PROGRAMME,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Hub(id) | Self::Project(id) | Self::Programme(id) => *id,
        }
    }

    /// Rebuilds a target from its stored columns.
    pub fn from_parts(kind: &str, id: i32) -> Option<Self> {
        match kind {
            Self::HUB => Some(Self::Hub(id)),
            Self::PROJECT => Some(Self::Project(id)),
            Self::PROGRAMME => Some(Self::Programme(id)),
            _ => None,
        }
    }

    /// Relative application path of the target, used as a notification link.
    pub fn link(&self) -> String {
        format!("/{}s/{}", self.kind(), self.id())
    }
}

impl fmt::Display for JoinTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinRequestStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinRequest {
    pub id: i32,
    pub target: JoinTarget,
    pub user_id: i32,
    pub message: Option<String>,
    pub status: JoinRequestStatus,
    pub reviewed_by: Option<i32>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl JoinRequest {
    /// Converts an entity model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(JoinRequest)` - Converted request
    /// - `Err(AppError::InternalErr(InvalidStoredValue))` - Unknown stored target type or status
    pub fn from_entity(entity: entity::join_request::Model) -> Result<Self, AppError> {
        let target = JoinTarget::from_parts(&entity.target_type, entity.target_id).ok_or(
            InternalError::InvalidStoredValue {
                field: "join_request.target_type",
                value: entity.target_type.clone(),
            },
        )?;

        Ok(Self {
            id: entity.id,
            target,
            user_id: entity.user_id,
            message: entity.message,
            status: parse_stored("join_request.status", entity.status)?,
            reviewed_by: entity.reviewed_by,
            review_note: entity.review_note,
            created_at: entity.created_at,
            reviewed_at: entity.reviewed_at,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == JoinRequestStatus::Pending
    }

    pub fn into_dto(self) -> JoinRequestDto {
        JoinRequestDto {
            id: self.id,
            target_type: self.target.kind().to_string(),
            target_id: self.target.id(),
            user_id: self.user_id,
            message: self.message,
            status: self.status.to_string(),
            reviewed_by: self.reviewed_by,
            review_note: self.review_note,
            created_at: self.created_at,
            reviewed_at: self.reviewed_at,
        }
    }
}

/// Result of a join attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// The target needed no approval and the caller is now a member.
    Joined,
    /// A request was created and awaits review.
    Pending(JoinRequest),
}

impl JoinOutcome {
    pub fn into_dto(self) -> JoinOutcomeDto {
        match self {
            Self::Joined => JoinOutcomeDto {
                status: "joined".to_string(),
                request: None,
            },
            Self::Pending(request) => JoinOutcomeDto {
                status: "pending".to_string(),
                request: Some(request.into_dto()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_round_trips_through_columns() {
        for target in [
            JoinTarget::Hub(1),
            JoinTarget::Project(2),
            JoinTarget::Programme(3),
        ] {
            assert_eq!(
                JoinTarget::from_parts(target.kind(), target.id()),
                Some(target)
            );
        }
        assert_eq!(JoinTarget::from_parts("event", 1), None);
    }

    #[test]
    fn target_link_points_at_collection() {
        assert_eq!(JoinTarget::Programme(7).link(), "/programmes/7");
    }
}
