//! Audit log domain models.

use chrono::{DateTime, Utc};

use crate::{
    model::admin::{AuditLogDto, PaginatedAuditLogsDto},
    server::{
        error::{internal::InternalError, AppError},
        model::pagination::Paginated,
    },
};

/// Action names written to the audit log.
pub mod action {
    pub const HUB_DELETED: &str = "hub.deleted";
    pub const PROJECT_DELETED: &str = "project.deleted";
    pub const PROGRAMME_DELETED: &str = "programme.deleted";
    pub const EVENT_DELETED: &str = "event.deleted";
    pub const JOIN_REQUEST_APPROVED: &str = "join_request.approved";
    pub const JOIN_REQUEST_REJECTED: &str = "join_request.rejected";
    pub const SETTING_UPDATED: &str = "setting.updated";
    pub const USER_ADMIN_CHANGED: &str = "user.admin_changed";
    pub const USER_DEACTIVATED: &str = "user.deactivated";
    pub const USER_RESTORED: &str = "user.restored";
    pub const ADMIN_CLAIMED: &str = "admin.claimed";
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: i32,
    pub actor_id: Option<i32>,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<i32>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Converts an entity model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(AuditEntry)` - Converted entry
    /// - `Err(AppError::InternalErr(Json))` - Stored details are not valid JSON
    pub fn from_entity(entity: entity::audit_log::Model) -> Result<Self, AppError> {
        let details = serde_json::from_str(&entity.details).map_err(InternalError::from)?;

        Ok(Self {
            id: entity.id,
            actor_id: entity.actor_id,
            action: entity.action,
            target_type: entity.target_type,
            target_id: entity.target_id,
            details,
            created_at: entity.created_at,
        })
    }

    pub fn into_dto(self) -> AuditLogDto {
        AuditLogDto {
            id: self.id,
            actor_id: self.actor_id,
            action: self.action,
            target_type: self.target_type,
            target_id: self.target_id,
            details: self.details,
            created_at: self.created_at,
        }
    }
}

impl Paginated<AuditEntry> {
    pub fn into_dto(self) -> PaginatedAuditLogsDto {
        let page = self.map(AuditEntry::into_dto);
        PaginatedAuditLogsDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// Parameters for recording an audit entry.
#[derive(Debug, Clone)]
pub struct RecordAuditParam {
    pub actor_id: Option<i32>,
    pub action: &'static str,
    pub target_type: &'static str,
    pub target_id: Option<i32>,
    pub details: serde_json::Value,
}

/// Filters for the audit log listing. All filters are exact matches.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub actor_id: Option<i32>,
    pub target_type: Option<String>,
}
