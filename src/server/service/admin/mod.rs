//! Platform administration: user management, dashboard counters and the first-admin
//! bootstrap.

pub mod code;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::server::{
    data::{
        audit_log::AuditLogRepository, event::EventRepository, hub::HubRepository,
        join_request::JoinRequestRepository, programme::ProgrammeRepository,
        project::ProjectRepository, user::UserRepository,
    },
    error::{auth::AuthError, AppError},
    model::{
        audit::{action, RecordAuditParam},
        insight::PlatformStats,
        pagination::{PageParam, Paginated},
        user::{User, UserFilter},
    },
};

use code::AdminCodeService;

/// Window used for the "new users" counter.
const NEW_USER_WINDOW_DAYS: i64 = 7;

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_users(
        &self,
        filter: UserFilter,
        page: PageParam,
    ) -> Result<Paginated<User>, AppError> {
        Ok(UserRepository::new(self.db)
            .get_paginated(&filter, page)
            .await?)
    }

    /// Grants or revokes the admin flag.
    ///
    /// # Returns
    /// - `Ok(User)` - The updated user
    /// - `Err(AppError::BadRequest)` - Actor tried to revoke their own admin flag
    /// - `Err(AppError::NotFound)` - User does not exist
    pub async fn set_admin(&self, actor: &User, user_id: i32, admin: bool) -> Result<User, AppError> {
        if actor.id == user_id && !admin {
            return Err(AppError::BadRequest(
                "You cannot revoke your own admin access".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let user_repo = UserRepository::new(&txn);

        let user = user_repo.find_by_id(user_id).await?.ok_or_else(user_not_found)?;
        user_repo.set_admin(user_id, admin).await?;

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: action::USER_ADMIN_CHANGED,
                target_type: "user",
                target_id: Some(user_id),
                details: json!({ "from": user.admin, "to": admin }),
            })
            .await?;

        let updated = user_repo.find_by_id(user_id).await?.ok_or_else(user_not_found)?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Deactivates an account. Deactivated users cannot log in and existing sessions stop
    /// passing the auth guard.
    pub async fn deactivate_user(&self, actor: &User, user_id: i32) -> Result<(), AppError> {
        if actor.id == user_id {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        self.set_deleted_at(actor, user_id, Some(Utc::now()), action::USER_DEACTIVATED)
            .await
    }

    pub async fn restore_user(&self, actor: &User, user_id: i32) -> Result<(), AppError> {
        self.set_deleted_at(actor, user_id, None, action::USER_RESTORED)
            .await
    }

    /// Headline counters for the admin dashboard.
    pub async fn stats(&self, now: DateTime<Utc>) -> Result<PlatformStats, AppError> {
        let user_repo = UserRepository::new(self.db);

        Ok(PlatformStats {
            total_users: user_repo.count_active(None).await?,
            new_users_last_7_days: user_repo
                .count_active(Some(now - Duration::days(NEW_USER_WINDOW_DAYS)))
                .await?,
            total_hubs: HubRepository::new(self.db).count_active().await?,
            total_projects: ProjectRepository::new(self.db).count_active().await?,
            total_programmes: ProgrammeRepository::new(self.db).count_active().await?,
            upcoming_events: EventRepository::new(self.db).count_upcoming(now).await?,
            pending_join_requests: JoinRequestRepository::new(self.db).count_pending().await?,
        })
    }

    /// Promotes `actor` to admin if `code` matches the outstanding bootstrap code.
    ///
    /// # Returns
    /// - `Ok(User)` - The promoted user
    /// - `Err(AppError::AuthErr(InvalidAdminCode))` - Wrong, expired or already used code
    pub async fn claim_admin(
        &self,
        actor: &User,
        code: &str,
        admin_code_service: &AdminCodeService,
    ) -> Result<User, AppError> {
        if !admin_code_service.validate_and_consume(code.trim()).await {
            return Err(AuthError::InvalidAdminCode.into());
        }

        let txn = self.db.begin().await?;
        let user_repo = UserRepository::new(&txn);

        user_repo.set_admin(actor.id, true).await?;

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: action::ADMIN_CLAIMED,
                target_type: "user",
                target_id: Some(actor.id),
                details: json!({}),
            })
            .await?;

        let user = user_repo.find_by_id(actor.id).await?.ok_or_else(user_not_found)?;
        txn.commit().await?;

        tracing::info!("User {} claimed admin access with the bootstrap code", actor.id);

        Ok(user)
    }

    async fn set_deleted_at(
        &self,
        actor: &User,
        user_id: i32,
        deleted_at: Option<DateTime<Utc>>,
        audit_action: &'static str,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        if !UserRepository::new(&txn)
            .set_deleted_at(user_id, deleted_at)
            .await?
        {
            return Err(user_not_found());
        }

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: audit_action,
                target_type: "user",
                target_id: Some(user_id),
                details: json!({}),
            })
            .await?;

        txn.commit().await?;

        Ok(())
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}
