//! Join-request workflow shared by hubs, projects and programmes.
//!
//! A join either grants membership immediately (public hubs, programmes without an
//! approval step) or opens a pending request that a manager of the target reviews.
//! Every eligibility, duplicate and capacity check runs in the same transaction as the
//! insert it guards. Notifications go out after commit.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::join_request::JoinDto,
    server::{
        data::{
            audit_log::AuditLogRepository, hub::HubRepository, hub_member::HubMemberRepository,
            join_request::JoinRequestRepository, programme::ProgrammeRepository,
            programme_member::ProgrammeMemberRepository, project::ProjectRepository,
            project_member::ProjectMemberRepository,
        },
        error::{auth::AuthError, AppError},
        model::{
            audit::{action, RecordAuditParam},
            hub::HubRole,
            join_request::{JoinOutcome, JoinRequest, JoinRequestStatus, JoinTarget},
            notification::{NewNotification, NotificationKind},
            project::ProjectRole,
            setting::SettingKey,
            user::User,
        },
        service::{
            notification::{email::Mailer, NotificationService},
            setting::int_setting,
        },
        util::validate,
    },
};

const MAX_MESSAGE_LEN: usize = 500;

/// What the workflow needs to know about a join target.
#[derive(Debug)]
struct TargetState {
    name: String,
    /// Hub a user must belong to before joining, for project targets.
    required_hub: Option<i32>,
    needs_approval: bool,
    is_full: bool,
}

pub struct JoinRequestService<'a> {
    db: &'a DatabaseConnection,
    mailer: Option<&'a Mailer>,
}

impl<'a> JoinRequestService<'a> {
    pub fn new(db: &'a DatabaseConnection, mailer: Option<&'a Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Asks to join `target` on behalf of `actor`.
    ///
    /// # Returns
    /// - `Ok(JoinOutcome::Joined)` - Target needs no approval, membership granted
    /// - `Ok(JoinOutcome::Pending(request))` - Request created and managers notified
    /// - `Err(AppError::NotFound)` - Target does not exist
    /// - `Err(AppError::AuthErr(AccessDenied))` - Project target and the actor is not in its hub
    /// - `Err(AppError::Conflict)` - Already a member, already pending, too many pending
    ///   requests, or the target is full
    pub async fn request(
        &self,
        actor: &User,
        target: JoinTarget,
        dto: JoinDto,
    ) -> Result<JoinOutcome, AppError> {
        let message =
            validate::optional_text("message", dto.message.as_deref(), MAX_MESSAGE_LEN)?;

        let txn = self.db.begin().await?;
        let request_repo = JoinRequestRepository::new(&txn);

        let state = target_state(&txn, target).await?;

        if let Some(hub_id) = state.required_hub {
            let role = HubMemberRepository::new(&txn)
                .find_role(hub_id, actor.id)
                .await?;
            if role.is_none() {
                return Err(AuthError::AccessDenied(
                    actor.id,
                    format!("Joining {} requires membership of hub {}", target, hub_id),
                )
                .into());
            }
        }

        if is_member(&txn, target, actor.id).await? {
            return Err(AppError::Conflict(format!(
                "You are already a member of this {}",
                target.kind()
            )));
        }

        if request_repo.find_pending(actor.id, target).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "You already have a pending request for this {}",
                target.kind()
            )));
        }

        let limit = int_setting(&txn, SettingKey::MaxPendingRequestsPerUser).await?;
        if request_repo.count_pending_for_user(actor.id).await? as i64 >= limit {
            return Err(AppError::Conflict(format!(
                "You can have at most {} pending join requests",
                limit
            )));
        }

        if state.is_full {
            return Err(AppError::Conflict(format!(
                "This {} is full",
                target.kind()
            )));
        }

        if !state.needs_approval {
            add_member(&txn, target, actor.id).await?;
            txn.commit().await?;

            tracing::info!("User {} joined {}", actor.id, target);
            return Ok(JoinOutcome::Joined);
        }

        let request = request_repo.create(target, actor.id, message).await?;
        let managers = manager_ids(&txn, target).await?;
        txn.commit().await?;

        NotificationService::new(self.db, self.mailer)
            .notify(
                &managers,
                NewNotification::new(
                    NotificationKind::JoinRequestReceived,
                    format!("New join request for {}", state.name),
                    format!("{} asked to join {}", actor.name, state.name),
                )
                .with_link(target.link()),
            )
            .await?;

        Ok(JoinOutcome::Pending(request))
    }

    /// Approves a pending request and adds the requester to the target.
    ///
    /// Membership and capacity are re-checked, because both may have changed since the
    /// request was made.
    ///
    /// # Returns
    /// - `Ok(JoinRequest)` - The approved request
    /// - `Err(AppError::NotFound)` - Request or target does not exist
    /// - `Err(AppError::BadRequest)` - Request is no longer pending
    /// - `Err(AppError::Conflict)` - Requester is already a member, or the target is full
    pub async fn approve(&self, reviewer: &User, id: i32) -> Result<JoinRequest, AppError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let request_repo = JoinRequestRepository::new(&txn);

        let request = find_pending_request(&request_repo, id).await?;
        let state = target_state(&txn, request.target).await?;

        if is_member(&txn, request.target, request.user_id).await? {
            return Err(AppError::Conflict(format!(
                "The user is already a member of this {}",
                request.target.kind()
            )));
        }
        if state.is_full {
            return Err(AppError::Conflict(format!(
                "This {} is full",
                request.target.kind()
            )));
        }

        add_member(&txn, request.target, request.user_id).await?;
        if !request_repo
            .resolve(id, JoinRequestStatus::Approved, Some(reviewer.id), None, now)
            .await?
        {
            return Err(not_pending());
        }

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(reviewer.id),
                action: action::JOIN_REQUEST_APPROVED,
                target_type: "join_request",
                target_id: Some(id),
                details: json!({
                    "user_id": request.user_id,
                    "target_type": request.target.kind(),
                    "target_id": request.target.id(),
                }),
            })
            .await?;

        let approved = request_repo
            .find_by_id(id)
            .await?
            .ok_or_else(request_not_found)?;
        txn.commit().await?;

        NotificationService::new(self.db, self.mailer)
            .notify(
                &[request.user_id],
                NewNotification::new(
                    NotificationKind::JoinRequestApproved,
                    "Join request approved",
                    format!("You are now a member of {}", state.name),
                )
                .with_link(request.target.link()),
            )
            .await?;

        Ok(approved)
    }

    /// Rejects a pending request, optionally with a reason shown to the requester.
    pub async fn reject(
        &self,
        reviewer: &User,
        id: i32,
        reason: Option<String>,
    ) -> Result<JoinRequest, AppError> {
        let reason = validate::optional_text("reason", reason.as_deref(), MAX_MESSAGE_LEN)?;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let request_repo = JoinRequestRepository::new(&txn);

        let request = find_pending_request(&request_repo, id).await?;
        let name = target_name(&txn, request.target).await?;

        if !request_repo
            .resolve(
                id,
                JoinRequestStatus::Rejected,
                Some(reviewer.id),
                reason.clone(),
                now,
            )
            .await?
        {
            return Err(not_pending());
        }

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(reviewer.id),
                action: action::JOIN_REQUEST_REJECTED,
                target_type: "join_request",
                target_id: Some(id),
                details: json!({
                    "user_id": request.user_id,
                    "target_type": request.target.kind(),
                    "target_id": request.target.id(),
                    "reason": reason,
                }),
            })
            .await?;

        let rejected = request_repo
            .find_by_id(id)
            .await?
            .ok_or_else(request_not_found)?;
        txn.commit().await?;

        let body = match &reason {
            Some(reason) => format!("Your request to join {} was declined: {}", name, reason),
            None => format!("Your request to join {} was declined", name),
        };

        NotificationService::new(self.db, self.mailer)
            .notify(
                &[request.user_id],
                NewNotification::new(
                    NotificationKind::JoinRequestRejected,
                    "Join request declined",
                    body,
                ),
            )
            .await?;

        Ok(rejected)
    }

    /// Withdraws the caller's own pending request.
    pub async fn cancel(&self, user_id: i32, id: i32) -> Result<JoinRequest, AppError> {
        let request_repo = JoinRequestRepository::new(self.db);

        let request = request_repo
            .find_by_id(id)
            .await?
            .ok_or_else(request_not_found)?;

        if request.user_id != user_id {
            return Err(AuthError::AccessDenied(
                user_id,
                format!("Join request {} belongs to user {}", id, request.user_id),
            )
            .into());
        }

        if !request_repo
            .resolve(id, JoinRequestStatus::Cancelled, None, None, Utc::now())
            .await?
        {
            return Err(not_pending());
        }

        request_repo
            .find_by_id(id)
            .await?
            .ok_or_else(request_not_found)
    }

    /// Pending requests for a target, oldest first.
    pub async fn list_pending(&self, target: JoinTarget) -> Result<Vec<JoinRequest>, AppError> {
        target_state(self.db, target).await?;

        JoinRequestRepository::new(self.db)
            .get_pending_for_target(target)
            .await
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<JoinRequest>, AppError> {
        JoinRequestRepository::new(self.db)
            .get_for_user(user_id)
            .await
    }
}

async fn find_pending_request<C: ConnectionTrait>(
    repo: &JoinRequestRepository<'_, C>,
    id: i32,
) -> Result<JoinRequest, AppError> {
    let request = repo.find_by_id(id).await?.ok_or_else(request_not_found)?;

    if !request.is_pending() {
        return Err(not_pending());
    }

    Ok(request)
}

/// Loads a target's approval and capacity state.
///
/// # Returns
/// - `Err(AppError::NotFound)` - Target does not exist or is deleted
async fn target_state<C: ConnectionTrait>(
    db: &C,
    target: JoinTarget,
) -> Result<TargetState, AppError> {
    match target {
        JoinTarget::Hub(id) => {
            let hub = HubRepository::new(db)
                .find_by_id(id)
                .await?
                .ok_or_else(|| target_not_found(target))?;
            let count = HubMemberRepository::new(db).count(id).await?;

            Ok(TargetState {
                is_full: hub.is_full(count),
                needs_approval: hub.is_private,
                required_hub: None,
                name: hub.name,
            })
        }
        JoinTarget::Project(id) => {
            let project = ProjectRepository::new(db)
                .find_by_id(id)
                .await?
                .ok_or_else(|| target_not_found(target))?;
            let count = ProjectMemberRepository::new(db).count(id).await?;

            Ok(TargetState {
                is_full: project.is_full(count),
                needs_approval: true,
                required_hub: Some(project.hub_id),
                name: project.name,
            })
        }
        JoinTarget::Programme(id) => {
            let programme = ProgrammeRepository::new(db)
                .find_by_id(id)
                .await?
                .ok_or_else(|| target_not_found(target))?;
            let count = ProgrammeMemberRepository::new(db).count(id).await?;

            Ok(TargetState {
                is_full: programme.is_full(count),
                needs_approval: programme.requires_approval,
                required_hub: None,
                name: programme.name,
            })
        }
    }
}

async fn target_name<C: ConnectionTrait>(db: &C, target: JoinTarget) -> Result<String, AppError> {
    let name = match target {
        JoinTarget::Hub(id) => HubRepository::new(db).find_by_id(id).await?.map(|h| h.name),
        JoinTarget::Project(id) => ProjectRepository::new(db)
            .find_by_id(id)
            .await?
            .map(|p| p.name),
        JoinTarget::Programme(id) => ProgrammeRepository::new(db)
            .find_by_id(id)
            .await?
            .map(|p| p.name),
    };

    name.ok_or_else(|| target_not_found(target))
}

async fn is_member<C: ConnectionTrait>(
    db: &C,
    target: JoinTarget,
    user_id: i32,
) -> Result<bool, AppError> {
    Ok(match target {
        JoinTarget::Hub(id) => HubMemberRepository::new(db)
            .find_role(id, user_id)
            .await?
            .is_some(),
        JoinTarget::Project(id) => ProjectMemberRepository::new(db)
            .find_role(id, user_id)
            .await?
            .is_some(),
        JoinTarget::Programme(id) => ProgrammeMemberRepository::new(db)
            .is_member(id, user_id)
            .await?,
    })
}

async fn add_member<C: ConnectionTrait>(
    db: &C,
    target: JoinTarget,
    user_id: i32,
) -> Result<(), AppError> {
    match target {
        JoinTarget::Hub(id) => {
            HubMemberRepository::new(db)
                .add(id, user_id, HubRole::Member)
                .await?
        }
        JoinTarget::Project(id) => {
            ProjectMemberRepository::new(db)
                .add(id, user_id, ProjectRole::Member)
                .await?
        }
        JoinTarget::Programme(id) => ProgrammeMemberRepository::new(db).add(id, user_id).await?,
    }

    Ok(())
}

/// Users who may review requests for a target: hub managers, plus the owner for projects.
async fn manager_ids<C: ConnectionTrait>(db: &C, target: JoinTarget) -> Result<Vec<i32>, AppError> {
    let member_repo = HubMemberRepository::new(db);

    let ids = match target {
        JoinTarget::Hub(id) => member_repo.manager_ids(id).await?,
        JoinTarget::Project(id) => {
            let project = ProjectRepository::new(db)
                .find_by_id(id)
                .await?
                .ok_or_else(|| target_not_found(target))?;
            let mut ids = member_repo.manager_ids(project.hub_id).await?;
            if !ids.contains(&project.owner_id) {
                ids.push(project.owner_id);
            }
            ids
        }
        JoinTarget::Programme(id) => {
            let programme = ProgrammeRepository::new(db)
                .find_by_id(id)
                .await?
                .ok_or_else(|| target_not_found(target))?;
            member_repo.manager_ids(programme.hub_id).await?
        }
    };

    Ok(ids)
}

fn target_not_found(target: JoinTarget) -> AppError {
    let kind = target.kind();
    let mut name = kind[..1].to_uppercase();
    name.push_str(&kind[1..]);
    AppError::NotFound(format!("{} not found", name))
}

fn request_not_found() -> AppError {
    AppError::NotFound("Join request not found".to_string())
}

fn not_pending() -> AppError {
    AppError::BadRequest("The join request is no longer pending".to_string())
}
