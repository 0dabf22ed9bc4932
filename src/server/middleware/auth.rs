//! Authorization guard for API handlers.
//!
//! `AuthGuard` resolves the logged-in user from the session and checks a list of
//! `Permission`s against hub, project and programme roles. Platform admins pass every
//! permission check. Deactivated accounts are rejected before any permission is checked.

use sea_orm::ConnectionTrait;
use tower_sessions::Session;

use crate::server::{
    data::{
        event::EventRepository, hub::HubRepository, hub_member::HubMemberRepository,
        join_request::JoinRequestRepository, programme::ProgrammeRepository,
        project::ProjectRepository, project_member::ProjectMemberRepository,
        user::UserRepository,
    },
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
    model::{hub::HubRole, join_request::JoinTarget, project::ProjectRole, user::User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Platform administrator.
    Admin,
    /// Any member of the hub.
    HubMember(i32),
    /// Owner or admin member of the hub.
    HubManage(i32),
    /// Owner of the hub.
    HubOwner(i32),
    /// Project owner or manager of the project's hub.
    ProjectManage(i32),
    /// Manager of the programme's hub.
    ProgrammeManage(i32),
    /// Manager of the event's hub.
    EventManage(i32),
    /// Manager of the hub, project or programme a join request targets.
    JoinRequestReview(i32),
}

pub struct AuthGuard<'a, C: ConnectionTrait> {
    db: &'a C,
    session: &'a Session,
}

impl<'a, C: ConnectionTrait> AuthGuard<'a, C> {
    pub fn new(db: &'a C, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Returns the logged-in user if every permission holds.
    ///
    /// # Returns
    /// - `Ok(User)` - Authenticated, active and permitted
    /// - `Err(AuthError::UserNotInSession)` - Not logged in
    /// - `Err(AuthError::UserNotInDatabase)` - Session references a missing user
    /// - `Err(AuthError::AccountDeactivated)` - Account was deactivated
    /// - `Err(AuthError::AccessDenied)` - A permission check failed
    /// - `Err(AppError::NotFound)` - A permission references a missing or deleted resource
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        let Some(user) = UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
        else {
            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        if !user.is_active() {
            return Err(AuthError::AccountDeactivated(user.id).into());
        }

        for permission in permissions {
            if !has_permission(self.db, &user, *permission).await? {
                return Err(AuthError::AccessDenied(
                    user.id,
                    format!("User lacks required permission {:?}", permission),
                )
                .into());
            }
        }

        Ok(user)
    }
}

/// Checks a single permission for an already authenticated user.
///
/// Resources referenced by the permission must exist, so that a missing hub gives
/// 404 rather than 403 regardless of who asks.
pub async fn has_permission<C: ConnectionTrait>(
    db: &C,
    user: &User,
    permission: Permission,
) -> Result<bool, AppError> {
    match permission {
        Permission::Admin => Ok(user.admin),
        Permission::HubMember(hub_id) => {
            let role = hub_role(db, hub_id, user.id).await?;
            Ok(user.admin || role.is_some())
        }
        Permission::HubManage(hub_id) => {
            let role = hub_role(db, hub_id, user.id).await?;
            Ok(user.admin || role.is_some_and(|r| r.is_manager()))
        }
        Permission::HubOwner(hub_id) => {
            let role = hub_role(db, hub_id, user.id).await?;
            Ok(user.admin || role == Some(HubRole::Owner))
        }
        Permission::ProjectManage(project_id) => {
            let Some(project) = ProjectRepository::new(db).find_by_id(project_id).await? else {
                return Err(AppError::NotFound("Project not found".to_string()));
            };
            if user.admin {
                return Ok(true);
            }

            let project_role = ProjectMemberRepository::new(db)
                .find_role(project_id, user.id)
                .await?;
            if project_role == Some(ProjectRole::Owner) {
                return Ok(true);
            }

            let role = hub_role(db, project.hub_id, user.id).await?;
            Ok(role.is_some_and(|r| r.is_manager()))
        }
        Permission::ProgrammeManage(programme_id) => {
            let Some(programme) = ProgrammeRepository::new(db).find_by_id(programme_id).await?
            else {
                return Err(AppError::NotFound("Programme not found".to_string()));
            };
            let role = hub_role(db, programme.hub_id, user.id).await?;
            Ok(user.admin || role.is_some_and(|r| r.is_manager()))
        }
        Permission::EventManage(event_id) => {
            let Some(event) = EventRepository::new(db).find_by_id(event_id).await? else {
                return Err(AppError::NotFound("Event not found".to_string()));
            };
            let role = hub_role(db, event.hub_id, user.id).await?;
            Ok(user.admin || role.is_some_and(|r| r.is_manager()))
        }
        Permission::JoinRequestReview(request_id) => {
            let Some(request) = JoinRequestRepository::new(db).find_by_id(request_id).await?
            else {
                return Err(AppError::NotFound("Join request not found".to_string()));
            };
            let permission = match request.target {
                JoinTarget::Hub(id) => Permission::HubManage(id),
                JoinTarget::Project(id) => Permission::ProjectManage(id),
                JoinTarget::Programme(id) => Permission::ProgrammeManage(id),
            };
            Box::pin(has_permission(db, user, permission)).await
        }
    }
}

/// Looks up a user's role in an existing hub.
async fn hub_role<C: ConnectionTrait>(
    db: &C,
    hub_id: i32,
    user_id: i32,
) -> Result<Option<HubRole>, AppError> {
    if HubRepository::new(db).find_by_id(hub_id).await?.is_none() {
        return Err(AppError::NotFound("Hub not found".to_string()));
    }

    HubMemberRepository::new(db).find_role(hub_id, user_id).await
}
