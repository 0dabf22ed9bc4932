//! Hub-scoped projects.

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::project::{CreateProjectDto, UpdateProjectDto},
    server::{
        data::{
            audit_log::AuditLogRepository, hub::HubRepository, project::ProjectRepository,
            project_member::ProjectMemberRepository,
        },
        error::AppError,
        model::{
            audit::{action, RecordAuditParam},
            notification::{NewNotification, NotificationKind},
            pagination::{PageParam, Paginated},
            project::{
                CreateProjectParam, ProjectMember, ProjectRole, ProjectStatus, ProjectWithStats,
                UpdateProjectParam,
            },
            user::User,
        },
        service::notification::{email::Mailer, NotificationService},
        util::{parse::parse_input, validate},
    },
};

const MAX_DESCRIPTION_LEN: usize = 2000;

pub struct ProjectService<'a> {
    db: &'a DatabaseConnection,
    mailer: Option<&'a Mailer>,
}

impl<'a> ProjectService<'a> {
    pub fn new(db: &'a DatabaseConnection, mailer: Option<&'a Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Creates a project in a hub with `actor` as its owner.
    pub async fn create(
        &self,
        actor: &User,
        hub_id: i32,
        dto: CreateProjectDto,
    ) -> Result<ProjectWithStats, AppError> {
        let status = match dto.status.as_deref() {
            Some(status) => parse_input("status", status)?,
            None => ProjectStatus::default(),
        };

        let param = CreateProjectParam {
            hub_id,
            owner_id: actor.id,
            name: validate::text("name", &dto.name, 3, 100)?,
            description: validate::text("description", &dto.description, 0, MAX_DESCRIPTION_LEN)?,
            status,
            max_members: validate::positive("max_members", dto.max_members)?,
        };

        let txn = self.db.begin().await?;

        if HubRepository::new(&txn).find_by_id(hub_id).await?.is_none() {
            return Err(AppError::NotFound("Hub not found".to_string()));
        }

        let project = ProjectRepository::new(&txn).create(param).await?;
        txn.commit().await?;

        tracing::info!(
            "User {} created project {} in hub {}",
            actor.id,
            project.id,
            hub_id
        );

        Ok(ProjectWithStats {
            project,
            member_count: 1,
        })
    }

    pub async fn list_by_hub(
        &self,
        hub_id: i32,
        page: PageParam,
    ) -> Result<Paginated<ProjectWithStats>, AppError> {
        if HubRepository::new(self.db).find_by_id(hub_id).await?.is_none() {
            return Err(AppError::NotFound("Hub not found".to_string()));
        }

        let projects = ProjectRepository::new(self.db)
            .get_paginated_by_hub(hub_id, page)
            .await?;

        let ids: Vec<i32> = projects.items.iter().map(|p| p.id).collect();
        let counts = ProjectMemberRepository::new(self.db).counts(&ids).await?;

        Ok(projects.map(|project| ProjectWithStats {
            member_count: counts.get(&project.id).copied().unwrap_or(0),
            project,
        }))
    }

    pub async fn get(&self, id: i32) -> Result<ProjectWithStats, AppError> {
        let project = ProjectRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(project_not_found)?;
        let member_count = ProjectMemberRepository::new(self.db).count(id).await?;

        Ok(ProjectWithStats {
            project,
            member_count,
        })
    }

    /// Applies project changes. `max_members` cannot drop below the member count.
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateProjectDto,
    ) -> Result<ProjectWithStats, AppError> {
        let param = UpdateProjectParam {
            name: dto
                .name
                .map(|n| validate::text("name", &n, 3, 100))
                .transpose()?,
            description: dto
                .description
                .map(|d| validate::text("description", &d, 0, MAX_DESCRIPTION_LEN))
                .transpose()?,
            status: dto
                .status
                .map(|s| parse_input::<ProjectStatus>("status", &s))
                .transpose()?,
            max_members: validate::positive("max_members", dto.max_members)?,
        };

        let txn = self.db.begin().await?;
        let member_count = ProjectMemberRepository::new(&txn).count(id).await?;

        if let Some(max_members) = param.max_members {
            if (max_members as u64) < member_count {
                return Err(AppError::BadRequest(format!(
                    "max_members cannot be below the current member count ({})",
                    member_count
                )));
            }
        }

        let project = ProjectRepository::new(&txn)
            .update(id, param)
            .await?
            .ok_or_else(project_not_found)?;
        txn.commit().await?;

        Ok(ProjectWithStats {
            project,
            member_count,
        })
    }

    /// Soft-deletes a project and records it in the audit log.
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let repo = ProjectRepository::new(&txn);

        let project = repo.find_by_id(id).await?.ok_or_else(project_not_found)?;
        repo.soft_delete(id).await?;

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: action::PROJECT_DELETED,
                target_type: "project",
                target_id: Some(id),
                details: json!({ "name": project.name, "hub_id": project.hub_id }),
            })
            .await?;

        txn.commit().await?;

        Ok(())
    }

    pub async fn members(&self, id: i32) -> Result<Vec<ProjectMember>, AppError> {
        if ProjectRepository::new(self.db).find_by_id(id).await?.is_none() {
            return Err(project_not_found());
        }

        ProjectMemberRepository::new(self.db).get_members(id).await
    }

    /// Removes a member from a project and notifies them. The owner cannot be removed.
    pub async fn remove_member(&self, project_id: i32, user_id: i32) -> Result<(), AppError> {
        let project = ProjectRepository::new(self.db)
            .find_by_id(project_id)
            .await?
            .ok_or_else(project_not_found)?;

        let member_repo = ProjectMemberRepository::new(self.db);
        match member_repo.find_role(project_id, user_id).await? {
            None => return Err(AppError::NotFound("User is not a member".to_string())),
            Some(ProjectRole::Owner) => {
                return Err(AppError::BadRequest(
                    "The project owner cannot be removed".to_string(),
                ))
            }
            Some(ProjectRole::Member) => {}
        }

        member_repo.remove(project_id, user_id).await?;

        NotificationService::new(self.db, self.mailer)
            .notify(
                &[user_id],
                NewNotification::new(
                    NotificationKind::RemovedFromGroup,
                    "Removed from project",
                    format!("You were removed from {}", project.name),
                ),
            )
            .await?;

        Ok(())
    }

    /// Removes the caller from a project. The owner cannot leave.
    pub async fn leave(&self, project_id: i32, user_id: i32) -> Result<(), AppError> {
        if ProjectRepository::new(self.db)
            .find_by_id(project_id)
            .await?
            .is_none()
        {
            return Err(project_not_found());
        }

        let member_repo = ProjectMemberRepository::new(self.db);
        match member_repo.find_role(project_id, user_id).await? {
            None => Err(AppError::NotFound("You are not a member".to_string())),
            Some(ProjectRole::Owner) => Err(AppError::BadRequest(
                "The project owner cannot leave the project".to_string(),
            )),
            Some(ProjectRole::Member) => {
                member_repo.remove(project_id, user_id).await?;
                Ok(())
            }
        }
    }
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}
