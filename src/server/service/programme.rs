//! Hub-scoped programmes with enrolment capacity.

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::programme::{CreateProgrammeDto, UpdateProgrammeDto},
    server::{
        data::{
            audit_log::AuditLogRepository, hub::HubRepository, programme::ProgrammeRepository,
            programme_member::ProgrammeMemberRepository,
        },
        error::AppError,
        model::{
            audit::{action, RecordAuditParam},
            pagination::{PageParam, Paginated},
            programme::{
                CreateProgrammeParam, ProgrammeMember, ProgrammeWithStats, UpdateProgrammeParam,
            },
            user::User,
        },
        util::validate,
    },
};

const MAX_DESCRIPTION_LEN: usize = 2000;

pub struct ProgrammeService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProgrammeService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        actor: &User,
        hub_id: i32,
        dto: CreateProgrammeDto,
    ) -> Result<ProgrammeWithStats, AppError> {
        if let (Some(starts_at), Some(ends_at)) = (dto.starts_at, dto.ends_at) {
            validate::time_range(starts_at, ends_at)?;
        }

        let param = CreateProgrammeParam {
            hub_id,
            created_by: actor.id,
            name: validate::text("name", &dto.name, 3, 100)?,
            description: validate::text("description", &dto.description, 0, MAX_DESCRIPTION_LEN)?,
            capacity: validate::positive("capacity", dto.capacity)?,
            requires_approval: dto.requires_approval,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
        };

        if HubRepository::new(self.db).find_by_id(hub_id).await?.is_none() {
            return Err(AppError::NotFound("Hub not found".to_string()));
        }

        let programme = ProgrammeRepository::new(self.db).create(param).await?;

        tracing::info!(
            "User {} created programme {} in hub {}",
            actor.id,
            programme.id,
            hub_id
        );

        Ok(ProgrammeWithStats {
            programme,
            member_count: 0,
        })
    }

    /// Lists programmes across all hubs, or within one hub when `hub_id` is given.
    pub async fn list(
        &self,
        hub_id: Option<i32>,
        page: PageParam,
    ) -> Result<Paginated<ProgrammeWithStats>, AppError> {
        let hub_ids = match hub_id {
            Some(id) => {
                if HubRepository::new(self.db).find_by_id(id).await?.is_none() {
                    return Err(AppError::NotFound("Hub not found".to_string()));
                }
                Some(vec![id])
            }
            None => Some(
                HubRepository::new(self.db)
                    .get_all_active()
                    .await?
                    .into_iter()
                    .map(|hub| hub.id)
                    .collect(),
            ),
        };

        let programmes = ProgrammeRepository::new(self.db)
            .get_paginated(hub_ids.as_deref(), page)
            .await?;

        let ids: Vec<i32> = programmes.items.iter().map(|p| p.id).collect();
        let counts = ProgrammeMemberRepository::new(self.db).counts(&ids).await?;

        Ok(programmes.map(|programme| ProgrammeWithStats {
            member_count: counts.get(&programme.id).copied().unwrap_or(0),
            programme,
        }))
    }

    pub async fn get(&self, id: i32) -> Result<ProgrammeWithStats, AppError> {
        let programme = ProgrammeRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(programme_not_found)?;
        let member_count = ProgrammeMemberRepository::new(self.db).count(id).await?;

        Ok(ProgrammeWithStats {
            programme,
            member_count,
        })
    }

    /// Applies programme changes. Capacity cannot drop below current enrolment.
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateProgrammeDto,
    ) -> Result<ProgrammeWithStats, AppError> {
        let param = UpdateProgrammeParam {
            name: dto
                .name
                .map(|n| validate::text("name", &n, 3, 100))
                .transpose()?,
            description: dto
                .description
                .map(|d| validate::text("description", &d, 0, MAX_DESCRIPTION_LEN))
                .transpose()?,
            capacity: validate::positive("capacity", dto.capacity)?,
            requires_approval: dto.requires_approval,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
        };

        let txn = self.db.begin().await?;
        let repo = ProgrammeRepository::new(&txn);

        let current = repo.find_by_id(id).await?.ok_or_else(programme_not_found)?;

        let starts_at = param.starts_at.or(current.starts_at);
        let ends_at = param.ends_at.or(current.ends_at);
        if let (Some(starts_at), Some(ends_at)) = (starts_at, ends_at) {
            validate::time_range(starts_at, ends_at)?;
        }

        let member_count = ProgrammeMemberRepository::new(&txn).count(id).await?;
        if let Some(capacity) = param.capacity {
            if (capacity as u64) < member_count {
                return Err(AppError::BadRequest(format!(
                    "capacity cannot be below the current enrolment ({})",
                    member_count
                )));
            }
        }

        let programme = repo
            .update(id, param)
            .await?
            .ok_or_else(programme_not_found)?;
        txn.commit().await?;

        Ok(ProgrammeWithStats {
            programme,
            member_count,
        })
    }

    /// Soft-deletes a programme and records it in the audit log.
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let repo = ProgrammeRepository::new(&txn);

        let programme = repo.find_by_id(id).await?.ok_or_else(programme_not_found)?;
        repo.soft_delete(id).await?;

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: action::PROGRAMME_DELETED,
                target_type: "programme",
                target_id: Some(id),
                details: json!({ "name": programme.name, "hub_id": programme.hub_id }),
            })
            .await?;

        txn.commit().await?;

        Ok(())
    }

    pub async fn members(&self, id: i32) -> Result<Vec<ProgrammeMember>, AppError> {
        if ProgrammeRepository::new(self.db)
            .find_by_id(id)
            .await?
            .is_none()
        {
            return Err(programme_not_found());
        }

        Ok(ProgrammeMemberRepository::new(self.db)
            .get_members(id)
            .await?)
    }

    pub async fn leave(&self, programme_id: i32, user_id: i32) -> Result<(), AppError> {
        if ProgrammeRepository::new(self.db)
            .find_by_id(programme_id)
            .await?
            .is_none()
        {
            return Err(programme_not_found());
        }

        let removed = ProgrammeMemberRepository::new(self.db)
            .remove(programme_id, user_id)
            .await?;

        if !removed {
            return Err(AppError::NotFound("You are not enrolled".to_string()));
        }

        Ok(())
    }
}

fn programme_not_found() -> AppError {
    AppError::NotFound("Programme not found".to_string())
}
