//! Hub lifecycle and membership management.

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::collections::HashMap;

use crate::{
    model::hub::{CreateHubDto, UpdateHubDto},
    server::{
        data::{
            audit_log::AuditLogRepository, hub::HubRepository, hub_member::HubMemberRepository,
            join_request::JoinRequestRepository,
        },
        error::AppError,
        model::{
            audit::{action, RecordAuditParam},
            hub::{CreateHubParam, HubFilter, HubMember, HubRole, HubWithStats, UpdateHubParam},
            notification::{NewNotification, NotificationKind},
            pagination::{PageParam, Paginated},
            setting::SettingKey,
            user::User,
        },
        service::{
            notification::{email::Mailer, NotificationService},
            setting::int_setting,
        },
        util::{parse::parse_input, validate},
    },
};

const MAX_DESCRIPTION_LEN: usize = 2000;

pub struct HubService<'a> {
    db: &'a DatabaseConnection,
    mailer: Option<&'a Mailer>,
}

impl<'a> HubService<'a> {
    pub fn new(db: &'a DatabaseConnection, mailer: Option<&'a Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Creates a hub owned by `actor`.
    ///
    /// The ownership limit, name uniqueness check and both inserts share one transaction.
    ///
    /// # Returns
    /// - `Ok(HubWithStats)` - The new hub with the actor as owner
    /// - `Err(AppError::BadRequest)` - Invalid field
    /// - `Err(AppError::Conflict)` - Name in use, or the actor owns too many hubs
    pub async fn create(&self, actor: &User, dto: CreateHubDto) -> Result<HubWithStats, AppError> {
        let param = CreateHubParam {
            owner_id: actor.id,
            name: validate::text("name", &dto.name, 3, 100)?,
            description: validate::text("description", &dto.description, 0, MAX_DESCRIPTION_LEN)?,
            category: validate::text("category", &dto.category, 1, 50)?,
            is_private: dto.is_private,
            max_members: validate::positive("max_members", dto.max_members)?,
        };

        let txn = self.db.begin().await?;
        let hub_repo = HubRepository::new(&txn);

        if !actor.admin {
            let limit = int_setting(&txn, SettingKey::MaxHubsPerUser).await?;
            let owned = hub_repo.count_owned_by(actor.id).await?;
            if owned as i64 >= limit {
                return Err(AppError::Conflict(format!(
                    "You can own at most {} hubs",
                    limit
                )));
            }
        }

        if hub_repo.name_taken(&param.name, None).await? {
            return Err(AppError::Conflict(format!(
                "A hub named '{}' already exists",
                param.name
            )));
        }

        let hub = hub_repo.create(param).await?;
        txn.commit().await?;

        tracing::info!("User {} created hub {} ({})", actor.id, hub.id, hub.name);

        Ok(HubWithStats {
            hub,
            member_count: 1,
            my_role: Some(HubRole::Owner),
        })
    }

    /// Lists hubs with member counts and the caller's role in each.
    pub async fn list(
        &self,
        user_id: i32,
        filter: HubFilter,
        page: PageParam,
    ) -> Result<Paginated<HubWithStats>, AppError> {
        let hubs = HubRepository::new(self.db)
            .get_paginated(&filter, page)
            .await?;

        let member_repo = HubMemberRepository::new(self.db);
        let ids: Vec<i32> = hubs.items.iter().map(|h| h.id).collect();
        let counts = member_repo.counts(&ids).await?;
        let roles: HashMap<i32, HubRole> = member_repo
            .memberships_for_user(user_id)
            .await?
            .into_iter()
            .map(|m| (m.hub_id, m.role))
            .collect();

        Ok(hubs.map(|hub| HubWithStats {
            member_count: counts.get(&hub.id).copied().unwrap_or(0),
            my_role: roles.get(&hub.id).copied(),
            hub,
        }))
    }

    pub async fn get(&self, id: i32, user_id: i32) -> Result<HubWithStats, AppError> {
        let hub = HubRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(hub_not_found)?;

        let member_repo = HubMemberRepository::new(self.db);
        let member_count = member_repo.count(id).await?;
        let my_role = member_repo.find_role(id, user_id).await?;

        Ok(HubWithStats {
            hub,
            member_count,
            my_role,
        })
    }

    /// Applies hub changes.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Invalid field, or `max_members` below the member count
    /// - `Err(AppError::Conflict)` - New name already in use
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        dto: UpdateHubDto,
    ) -> Result<HubWithStats, AppError> {
        let param = UpdateHubParam {
            name: dto
                .name
                .map(|n| validate::text("name", &n, 3, 100))
                .transpose()?,
            description: dto
                .description
                .map(|d| validate::text("description", &d, 0, MAX_DESCRIPTION_LEN))
                .transpose()?,
            category: dto
                .category
                .map(|c| validate::text("category", &c, 1, 50))
                .transpose()?,
            is_private: dto.is_private,
            max_members: validate::positive("max_members", dto.max_members)?,
        };

        let txn = self.db.begin().await?;
        let hub_repo = HubRepository::new(&txn);
        let member_repo = HubMemberRepository::new(&txn);

        if hub_repo.find_by_id(id).await?.is_none() {
            return Err(hub_not_found());
        }

        if let Some(name) = &param.name {
            if hub_repo.name_taken(name, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "A hub named '{}' already exists",
                    name
                )));
            }
        }

        let member_count = member_repo.count(id).await?;
        if let Some(max_members) = param.max_members {
            if (max_members as u64) < member_count {
                return Err(AppError::BadRequest(format!(
                    "max_members cannot be below the current member count ({})",
                    member_count
                )));
            }
        }

        let hub = hub_repo.update(id, param).await?.ok_or_else(hub_not_found)?;
        let my_role = member_repo.find_role(id, user_id).await?;
        txn.commit().await?;

        Ok(HubWithStats {
            hub,
            member_count,
            my_role,
        })
    }

    /// Soft-deletes a hub and records it in the audit log.
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let hub_repo = HubRepository::new(&txn);

        let hub = hub_repo.find_by_id(id).await?.ok_or_else(hub_not_found)?;
        hub_repo.soft_delete(id).await?;
        let cancelled = JoinRequestRepository::new(&txn)
            .cancel_pending_for_hub(id, Utc::now())
            .await?;

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: action::HUB_DELETED,
                target_type: "hub",
                target_id: Some(id),
                details: json!({ "name": hub.name, "cancelled_requests": cancelled }),
            })
            .await?;

        txn.commit().await?;

        tracing::info!("User {} deleted hub {}", actor.id, id);

        Ok(())
    }

    pub async fn members(&self, id: i32) -> Result<Vec<HubMember>, AppError> {
        if HubRepository::new(self.db).find_by_id(id).await?.is_none() {
            return Err(hub_not_found());
        }

        HubMemberRepository::new(self.db).get_members(id).await
    }

    /// Removes a member from a hub and notifies them.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Target is the owner
    /// - `Err(AppError::NotFound)` - Hub missing or target not a member
    pub async fn remove_member(&self, hub_id: i32, user_id: i32) -> Result<(), AppError> {
        let hub = HubRepository::new(self.db)
            .find_by_id(hub_id)
            .await?
            .ok_or_else(hub_not_found)?;

        let member_repo = HubMemberRepository::new(self.db);
        match member_repo.find_role(hub_id, user_id).await? {
            None => return Err(AppError::NotFound("User is not a member".to_string())),
            Some(HubRole::Owner) => {
                return Err(AppError::BadRequest(
                    "The hub owner cannot be removed".to_string(),
                ))
            }
            Some(_) => {}
        }

        member_repo.remove(hub_id, user_id).await?;

        NotificationService::new(self.db, self.mailer)
            .notify(
                &[user_id],
                NewNotification::new(
                    NotificationKind::RemovedFromGroup,
                    "Removed from hub",
                    format!("You were removed from {}", hub.name),
                ),
            )
            .await?;

        Ok(())
    }

    /// Changes a member's role between `admin` and `member`.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Role is not admin/member, or target is the owner
    /// - `Err(AppError::NotFound)` - Hub missing or target not a member
    pub async fn set_member_role(
        &self,
        hub_id: i32,
        user_id: i32,
        role: &str,
    ) -> Result<(), AppError> {
        let role: HubRole = parse_input("role", role)?;
        if role == HubRole::Owner {
            return Err(AppError::BadRequest(
                "Ownership cannot be assigned".to_string(),
            ));
        }

        let hub = HubRepository::new(self.db)
            .find_by_id(hub_id)
            .await?
            .ok_or_else(hub_not_found)?;

        let member_repo = HubMemberRepository::new(self.db);
        match member_repo.find_role(hub_id, user_id).await? {
            None => return Err(AppError::NotFound("User is not a member".to_string())),
            Some(HubRole::Owner) => {
                return Err(AppError::BadRequest(
                    "The hub owner's role cannot be changed".to_string(),
                ))
            }
            Some(current) if current == role => return Ok(()),
            Some(_) => {}
        }

        member_repo.set_role(hub_id, user_id, role).await?;

        NotificationService::new(self.db, self.mailer)
            .notify(
                &[user_id],
                NewNotification::new(
                    NotificationKind::RoleChanged,
                    "Role changed",
                    format!("You are now {} of {}", role, hub.name),
                )
                .with_link(format!("/hubs/{}", hub_id)),
            )
            .await?;

        Ok(())
    }

    /// Removes the caller from a hub. The owner cannot leave.
    pub async fn leave(&self, hub_id: i32, user_id: i32) -> Result<(), AppError> {
        if HubRepository::new(self.db)
            .find_by_id(hub_id)
            .await?
            .is_none()
        {
            return Err(hub_not_found());
        }

        let member_repo = HubMemberRepository::new(self.db);
        match member_repo.find_role(hub_id, user_id).await? {
            None => Err(AppError::NotFound("You are not a member".to_string())),
            Some(HubRole::Owner) => Err(AppError::BadRequest(
                "The hub owner cannot leave the hub".to_string(),
            )),
            Some(_) => {
                member_repo.remove(hub_id, user_id).await?;
                Ok(())
            }
        }
    }
}

fn hub_not_found() -> AppError {
    AppError::NotFound("Hub not found".to_string())
}
