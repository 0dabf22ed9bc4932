//! Hub membership repository.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

use crate::server::{
    error::AppError,
    model::{
        hub::{HubMember, HubRole},
        user::HubMembership,
    },
    util::parse::parse_stored,
};

pub struct HubMemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> HubMemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Adds a member to a hub.
    ///
    /// # Returns
    /// - `Ok(())` - Member added
    /// - `Err(DbErr)` - Database error, including the unique (hub, user) violation
    pub async fn add(&self, hub_id: i32, user_id: i32, role: HubRole) -> Result<(), DbErr> {
        entity::hub_member::ActiveModel {
            hub_id: ActiveValue::Set(hub_id),
            user_id: ActiveValue::Set(user_id),
            role: ActiveValue::Set(role.to_string()),
            joined_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Gets a user's role in a hub.
    ///
    /// # Returns
    /// - `Ok(Some(HubRole))` - User is a member
    /// - `Ok(None)` - User is not a member
    /// - `Err(AppError)` - Database error or unknown stored role
    pub async fn find_role(&self, hub_id: i32, user_id: i32) -> Result<Option<HubRole>, AppError> {
        let entity = entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::HubId.eq(hub_id))
            .filter(entity::hub_member::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        entity
            .map(|m| parse_stored("hub_member.role", m.role))
            .transpose()
    }

    /// Gets every member of a hub with their names, owner first then by join time.
    pub async fn get_members(&self, hub_id: i32) -> Result<Vec<HubMember>, AppError> {
        let rows = entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::HubId.eq(hub_id))
            .find_also_related(entity::prelude::User)
            .order_by_asc(entity::hub_member::Column::JoinedAt)
            .order_by_asc(entity::hub_member::Column::Id)
            .all(self.db)
            .await?;

        let mut members = rows
            .into_iter()
            .map(|(member, user)| {
                Ok(HubMember {
                    user_id: member.user_id,
                    name: user.map(|u| u.name).unwrap_or_default(),
                    role: parse_stored("hub_member.role", member.role)?,
                    joined_at: member.joined_at,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        members.sort_by_key(|m| m.role != HubRole::Owner);

        Ok(members)
    }

    /// Removes a member from a hub.
    ///
    /// # Returns
    /// - `Ok(true)` - Membership removed
    /// - `Ok(false)` - User was not a member
    pub async fn remove(&self, hub_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::HubMember::delete_many()
            .filter(entity::hub_member::Column::HubId.eq(hub_id))
            .filter(entity::hub_member::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Changes a member's role.
    ///
    /// # Returns
    /// - `Ok(true)` - Role updated
    /// - `Ok(false)` - User is not a member
    pub async fn set_role(&self, hub_id: i32, user_id: i32, role: HubRole) -> Result<bool, DbErr> {
        let result = entity::prelude::HubMember::update_many()
            .filter(entity::hub_member::Column::HubId.eq(hub_id))
            .filter(entity::hub_member::Column::UserId.eq(user_id))
            .col_expr(entity::hub_member::Column::Role, Expr::value(role.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Counts the members of a hub.
    pub async fn count(&self, hub_id: i32) -> Result<u64, DbErr> {
        entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::HubId.eq(hub_id))
            .count(self.db)
            .await
    }

    /// Counts the members of several hubs. Hubs without members are absent from the map.
    pub async fn counts(&self, hub_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if hub_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::HubId.is_in(hub_ids.iter().copied()))
            .all(self.db)
            .await?;

        let mut counts = HashMap::new();
        for row in rows {
            *counts.entry(row.hub_id).or_insert(0) += 1;
        }

        Ok(counts)
    }

    /// Gets the user IDs of the hub's owner and admins.
    pub async fn manager_ids(&self, hub_id: i32) -> Result<Vec<i32>, DbErr> {
        let rows = entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::HubId.eq(hub_id))
            .filter(entity::hub_member::Column::Role.is_in([
                HubRole::Owner.as_str(),
                HubRole::Admin.as_str(),
            ]))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|m| m.user_id).collect())
    }

    /// Gets the user IDs of every member of a hub.
    pub async fn member_ids(&self, hub_id: i32) -> Result<Vec<i32>, DbErr> {
        let rows = entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::HubId.eq(hub_id))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|m| m.user_id).collect())
    }

    /// Gets the IDs of every hub a user belongs to.
    pub async fn hub_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, DbErr> {
        let rows = entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::UserId.eq(user_id))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|m| m.hub_id).collect())
    }

    /// Gets a user's memberships of non-deleted hubs, newest first.
    pub async fn memberships_for_user(&self, user_id: i32) -> Result<Vec<HubMembership>, AppError> {
        let rows = entity::prelude::HubMember::find()
            .filter(entity::hub_member::Column::UserId.eq(user_id))
            .find_also_related(entity::prelude::Hub)
            .order_by_desc(entity::hub_member::Column::JoinedAt)
            .all(self.db)
            .await?;

        rows.into_iter()
            .filter_map(|(member, hub)| match hub {
                Some(hub) if hub.deleted_at.is_none() => Some((member, hub)),
                _ => None,
            })
            .map(|(member, hub)| {
                Ok(HubMembership {
                    hub_id: hub.id,
                    hub_name: hub.name,
                    role: parse_stored("hub_member.role", member.role)?,
                    joined_at: member.joined_at,
                })
            })
            .collect()
    }
}
