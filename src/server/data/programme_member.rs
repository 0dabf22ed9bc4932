//! Programme enrolment repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

use crate::server::model::{programme::ProgrammeMember, user::ProgrammeMembership};

pub struct ProgrammeMemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProgrammeMemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn add(&self, programme_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::programme_member::ActiveModel {
            programme_id: ActiveValue::Set(programme_id),
            user_id: ActiveValue::Set(user_id),
            joined_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn is_member(&self, programme_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::ProgrammeMember::find()
            .filter(entity::programme_member::Column::ProgrammeId.eq(programme_id))
            .filter(entity::programme_member::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Gets every enrolled member with their names, in enrolment order.
    pub async fn get_members(&self, programme_id: i32) -> Result<Vec<ProgrammeMember>, DbErr> {
        let rows = entity::prelude::ProgrammeMember::find()
            .filter(entity::programme_member::Column::ProgrammeId.eq(programme_id))
            .find_also_related(entity::prelude::User)
            .order_by_asc(entity::programme_member::Column::JoinedAt)
            .order_by_asc(entity::programme_member::Column::Id)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(member, user)| ProgrammeMember {
                user_id: member.user_id,
                name: user.map(|u| u.name).unwrap_or_default(),
                joined_at: member.joined_at,
            })
            .collect())
    }

    pub async fn remove(&self, programme_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::ProgrammeMember::delete_many()
            .filter(entity::programme_member::Column::ProgrammeId.eq(programme_id))
            .filter(entity::programme_member::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self, programme_id: i32) -> Result<u64, DbErr> {
        entity::prelude::ProgrammeMember::find()
            .filter(entity::programme_member::Column::ProgrammeId.eq(programme_id))
            .count(self.db)
            .await
    }

    /// Counts the members of several programmes. Programmes without members are absent.
    pub async fn counts(&self, programme_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if programme_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = entity::prelude::ProgrammeMember::find()
            .filter(
                entity::programme_member::Column::ProgrammeId.is_in(programme_ids.iter().copied()),
            )
            .all(self.db)
            .await?;

        let mut counts = HashMap::new();
        for row in rows {
            *counts.entry(row.programme_id).or_insert(0) += 1;
        }

        Ok(counts)
    }

    /// Gets the IDs of every programme a user is enrolled in.
    pub async fn programme_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, DbErr> {
        let rows = entity::prelude::ProgrammeMember::find()
            .filter(entity::programme_member::Column::UserId.eq(user_id))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|m| m.programme_id).collect())
    }

    /// Gets a user's enrolments in non-deleted programmes, newest first.
    pub async fn memberships_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<ProgrammeMembership>, DbErr> {
        let rows = entity::prelude::ProgrammeMember::find()
            .filter(entity::programme_member::Column::UserId.eq(user_id))
            .find_also_related(entity::prelude::Programme)
            .order_by_desc(entity::programme_member::Column::JoinedAt)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, programme)| {
                let programme = programme.filter(|p| p.deleted_at.is_none())?;
                Some(ProgrammeMembership {
                    programme_id: programme.id,
                    programme_name: programme.name,
                    hub_id: programme.hub_id,
                    joined_at: member.joined_at,
                })
            })
            .collect())
    }
}
