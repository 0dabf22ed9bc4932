//! Project membership repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

use crate::server::{
    error::AppError,
    model::{
        project::{ProjectMember, ProjectRole},
        user::ProjectMembership,
    },
    util::parse::parse_stored,
};

pub struct ProjectMemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProjectMemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn add(&self, project_id: i32, user_id: i32, role: ProjectRole) -> Result<(), DbErr> {
        entity::project_member::ActiveModel {
            project_id: ActiveValue::Set(project_id),
            user_id: ActiveValue::Set(user_id),
            role: ActiveValue::Set(role.to_string()),
            joined_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Gets a user's role in a project, or `None` if they are not a member.
    pub async fn find_role(
        &self,
        project_id: i32,
        user_id: i32,
    ) -> Result<Option<ProjectRole>, AppError> {
        let entity = entity::prelude::ProjectMember::find()
            .filter(entity::project_member::Column::ProjectId.eq(project_id))
            .filter(entity::project_member::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        entity
            .map(|m| parse_stored("project_member.role", m.role))
            .transpose()
    }

    /// Gets every member of a project with their names, in join order.
    pub async fn get_members(&self, project_id: i32) -> Result<Vec<ProjectMember>, AppError> {
        let rows = entity::prelude::ProjectMember::find()
            .filter(entity::project_member::Column::ProjectId.eq(project_id))
            .find_also_related(entity::prelude::User)
            .order_by_asc(entity::project_member::Column::JoinedAt)
            .order_by_asc(entity::project_member::Column::Id)
            .all(self.db)
            .await?;

        rows.into_iter()
            .map(|(member, user)| {
                Ok(ProjectMember {
                    user_id: member.user_id,
                    name: user.map(|u| u.name).unwrap_or_default(),
                    role: parse_stored("project_member.role", member.role)?,
                    joined_at: member.joined_at,
                })
            })
            .collect()
    }

    pub async fn remove(&self, project_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::ProjectMember::delete_many()
            .filter(entity::project_member::Column::ProjectId.eq(project_id))
            .filter(entity::project_member::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self, project_id: i32) -> Result<u64, DbErr> {
        entity::prelude::ProjectMember::find()
            .filter(entity::project_member::Column::ProjectId.eq(project_id))
            .count(self.db)
            .await
    }

    /// Counts the members of several projects. Projects without members are absent.
    pub async fn counts(&self, project_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = entity::prelude::ProjectMember::find()
            .filter(entity::project_member::Column::ProjectId.is_in(project_ids.iter().copied()))
            .all(self.db)
            .await?;

        let mut counts = HashMap::new();
        for row in rows {
            *counts.entry(row.project_id).or_insert(0) += 1;
        }

        Ok(counts)
    }

    /// Gets a user's memberships of non-deleted projects, newest first.
    pub async fn memberships_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<ProjectMembership>, AppError> {
        let rows = entity::prelude::ProjectMember::find()
            .filter(entity::project_member::Column::UserId.eq(user_id))
            .find_also_related(entity::prelude::Project)
            .order_by_desc(entity::project_member::Column::JoinedAt)
            .all(self.db)
            .await?;

        rows.into_iter()
            .filter_map(|(member, project)| match project {
                Some(project) if project.deleted_at.is_none() => Some((member, project)),
                _ => None,
            })
            .map(|(member, project)| {
                Ok(ProjectMembership {
                    project_id: project.id,
                    project_name: project.name,
                    hub_id: project.hub_id,
                    role: parse_stored("project_member.role", member.role)?,
                    joined_at: member.joined_at,
                })
            })
            .collect()
    }
}
