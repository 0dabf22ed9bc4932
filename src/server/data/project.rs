//! Project data repository.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::{
        pagination::{PageParam, Paginated},
        project::{CreateProjectParam, Project, ProjectRole, UpdateProjectParam},
    },
};

pub struct ProjectRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProjectRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a project and its owner membership row.
    pub async fn create(&self, param: CreateProjectParam) -> Result<Project, AppError> {
        let now = Utc::now();

        let project = entity::project::ActiveModel {
            hub_id: ActiveValue::Set(param.hub_id),
            owner_id: ActiveValue::Set(param.owner_id),
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            status: ActiveValue::Set(param.status.to_string()),
            max_members: ActiveValue::Set(param.max_members),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        entity::project_member::ActiveModel {
            project_id: ActiveValue::Set(project.id),
            user_id: ActiveValue::Set(param.owner_id),
            role: ActiveValue::Set(ProjectRole::Owner.to_string()),
            joined_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Project::from_entity(project)
    }

    /// Finds a non-deleted project by ID.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Project>, AppError> {
        let entity = entity::prelude::Project::find_by_id(id)
            .filter(entity::project::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        entity.map(Project::from_entity).transpose()
    }

    /// Gets the non-deleted projects of a hub with pagination, newest first.
    pub async fn get_paginated_by_hub(
        &self,
        hub_id: i32,
        page: PageParam,
    ) -> Result<Paginated<Project>, AppError> {
        let paginator = entity::prelude::Project::find()
            .filter(entity::project::Column::HubId.eq(hub_id))
            .filter(entity::project::Column::DeletedAt.is_null())
            .order_by_desc(entity::project::Column::CreatedAt)
            .order_by_desc(entity::project::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let projects = paginator
            .fetch_page(page.page)
            .await?
            .into_iter()
            .map(Project::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(projects, total, page))
    }

    /// Counts non-deleted projects in non-deleted hubs.
    pub async fn count_active(&self) -> Result<u64, DbErr> {
        entity::prelude::Project::find()
            .filter(entity::project::Column::DeletedAt.is_null())
            .count(self.db)
            .await
    }

    /// Applies project changes and returns the updated project.
    ///
    /// # Returns
    /// - `Ok(Some(Project))` - Updated project
    /// - `Ok(None)` - Project does not exist or is deleted
    pub async fn update(
        &self,
        id: i32,
        param: UpdateProjectParam,
    ) -> Result<Option<Project>, AppError> {
        let Some(project) = entity::prelude::Project::find_by_id(id)
            .filter(entity::project::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: entity::project::ActiveModel = project.into();

        if let Some(name) = param.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = param.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(status) = param.status {
            active_model.status = ActiveValue::Set(status.to_string());
        }
        if let Some(max_members) = param.max_members {
            active_model.max_members = ActiveValue::Set(Some(max_members));
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let updated = active_model.update(self.db).await?;

        Project::from_entity(updated).map(Some)
    }

    /// Soft-deletes a project.
    ///
    /// # Returns
    /// - `Ok(true)` - Project was marked deleted
    /// - `Ok(false)` - Project does not exist or was already deleted
    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Project::update_many()
            .filter(entity::project::Column::Id.eq(id))
            .filter(entity::project::Column::DeletedAt.is_null())
            .col_expr(entity::project::Column::DeletedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
