//! Programme data repository.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::{
    pagination::{PageParam, Paginated},
    programme::{CreateProgrammeParam, Programme, UpdateProgrammeParam},
};

pub struct ProgrammeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProgrammeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateProgrammeParam) -> Result<Programme, DbErr> {
        let now = Utc::now();

        let programme = entity::programme::ActiveModel {
            hub_id: ActiveValue::Set(param.hub_id),
            created_by: ActiveValue::Set(param.created_by),
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            capacity: ActiveValue::Set(param.capacity),
            requires_approval: ActiveValue::Set(param.requires_approval),
            starts_at: ActiveValue::Set(param.starts_at),
            ends_at: ActiveValue::Set(param.ends_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Programme::from_entity(programme))
    }

    /// Finds a non-deleted programme by ID.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Programme>, DbErr> {
        let entity = entity::prelude::Programme::find_by_id(id)
            .filter(entity::programme::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Programme::from_entity))
    }

    /// Gets non-deleted programmes with pagination, ordered by name.
    ///
    /// # Arguments
    /// - `hub_ids` - Restrict to these hubs; `None` lists every programme
    /// - `page` - Page parameters
    pub async fn get_paginated(
        &self,
        hub_ids: Option<&[i32]>,
        page: PageParam,
    ) -> Result<Paginated<Programme>, DbErr> {
        let mut query = entity::prelude::Programme::find()
            .filter(entity::programme::Column::DeletedAt.is_null());

        if let Some(hub_ids) = hub_ids {
            query = query.filter(entity::programme::Column::HubId.is_in(hub_ids.iter().copied()));
        }

        let paginator = query
            .order_by_asc(entity::programme::Column::Name)
            .order_by_asc(entity::programme::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let programmes = paginator
            .fetch_page(page.page)
            .await?
            .into_iter()
            .map(Programme::from_entity)
            .collect();

        Ok(Paginated::new(programmes, total, page))
    }

    /// Gets every non-deleted programme ordered by ID.
    pub async fn get_all_active(&self) -> Result<Vec<Programme>, DbErr> {
        let entities = entity::prelude::Programme::find()
            .filter(entity::programme::Column::DeletedAt.is_null())
            .order_by_asc(entity::programme::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Programme::from_entity).collect())
    }

    pub async fn count_active(&self) -> Result<u64, DbErr> {
        entity::prelude::Programme::find()
            .filter(entity::programme::Column::DeletedAt.is_null())
            .count(self.db)
            .await
    }

    /// Applies programme changes and returns the updated programme.
    ///
    /// # Returns
    /// - `Ok(Some(Programme))` - Updated programme
    /// - `Ok(None)` - Programme does not exist or is deleted
    pub async fn update(
        &self,
        id: i32,
        param: UpdateProgrammeParam,
    ) -> Result<Option<Programme>, DbErr> {
        let Some(programme) = entity::prelude::Programme::find_by_id(id)
            .filter(entity::programme::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: entity::programme::ActiveModel = programme.into();

        if let Some(name) = param.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = param.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(capacity) = param.capacity {
            active_model.capacity = ActiveValue::Set(Some(capacity));
        }
        if let Some(requires_approval) = param.requires_approval {
            active_model.requires_approval = ActiveValue::Set(requires_approval);
        }
        if let Some(starts_at) = param.starts_at {
            active_model.starts_at = ActiveValue::Set(Some(starts_at));
        }
        if let Some(ends_at) = param.ends_at {
            active_model.ends_at = ActiveValue::Set(Some(ends_at));
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let updated = active_model.update(self.db).await?;

        Ok(Some(Programme::from_entity(updated)))
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Programme::update_many()
            .filter(entity::programme::Column::Id.eq(id))
            .filter(entity::programme::Column::DeletedAt.is_null())
            .col_expr(entity::programme::Column::DeletedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
