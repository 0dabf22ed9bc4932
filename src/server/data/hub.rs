//! Hub data repository.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::{
    hub::{CreateHubParam, Hub, HubFilter, HubRole, UpdateHubParam},
    pagination::{PageParam, Paginated},
};

pub struct HubRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> HubRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a hub and its owner membership row.
    ///
    /// Run inside a transaction so both rows are written or neither.
    pub async fn create(&self, param: CreateHubParam) -> Result<Hub, DbErr> {
        let now = Utc::now();

        let hub = entity::hub::ActiveModel {
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            category: ActiveValue::Set(param.category),
            owner_id: ActiveValue::Set(param.owner_id),
            is_private: ActiveValue::Set(param.is_private),
            max_members: ActiveValue::Set(param.max_members),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        entity::hub_member::ActiveModel {
            hub_id: ActiveValue::Set(hub.id),
            user_id: ActiveValue::Set(param.owner_id),
            role: ActiveValue::Set(HubRole::Owner.to_string()),
            joined_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Hub::from_entity(hub))
    }

    /// Finds a non-deleted hub by ID.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Hub>, DbErr> {
        let entity = entity::prelude::Hub::find_by_id(id)
            .filter(entity::hub::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Hub::from_entity))
    }

    /// Finds non-deleted hubs by ID, in no particular order.
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Hub>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::Hub::find()
            .filter(entity::hub::Column::Id.is_in(ids.iter().copied()))
            .filter(entity::hub::Column::DeletedAt.is_null())
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Hub::from_entity).collect())
    }

    /// Gets every non-deleted hub ordered by ID.
    pub async fn get_all_active(&self) -> Result<Vec<Hub>, DbErr> {
        let entities = entity::prelude::Hub::find()
            .filter(entity::hub::Column::DeletedAt.is_null())
            .order_by_asc(entity::hub::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Hub::from_entity).collect())
    }

    /// Gets the IDs of every non-deleted public hub.
    pub async fn get_public_ids(&self) -> Result<Vec<i32>, DbErr> {
        entity::prelude::Hub::find()
            .select_only()
            .column(entity::hub::Column::Id)
            .filter(entity::hub::Column::DeletedAt.is_null())
            .filter(entity::hub::Column::IsPrivate.eq(false))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Checks whether a non-deleted hub other than `exclude_id` already uses `name`.
    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> Result<bool, DbErr> {
        let mut query = entity::prelude::Hub::find()
            .filter(entity::hub::Column::Name.eq(name))
            .filter(entity::hub::Column::DeletedAt.is_null());

        if let Some(id) = exclude_id {
            query = query.filter(entity::hub::Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Counts the non-deleted hubs a user owns.
    pub async fn count_owned_by(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Hub::find()
            .filter(entity::hub::Column::OwnerId.eq(user_id))
            .filter(entity::hub::Column::DeletedAt.is_null())
            .count(self.db)
            .await
    }

    /// Counts all non-deleted hubs.
    pub async fn count_active(&self) -> Result<u64, DbErr> {
        entity::prelude::Hub::find()
            .filter(entity::hub::Column::DeletedAt.is_null())
            .count(self.db)
            .await
    }

    /// Gets non-deleted hubs with pagination, ordered by name.
    ///
    /// # Arguments
    /// - `filter` - Optional search over name and description, and exact category
    /// - `page` - Page parameters
    pub async fn get_paginated(
        &self,
        filter: &HubFilter,
        page: PageParam,
    ) -> Result<Paginated<Hub>, DbErr> {
        let mut query =
            entity::prelude::Hub::find().filter(entity::hub::Column::DeletedAt.is_null());

        if let Some(search) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(entity::hub::Column::Name.contains(search))
                    .add(entity::hub::Column::Description.contains(search)),
            );
        }
        if let Some(category) = &filter.category {
            query = query.filter(entity::hub::Column::Category.eq(category.as_str()));
        }

        let paginator = query
            .order_by_asc(entity::hub::Column::Name)
            .order_by_asc(entity::hub::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let hubs = paginator
            .fetch_page(page.page)
            .await?
            .into_iter()
            .map(Hub::from_entity)
            .collect();

        Ok(Paginated::new(hubs, total, page))
    }

    /// Applies hub changes and returns the updated hub.
    ///
    /// # Returns
    /// - `Ok(Some(Hub))` - Updated hub
    /// - `Ok(None)` - Hub does not exist or is deleted
    pub async fn update(&self, id: i32, param: UpdateHubParam) -> Result<Option<Hub>, DbErr> {
        let Some(hub) = entity::prelude::Hub::find_by_id(id)
            .filter(entity::hub::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: entity::hub::ActiveModel = hub.into();

        if let Some(name) = param.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = param.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(category) = param.category {
            active_model.category = ActiveValue::Set(category);
        }
        if let Some(is_private) = param.is_private {
            active_model.is_private = ActiveValue::Set(is_private);
        }
        if let Some(max_members) = param.max_members {
            active_model.max_members = ActiveValue::Set(Some(max_members));
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let updated = active_model.update(self.db).await?;

        Ok(Some(Hub::from_entity(updated)))
    }

    /// Soft-deletes a hub together with its projects, programmes and events.
    ///
    /// Run inside a transaction so the hub and its children disappear together.
    ///
    /// # Returns
    /// - `Ok(true)` - Hub was marked deleted
    /// - `Ok(false)` - Hub does not exist or was already deleted
    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let now = Utc::now();
        let result = entity::prelude::Hub::update_many()
            .filter(entity::hub::Column::Id.eq(id))
            .filter(entity::hub::Column::DeletedAt.is_null())
            .col_expr(entity::hub::Column::DeletedAt, Expr::value(now))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        entity::prelude::Project::update_many()
            .filter(entity::project::Column::HubId.eq(id))
            .filter(entity::project::Column::DeletedAt.is_null())
            .col_expr(entity::project::Column::DeletedAt, Expr::value(now))
            .exec(self.db)
            .await?;
        entity::prelude::Programme::update_many()
            .filter(entity::programme::Column::HubId.eq(id))
            .filter(entity::programme::Column::DeletedAt.is_null())
            .col_expr(entity::programme::Column::DeletedAt, Expr::value(now))
            .exec(self.db)
            .await?;
        entity::prelude::Event::update_many()
            .filter(entity::event::Column::HubId.eq(id))
            .filter(entity::event::Column::DeletedAt.is_null())
            .col_expr(entity::event::Column::DeletedAt, Expr::value(now))
            .exec(self.db)
            .await?;

        Ok(true)
    }
}
