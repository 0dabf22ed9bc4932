//! Event data repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::{
    event::{CreateEventParam, Event, UpdateEventParam},
    pagination::{PageParam, Paginated},
};

pub struct EventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateEventParam) -> Result<Event, DbErr> {
        let now = Utc::now();

        let event = entity::event::ActiveModel {
            hub_id: ActiveValue::Set(param.hub_id),
            created_by: ActiveValue::Set(param.created_by),
            title: ActiveValue::Set(param.title),
            description: ActiveValue::Set(param.description),
            location: ActiveValue::Set(param.location),
            starts_at: ActiveValue::Set(param.starts_at),
            ends_at: ActiveValue::Set(param.ends_at),
            capacity: ActiveValue::Set(param.capacity),
            registration_deadline: ActiveValue::Set(param.registration_deadline),
            reminder_sent: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Event::from_entity(event))
    }

    /// Finds a non-deleted event by ID.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Event>, DbErr> {
        let entity = entity::prelude::Event::find_by_id(id)
            .filter(entity::event::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Event::from_entity))
    }

    /// Gets a hub's non-deleted events ordered by start time.
    pub async fn get_paginated_by_hub(
        &self,
        hub_id: i32,
        page: PageParam,
    ) -> Result<Paginated<Event>, DbErr> {
        let paginator = entity::prelude::Event::find()
            .filter(entity::event::Column::HubId.eq(hub_id))
            .filter(entity::event::Column::DeletedAt.is_null())
            .order_by_asc(entity::event::Column::StartsAt)
            .order_by_asc(entity::event::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let events = paginator
            .fetch_page(page.page)
            .await?
            .into_iter()
            .map(Event::from_entity)
            .collect();

        Ok(Paginated::new(events, total, page))
    }

    /// Gets events in the given hubs that have not started yet, soonest first.
    pub async fn get_upcoming_paginated(
        &self,
        hub_ids: &[i32],
        now: DateTime<Utc>,
        page: PageParam,
    ) -> Result<Paginated<Event>, DbErr> {
        let paginator = entity::prelude::Event::find()
            .filter(entity::event::Column::HubId.is_in(hub_ids.iter().copied()))
            .filter(entity::event::Column::DeletedAt.is_null())
            .filter(entity::event::Column::StartsAt.gt(now))
            .order_by_asc(entity::event::Column::StartsAt)
            .order_by_asc(entity::event::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let events = paginator
            .fetch_page(page.page)
            .await?
            .into_iter()
            .map(Event::from_entity)
            .collect();

        Ok(Paginated::new(events, total, page))
    }

    /// Gets every non-deleted event that starts after `now`.
    pub async fn get_all_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>, DbErr> {
        let entities = entity::prelude::Event::find()
            .filter(entity::event::Column::DeletedAt.is_null())
            .filter(entity::event::Column::StartsAt.gt(now))
            .order_by_asc(entity::event::Column::StartsAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Event::from_entity).collect())
    }

    /// Gets events starting within `(now, until]` whose reminder has not been sent.
    pub async fn due_for_reminder(
        &self,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Event>, DbErr> {
        let entities = entity::prelude::Event::find()
            .filter(entity::event::Column::DeletedAt.is_null())
            .filter(entity::event::Column::ReminderSent.eq(false))
            .filter(entity::event::Column::StartsAt.gt(now))
            .filter(entity::event::Column::StartsAt.lte(until))
            .order_by_asc(entity::event::Column::StartsAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Event::from_entity).collect())
    }

    /// Flags an event's reminder as sent.
    ///
    /// # Returns
    /// - `Ok(true)` - Flag was set by this call
    /// - `Ok(false)` - Flag was already set or the event does not exist
    pub async fn mark_reminded(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Event::update_many()
            .filter(entity::event::Column::Id.eq(id))
            .filter(entity::event::Column::ReminderSent.eq(false))
            .col_expr(entity::event::Column::ReminderSent, Expr::value(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_upcoming(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        entity::prelude::Event::find()
            .filter(entity::event::Column::DeletedAt.is_null())
            .filter(entity::event::Column::StartsAt.gt(now))
            .count(self.db)
            .await
    }

    /// Applies event changes. Moving the start time re-arms the reminder.
    pub async fn update(&self, id: i32, param: UpdateEventParam) -> Result<Option<Event>, DbErr> {
        let Some(event) = entity::prelude::Event::find_by_id(id)
            .filter(entity::event::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let previous_start = event.starts_at;
        let mut active_model: entity::event::ActiveModel = event.into();

        if let Some(title) = param.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = param.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(location) = param.location {
            active_model.location = ActiveValue::Set(Some(location));
        }
        if let Some(starts_at) = param.starts_at {
            active_model.starts_at = ActiveValue::Set(starts_at);
            if starts_at != previous_start {
                active_model.reminder_sent = ActiveValue::Set(false);
            }
        }
        if let Some(ends_at) = param.ends_at {
            active_model.ends_at = ActiveValue::Set(ends_at);
        }
        if let Some(capacity) = param.capacity {
            active_model.capacity = ActiveValue::Set(Some(capacity));
        }
        if let Some(deadline) = param.registration_deadline {
            active_model.registration_deadline = ActiveValue::Set(Some(deadline));
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let updated = active_model.update(self.db).await?;

        Ok(Some(Event::from_entity(updated)))
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Event::update_many()
            .filter(entity::event::Column::Id.eq(id))
            .filter(entity::event::Column::DeletedAt.is_null())
            .col_expr(entity::event::Column::DeletedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
