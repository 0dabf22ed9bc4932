//! Event registration repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::{HashMap, HashSet};

use crate::server::model::{event::EventRegistration, user::EventRegistrationSummary};

pub struct EventRegistrationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRegistrationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn register(&self, event_id: i32, user_id: i32) -> Result<(), DbErr> {
        entity::event_registration::ActiveModel {
            event_id: ActiveValue::Set(event_id),
            user_id: ActiveValue::Set(user_id),
            registered_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn unregister(&self, event_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::EventRegistration::delete_many()
            .filter(entity::event_registration::Column::EventId.eq(event_id))
            .filter(entity::event_registration::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_registered(&self, event_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::EventRegistration::find()
            .filter(entity::event_registration::Column::EventId.eq(event_id))
            .filter(entity::event_registration::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn count(&self, event_id: i32) -> Result<u64, DbErr> {
        entity::prelude::EventRegistration::find()
            .filter(entity::event_registration::Column::EventId.eq(event_id))
            .count(self.db)
            .await
    }

    /// Counts registrations for several events. Events without registrations are absent.
    pub async fn counts(&self, event_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<i32> = entity::prelude::EventRegistration::find()
            .select_only()
            .column(entity::event_registration::Column::EventId)
            .filter(entity::event_registration::Column::EventId.is_in(event_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        let mut counts = HashMap::new();
        for event_id in rows {
            *counts.entry(event_id).or_insert(0) += 1;
        }

        Ok(counts)
    }

    /// Gets every registrant with their names, in registration order.
    pub async fn get_registrations(&self, event_id: i32) -> Result<Vec<EventRegistration>, DbErr> {
        let rows = entity::prelude::EventRegistration::find()
            .filter(entity::event_registration::Column::EventId.eq(event_id))
            .find_also_related(entity::prelude::User)
            .order_by_asc(entity::event_registration::Column::RegisteredAt)
            .order_by_asc(entity::event_registration::Column::Id)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(registration, user)| EventRegistration {
                user_id: registration.user_id,
                name: user.map(|u| u.name).unwrap_or_default(),
                registered_at: registration.registered_at,
            })
            .collect())
    }

    pub async fn registrant_ids(&self, event_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::EventRegistration::find()
            .select_only()
            .column(entity::event_registration::Column::UserId)
            .filter(entity::event_registration::Column::EventId.eq(event_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Gets which of the given events a user is registered for.
    pub async fn event_ids_for_user(
        &self,
        user_id: i32,
        event_ids: &[i32],
    ) -> Result<HashSet<i32>, DbErr> {
        if event_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<i32> = entity::prelude::EventRegistration::find()
            .select_only()
            .column(entity::event_registration::Column::EventId)
            .filter(entity::event_registration::Column::UserId.eq(user_id))
            .filter(entity::event_registration::Column::EventId.is_in(event_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Gets a user's registrations for non-deleted events that have not started.
    pub async fn upcoming_for_user(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<EventRegistrationSummary>, DbErr> {
        let rows = entity::prelude::EventRegistration::find()
            .filter(entity::event_registration::Column::UserId.eq(user_id))
            .find_also_related(entity::prelude::Event)
            .all(self.db)
            .await?;

        let mut summaries: Vec<EventRegistrationSummary> = rows
            .into_iter()
            .filter_map(|(registration, event)| {
                let event = event.filter(|e| e.deleted_at.is_none() && e.starts_at > now)?;
                Some(EventRegistrationSummary {
                    event_id: event.id,
                    event_title: event.title,
                    starts_at: event.starts_at,
                    registered_at: registration.registered_at,
                })
            })
            .collect();
        summaries.sort_by_key(|s| s.starts_at);

        Ok(summaries)
    }
}
