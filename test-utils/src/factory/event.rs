//! Event factory for creating test events and registrations.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test events.
pub struct EventFactory<'a> {
    db: &'a DatabaseConnection,
    hub_id: i32,
    created_by: i32,
    title: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    capacity: Option<i32>,
    registration_deadline: Option<DateTime<Utc>>,
    reminder_sent: bool,
}

impl<'a> EventFactory<'a> {
    /// Defaults to a two hour event starting in three days with no capacity limit.
    pub fn new(db: &'a DatabaseConnection, hub_id: i32, created_by: i32) -> Self {
        let starts_at = Utc::now() + Duration::days(3);
        Self {
            db,
            hub_id,
            created_by,
            title: format!("Event {}", next_id()),
            starts_at,
            ends_at: starts_at + Duration::hours(2),
            capacity: None,
            registration_deadline: None,
            reminder_sent: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the start time and keeps a two hour duration.
    pub fn starts_at(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = starts_at;
        self.ends_at = starts_at + Duration::hours(2);
        self
    }

    pub fn capacity(mut self, capacity: Option<i32>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn registration_deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.registration_deadline = deadline;
        self
    }

    pub fn reminder_sent(mut self, reminder_sent: bool) -> Self {
        self.reminder_sent = reminder_sent;
        self
    }

    pub async fn build(self) -> Result<entity::event::Model, DbErr> {
        let now = Utc::now();
        entity::event::ActiveModel {
            hub_id: ActiveValue::Set(self.hub_id),
            created_by: ActiveValue::Set(self.created_by),
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set("A test event".to_string()),
            location: ActiveValue::Set(Some("Main Hall".to_string())),
            starts_at: ActiveValue::Set(self.starts_at),
            ends_at: ActiveValue::Set(self.ends_at),
            capacity: ActiveValue::Set(self.capacity),
            registration_deadline: ActiveValue::Set(self.registration_deadline),
            reminder_sent: ActiveValue::Set(self.reminder_sent),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an upcoming event with default values.
pub async fn create_event(
    db: &DatabaseConnection,
    hub_id: i32,
    created_by: i32,
) -> Result<entity::event::Model, DbErr> {
    EventFactory::new(db, hub_id, created_by).build().await
}

/// Inserts an event registration row.
pub async fn register_user(
    db: &DatabaseConnection,
    event_id: i32,
    user_id: i32,
) -> Result<entity::event_registration::Model, DbErr> {
    entity::event_registration::ActiveModel {
        event_id: ActiveValue::Set(event_id),
        user_id: ActiveValue::Set(user_id),
        registered_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
