//! Programme factory for creating test programmes.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test programmes.
pub struct ProgrammeFactory<'a> {
    db: &'a DatabaseConnection,
    hub_id: i32,
    created_by: i32,
    name: String,
    capacity: Option<i32>,
    requires_approval: bool,
}

impl<'a> ProgrammeFactory<'a> {
    /// Defaults to an open programme with unlimited capacity.
    pub fn new(db: &'a DatabaseConnection, hub_id: i32, created_by: i32) -> Self {
        Self {
            db,
            hub_id,
            created_by,
            name: format!("Programme {}", next_id()),
            capacity: None,
            requires_approval: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn capacity(mut self, capacity: Option<i32>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn requires_approval(mut self, requires_approval: bool) -> Self {
        self.requires_approval = requires_approval;
        self
    }

    pub async fn build(self) -> Result<entity::programme::Model, DbErr> {
        let now = Utc::now();
        entity::programme::ActiveModel {
            hub_id: ActiveValue::Set(self.hub_id),
            created_by: ActiveValue::Set(self.created_by),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set("A test programme".to_string()),
            capacity: ActiveValue::Set(self.capacity),
            requires_approval: ActiveValue::Set(self.requires_approval),
            starts_at: ActiveValue::Set(None),
            ends_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an open programme with default values.
pub async fn create_programme(
    db: &DatabaseConnection,
    hub_id: i32,
    created_by: i32,
) -> Result<entity::programme::Model, DbErr> {
    ProgrammeFactory::new(db, hub_id, created_by).build().await
}

/// Inserts a programme membership row.
pub async fn add_programme_member(
    db: &DatabaseConnection,
    programme_id: i32,
    user_id: i32,
) -> Result<entity::programme_member::Model, DbErr> {
    entity::programme_member::ActiveModel {
        programme_id: ActiveValue::Set(programme_id),
        user_id: ActiveValue::Set(user_id),
        joined_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
