//! Join request factory for creating test join requests.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating join request rows directly, bypassing the workflow checks.
pub struct JoinRequestFactory<'a> {
    db: &'a DatabaseConnection,
    target_type: String,
    target_id: i32,
    user_id: i32,
    status: String,
    created_at: DateTime<Utc>,
}

impl<'a> JoinRequestFactory<'a> {
    /// Defaults to a pending request created now.
    ///
    /// `target_type` is one of `hub`, `project` or `programme`.
    pub fn new(db: &'a DatabaseConnection, target_type: &str, target_id: i32, user_id: i32) -> Self {
        Self {
            db,
            target_type: target_type.to_string(),
            target_id,
            user_id,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub async fn build(self) -> Result<entity::join_request::Model, DbErr> {
        entity::join_request::ActiveModel {
            target_type: ActiveValue::Set(self.target_type),
            target_id: ActiveValue::Set(self.target_id),
            user_id: ActiveValue::Set(self.user_id),
            message: ActiveValue::Set(None),
            status: ActiveValue::Set(self.status),
            reviewed_by: ActiveValue::Set(None),
            review_note: ActiveValue::Set(None),
            created_at: ActiveValue::Set(self.created_at),
            reviewed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending join request.
pub async fn create_pending_request(
    db: &DatabaseConnection,
    target_type: &str,
    target_id: i32,
    user_id: i32,
) -> Result<entity::join_request::Model, DbErr> {
    JoinRequestFactory::new(db, target_type, target_id, user_id)
        .build()
        .await
}
