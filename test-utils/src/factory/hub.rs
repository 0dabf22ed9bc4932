//! Hub factory for creating test hubs and hub memberships.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test hubs.
///
/// Building a hub also inserts the owner's `owner` membership row, mirroring what the
/// server does when a hub is created through the API.
pub struct HubFactory<'a> {
    db: &'a DatabaseConnection,
    owner_id: i32,
    name: String,
    description: String,
    category: String,
    is_private: bool,
    max_members: Option<i32>,
    deleted: bool,
}

impl<'a> HubFactory<'a> {
    /// Creates a new HubFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Hub {id}"`
    /// - category: `"general"`
    /// - public, unlimited members
    pub fn new(db: &'a DatabaseConnection, owner_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            owner_id,
            name: format!("Hub {}", id),
            description: "A test hub".to_string(),
            category: "general".to_string(),
            is_private: false,
            max_members: None,
            deleted: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    pub fn max_members(mut self, max_members: Option<i32>) -> Self {
        self.max_members = max_members;
        self
    }

    /// Marks the hub as soft-deleted.
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Builds and inserts the hub and its owner membership.
    ///
    /// # Returns
    /// - `Ok(entity::hub::Model)` - Created hub entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::hub::Model, DbErr> {
        let now = Utc::now();
        let hub = entity::hub::ActiveModel {
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(self.description),
            category: ActiveValue::Set(self.category),
            owner_id: ActiveValue::Set(self.owner_id),
            is_private: ActiveValue::Set(self.is_private),
            max_members: ActiveValue::Set(self.max_members),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(self.deleted.then_some(now)),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        add_hub_member(self.db, hub.id, self.owner_id, "owner").await?;

        Ok(hub)
    }
}

/// Creates a public hub with default values owned by `owner_id`.
pub async fn create_hub(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<entity::hub::Model, DbErr> {
    HubFactory::new(db, owner_id).build().await
}

/// Inserts a hub membership row with the given role (`owner`, `admin` or `member`).
pub async fn add_hub_member(
    db: &DatabaseConnection,
    hub_id: i32,
    user_id: i32,
    role: &str,
) -> Result<entity::hub_member::Model, DbErr> {
    entity::hub_member::ActiveModel {
        hub_id: ActiveValue::Set(hub_id),
        user_id: ActiveValue::Set(user_id),
        role: ActiveValue::Set(role.to_string()),
        joined_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    #[tokio::test]
    async fn creates_hub_with_owner_membership() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
        let db = test.db();

        let owner = crate::factory::user::create_user(db).await?;
        let hub = create_hub(db, owner.id).await?;

        let members = HubMember::find()
            .filter(entity::hub_member::Column::HubId.eq(hub.id))
            .all(db)
            .await?;

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, owner.id);
        assert_eq!(members[0].role, "owner");

        Ok(())
    }
}
