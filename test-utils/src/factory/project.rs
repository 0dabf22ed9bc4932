//! Project factory for creating test projects.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test projects.
///
/// Building a project also inserts the owner's `owner` project membership.
pub struct ProjectFactory<'a> {
    db: &'a DatabaseConnection,
    hub_id: i32,
    owner_id: i32,
    name: String,
    status: String,
    max_members: Option<i32>,
}

impl<'a> ProjectFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, hub_id: i32, owner_id: i32) -> Self {
        Self {
            db,
            hub_id,
            owner_id,
            name: format!("Project {}", next_id()),
            status: "planning".to_string(),
            max_members: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn max_members(mut self, max_members: Option<i32>) -> Self {
        self.max_members = max_members;
        self
    }

    pub async fn build(self) -> Result<entity::project::Model, DbErr> {
        let now = Utc::now();
        let project = entity::project::ActiveModel {
            hub_id: ActiveValue::Set(self.hub_id),
            owner_id: ActiveValue::Set(self.owner_id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set("A test project".to_string()),
            status: ActiveValue::Set(self.status),
            max_members: ActiveValue::Set(self.max_members),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        add_project_member(self.db, project.id, self.owner_id, "owner").await?;

        Ok(project)
    }
}

/// Creates a project in `hub_id` owned by `owner_id` with default values.
pub async fn create_project(
    db: &DatabaseConnection,
    hub_id: i32,
    owner_id: i32,
) -> Result<entity::project::Model, DbErr> {
    ProjectFactory::new(db, hub_id, owner_id).build().await
}

/// Inserts a project membership row.
pub async fn add_project_member(
    db: &DatabaseConnection,
    project_id: i32,
    user_id: i32,
    role: &str,
) -> Result<entity::project_member::Model, DbErr> {
    entity::project_member::ActiveModel {
        project_id: ActiveValue::Set(project_id),
        user_id: ActiveValue::Set(user_id),
        role: ActiveValue::Set(role.to_string()),
        joined_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
