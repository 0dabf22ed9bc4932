mod admin;
mod event;
mod hub;
mod programme;
mod project;
mod user;

use sea_orm::DatabaseConnection;
use test_utils::factory;

use crate::server::{
    data::notification::NotificationRepository,
    error::AppError,
    model::{notification::Notification, pagination::PageParam, user::User},
};

async fn create_user(db: &DatabaseConnection) -> Result<User, AppError> {
    Ok(User::from_entity(factory::user::create_user(db).await?))
}

async fn create_admin(db: &DatabaseConnection) -> Result<User, AppError> {
    Ok(User::from_entity(factory::user::create_admin(db).await?))
}

async fn notifications_for(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<Notification>, AppError> {
    Ok(NotificationRepository::new(db)
        .get_paginated(user_id, false, PageParam::default())
        .await?
        .items)
}
