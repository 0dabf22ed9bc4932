//! Notification data repository.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::{
        notification::{NewNotification, Notification},
        pagination::{PageParam, Paginated},
    },
};

pub struct NotificationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts one notification row per recipient.
    pub async fn create_many(
        &self,
        user_ids: &[i32],
        notification: &NewNotification,
    ) -> Result<(), DbErr> {
        if user_ids.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let rows = user_ids
            .iter()
            .map(|&user_id| entity::notification::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                kind: ActiveValue::Set(notification.kind.to_string()),
                title: ActiveValue::Set(notification.title.clone()),
                body: ActiveValue::Set(notification.body.clone()),
                link: ActiveValue::Set(notification.link.clone()),
                read_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            });

        entity::prelude::Notification::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Gets a user's notifications, newest first.
    pub async fn get_paginated(
        &self,
        user_id: i32,
        unread_only: bool,
        page: PageParam,
    ) -> Result<Paginated<Notification>, AppError> {
        let mut query = entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id));

        if unread_only {
            query = query.filter(entity::notification::Column::ReadAt.is_null());
        }

        let paginator = query
            .order_by_desc(entity::notification::Column::CreatedAt)
            .order_by_desc(entity::notification::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let notifications = paginator
            .fetch_page(page.page)
            .await?
            .into_iter()
            .map(Notification::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(notifications, total, page))
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::ReadAt.is_null())
            .count(self.db)
            .await
    }

    /// Marks one of the user's notifications as read.
    ///
    /// # Returns
    /// - `Ok(true)` - Notification exists and belongs to the user
    /// - `Ok(false)` - No such notification for this user
    pub async fn mark_read(&self, id: i32, user_id: i32) -> Result<bool, DbErr> {
        let exists = entity::prelude::Notification::find_by_id(id)
            .filter(entity::notification::Column::UserId.eq(user_id))
            .count(self.db)
            .await?
            > 0;

        if !exists {
            return Ok(false);
        }

        entity::prelude::Notification::update_many()
            .filter(entity::notification::Column::Id.eq(id))
            .filter(entity::notification::Column::ReadAt.is_null())
            .col_expr(entity::notification::Column::ReadAt, Expr::value(Some(Utc::now())))
            .exec(self.db)
            .await?;

        Ok(true)
    }

    /// Marks every unread notification of the user as read and returns how many changed.
    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::ReadAt.is_null())
            .col_expr(entity::notification::Column::ReadAt, Expr::value(Some(Utc::now())))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
