//! Notification service.
//!
//! Notifications are stored one row per recipient. When a mailer is configured each
//! recipient also gets an email, sent in a background task after the rows are written.

pub mod email;

use sea_orm::DatabaseConnection;
use std::collections::BTreeSet;

use crate::server::{
    data::{notification::NotificationRepository, user::UserRepository},
    error::AppError,
    model::{
        notification::{NewNotification, Notification},
        pagination::{PageParam, Paginated},
    },
};

use self::email::Mailer;

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
    mailer: Option<&'a Mailer>,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection, mailer: Option<&'a Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Stores a notification for every recipient and fans out email.
    ///
    /// Duplicate recipient IDs are collapsed. Email delivery never fails the call.
    pub async fn notify(
        &self,
        recipients: &[i32],
        notification: NewNotification,
    ) -> Result<(), AppError> {
        let recipients: Vec<i32> = recipients
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if recipients.is_empty() {
            return Ok(());
        }

        NotificationRepository::new(self.db)
            .create_many(&recipients, &notification)
            .await?;

        tracing::debug!(
            "Stored {} notification for {} recipient(s)",
            notification.kind,
            recipients.len()
        );

        if let Some(mailer) = self.mailer {
            let users = UserRepository::new(self.db)
                .find_active_by_ids(&recipients)
                .await?;

            for user in users {
                let mailer = mailer.clone();
                let notification = notification.clone();

                tokio::spawn(async move {
                    if let Err(e) = mailer
                        .send(
                            &user.email,
                            &notification.title,
                            &notification.body,
                            notification.link.as_deref(),
                        )
                        .await
                    {
                        tracing::warn!("Failed to email notification to user {}: {}", user.id, e);
                    }
                });
            }
        }

        Ok(())
    }

    pub async fn list(
        &self,
        user_id: i32,
        unread_only: bool,
        page: PageParam,
    ) -> Result<Paginated<Notification>, AppError> {
        NotificationRepository::new(self.db)
            .get_paginated(user_id, unread_only, page)
            .await
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, AppError> {
        Ok(NotificationRepository::new(self.db)
            .unread_count(user_id)
            .await?)
    }

    /// Marks one of the caller's notifications as read.
    ///
    /// # Returns
    /// - `Ok(())` - Marked (or already read)
    /// - `Err(AppError::NotFound)` - No such notification for this user
    pub async fn mark_read(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        let found = NotificationRepository::new(self.db)
            .mark_read(id, user_id)
            .await?;

        if !found {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, AppError> {
        Ok(NotificationRepository::new(self.db)
            .mark_all_read(user_id)
            .await?)
    }
}
