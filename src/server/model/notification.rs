//! Notification domain models.

use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

use crate::{
    model::notification::{NotificationDto, PaginatedNotificationsDto},
    server::{error::AppError, model::pagination::Paginated, util::parse::parse_stored},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    JoinRequestReceived,
    JoinRequestApproved,
    JoinRequestRejected,
    EventCreated,
    EventRegistered,
    EventCancelled,
    EventReminder,
    RoleChanged,
    RemovedFromGroup,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JoinRequestReceived => "join_request_received",
            Self::JoinRequestApproved => "join_request_approved",
            Self::JoinRequestRejected => "join_request_rejected",
            Self::EventCreated => "event_created",
            Self::EventRegistered => "event_registered",
            Self::EventCancelled => "event_cancelled",
            Self::EventReminder => "event_reminder",
            Self::RoleChanged => "role_changed",
            Self::RemovedFromGroup => "removed_from_group",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join_request_received" => Ok(Self::JoinRequestReceived),
            "join_request_approved" => Ok(Self::JoinRequestApproved),
            "join_request_rejected" => Ok(Self::JoinRequestRejected),
            "event_created" => Ok(Self::EventCreated),
            "event_registered" => Ok(Self::EventRegistered),
            "event_cancelled" => Ok(Self::EventCancelled),
            "event_reminder" => Ok(Self::EventReminder),
            "role_changed" => Ok(Self::RoleChanged),
            "removed_from_group" => Ok(Self::RemovedFromGroup),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_entity(entity: entity::notification::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            kind: parse_stored("notification.kind", entity.kind)?,
            title: entity.title,
            body: entity.body,
            link: entity.link,
            read_at: entity.read_at,
            created_at: entity.created_at,
        })
    }

    pub fn into_dto(self) -> NotificationDto {
        NotificationDto {
            id: self.id,
            kind: self.kind.to_string(),
            title: self.title,
            body: self.body,
            link: self.link,
            read_at: self.read_at,
            created_at: self.created_at,
        }
    }
}

impl Paginated<Notification> {
    pub fn into_dto(self) -> PaginatedNotificationsDto {
        let page = self.map(Notification::into_dto);
        PaginatedNotificationsDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// Content of a notification before it is fanned out to recipients.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Relative application path the notification points at.
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
