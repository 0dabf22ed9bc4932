//! Hub events, registrations and reminders.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;

use crate::{
    model::event::{CreateEventDto, UpdateEventDto},
    server::{
        data::{
            audit_log::AuditLogRepository, event::EventRepository,
            event_registration::EventRegistrationRepository, hub::HubRepository,
            hub_member::HubMemberRepository,
        },
        error::{auth::AuthError, AppError},
        model::{
            audit::{action, RecordAuditParam},
            event::{
                CreateEventParam, Event, EventRegistration, EventWithStats, UpdateEventParam,
            },
            notification::{NewNotification, NotificationKind},
            pagination::{PageParam, Paginated},
            user::User,
        },
        service::notification::{email::Mailer, NotificationService},
        util::validate,
    },
};

const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_LOCATION_LEN: usize = 200;

/// How far ahead of its start an event's registrants are reminded.
pub const REMINDER_WINDOW_HOURS: i64 = 24;

pub struct EventService<'a> {
    db: &'a DatabaseConnection,
    mailer: Option<&'a Mailer>,
}

impl<'a> EventService<'a> {
    pub fn new(db: &'a DatabaseConnection, mailer: Option<&'a Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Creates an event in a hub and notifies the hub's members.
    ///
    /// # Returns
    /// - `Ok(EventWithStats)` - The new event
    /// - `Err(AppError::BadRequest)` - Invalid field, past start or deadline after start
    /// - `Err(AppError::NotFound)` - Hub does not exist
    pub async fn create(
        &self,
        actor: &User,
        hub_id: i32,
        dto: CreateEventDto,
    ) -> Result<EventWithStats, AppError> {
        let now = Utc::now();

        validate::time_range(dto.starts_at, dto.ends_at)?;
        if dto.starts_at <= now {
            return Err(AppError::BadRequest(
                "starts_at must be in the future".to_string(),
            ));
        }
        check_deadline(dto.registration_deadline, dto.starts_at)?;

        let param = CreateEventParam {
            hub_id,
            created_by: actor.id,
            title: validate::text("title", &dto.title, 3, 150)?,
            description: validate::text("description", &dto.description, 0, MAX_DESCRIPTION_LEN)?,
            location: validate::optional_text("location", dto.location.as_deref(), MAX_LOCATION_LEN)?,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
            capacity: validate::positive("capacity", dto.capacity)?,
            registration_deadline: dto.registration_deadline,
        };

        let hub = HubRepository::new(self.db)
            .find_by_id(hub_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hub not found".to_string()))?;

        let event = EventRepository::new(self.db).create(param).await?;

        let recipients: Vec<i32> = HubMemberRepository::new(self.db)
            .member_ids(hub_id)
            .await?
            .into_iter()
            .filter(|id| *id != actor.id)
            .collect();

        NotificationService::new(self.db, self.mailer)
            .notify(
                &recipients,
                NewNotification::new(
                    NotificationKind::EventCreated,
                    format!("New event in {}", hub.name),
                    format!(
                        "{} starts {}",
                        event.title,
                        event.starts_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                )
                .with_link(format!("/events/{}", event.id)),
            )
            .await?;

        tracing::info!("User {} created event {} in hub {}", actor.id, event.id, hub_id);

        Ok(EventWithStats {
            event,
            registration_count: 0,
            is_registered: false,
        })
    }

    /// Lists events that have not started in public hubs and in hubs the caller belongs to.
    pub async fn list_upcoming(
        &self,
        user_id: i32,
        page: PageParam,
    ) -> Result<Paginated<EventWithStats>, AppError> {
        let hub_repo = HubRepository::new(self.db);

        let mut hub_ids = hub_repo.get_public_ids().await?;
        let member_hub_ids = HubMemberRepository::new(self.db)
            .hub_ids_for_user(user_id)
            .await?;
        hub_ids.extend(
            hub_repo
                .find_by_ids(&member_hub_ids)
                .await?
                .into_iter()
                .map(|hub| hub.id),
        );
        hub_ids.sort_unstable();
        hub_ids.dedup();

        let events = EventRepository::new(self.db)
            .get_upcoming_paginated(&hub_ids, Utc::now(), page)
            .await?;

        self.with_stats(events, user_id).await
    }

    /// Events of one hub. A private hub's events are only listed for its members and admins.
    pub async fn list_by_hub(
        &self,
        hub_id: i32,
        actor: &User,
        page: PageParam,
    ) -> Result<Paginated<EventWithStats>, AppError> {
        let hub = HubRepository::new(self.db)
            .find_by_id(hub_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hub not found".to_string()))?;

        if hub.is_private && !actor.admin {
            let role = HubMemberRepository::new(self.db)
                .find_role(hub_id, actor.id)
                .await?;
            if role.is_none() {
                return Err(AuthError::AccessDenied(
                    actor.id,
                    format!("Hub {} is private", hub_id),
                )
                .into());
            }
        }

        let events = EventRepository::new(self.db)
            .get_paginated_by_hub(hub_id, page)
            .await?;

        self.with_stats(events, actor.id).await
    }

    pub async fn get(&self, id: i32, user_id: i32) -> Result<EventWithStats, AppError> {
        let event = self.find(id).await?;

        let registration_repo = EventRegistrationRepository::new(self.db);
        let registration_count = registration_repo.count(id).await?;
        let is_registered = registration_repo.is_registered(id, user_id).await?;

        Ok(EventWithStats {
            event,
            registration_count,
            is_registered,
        })
    }

    /// Applies event changes.
    ///
    /// Time fields are validated against the merged result. Moving the start re-arms the
    /// reminder.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        dto: UpdateEventDto,
    ) -> Result<EventWithStats, AppError> {
        let param = UpdateEventParam {
            title: dto
                .title
                .map(|t| validate::text("title", &t, 3, 150))
                .transpose()?,
            description: dto
                .description
                .map(|d| validate::text("description", &d, 0, MAX_DESCRIPTION_LEN))
                .transpose()?,
            location: dto
                .location
                .map(|l| validate::text("location", &l, 0, MAX_LOCATION_LEN))
                .transpose()?,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
            capacity: validate::positive("capacity", dto.capacity)?,
            registration_deadline: dto.registration_deadline,
        };

        let txn = self.db.begin().await?;
        let repo = EventRepository::new(&txn);

        let current = repo.find_by_id(id).await?.ok_or_else(event_not_found)?;

        let starts_at = param.starts_at.unwrap_or(current.starts_at);
        let ends_at = param.ends_at.unwrap_or(current.ends_at);
        validate::time_range(starts_at, ends_at)?;
        if param.starts_at.is_some_and(|s| s != current.starts_at) && starts_at <= Utc::now() {
            return Err(AppError::BadRequest(
                "starts_at must be in the future".to_string(),
            ));
        }
        check_deadline(
            param.registration_deadline.or(current.registration_deadline),
            starts_at,
        )?;

        let registration_repo = EventRegistrationRepository::new(&txn);
        let registration_count = registration_repo.count(id).await?;
        if let Some(capacity) = param.capacity {
            if (capacity as u64) < registration_count {
                return Err(AppError::BadRequest(format!(
                    "capacity cannot be below the current registration count ({})",
                    registration_count
                )));
            }
        }

        let event = repo.update(id, param).await?.ok_or_else(event_not_found)?;
        let is_registered = registration_repo.is_registered(id, user_id).await?;
        txn.commit().await?;

        Ok(EventWithStats {
            event,
            registration_count,
            is_registered,
        })
    }

    /// Soft-deletes an event, audits it and tells registrants it was cancelled.
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let repo = EventRepository::new(&txn);

        let event = repo.find_by_id(id).await?.ok_or_else(event_not_found)?;
        let registrants = EventRegistrationRepository::new(&txn)
            .registrant_ids(id)
            .await?;
        repo.soft_delete(id).await?;

        AuditLogRepository::new(&txn)
            .create(RecordAuditParam {
                actor_id: Some(actor.id),
                action: action::EVENT_DELETED,
                target_type: "event",
                target_id: Some(id),
                details: json!({
                    "title": event.title,
                    "hub_id": event.hub_id,
                    "registrations": registrants.len(),
                }),
            })
            .await?;

        txn.commit().await?;

        NotificationService::new(self.db, self.mailer)
            .notify(
                &registrants,
                NewNotification::new(
                    NotificationKind::EventCancelled,
                    "Event cancelled",
                    format!("{} has been cancelled", event.title),
                ),
            )
            .await?;

        Ok(())
    }

    /// Registers `actor` for an event.
    ///
    /// The capacity check and the insert share one transaction.
    ///
    /// # Returns
    /// - `Ok(EventWithStats)` - The event with the caller registered
    /// - `Err(AppError::BadRequest)` - Event started or registration deadline passed
    /// - `Err(AppError::AuthErr(AccessDenied))` - Private hub and the caller is not a member
    /// - `Err(AppError::Conflict)` - Already registered or the event is full
    pub async fn register(&self, actor: &User, id: i32) -> Result<EventWithStats, AppError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let event = EventRepository::new(&txn)
            .find_by_id(id)
            .await?
            .ok_or_else(event_not_found)?;

        if event.has_started(now) {
            return Err(AppError::BadRequest("The event has already started".to_string()));
        }
        if event.registration_closed(now) {
            return Err(AppError::BadRequest(
                "The registration deadline has passed".to_string(),
            ));
        }

        let hub = HubRepository::new(&txn)
            .find_by_id(event.hub_id)
            .await?
            .ok_or_else(event_not_found)?;
        if hub.is_private && !actor.admin {
            let role = HubMemberRepository::new(&txn)
                .find_role(hub.id, actor.id)
                .await?;
            if role.is_none() {
                return Err(AuthError::AccessDenied(
                    actor.id,
                    format!("Event {} belongs to private hub {}", id, hub.id),
                )
                .into());
            }
        }

        let registration_repo = EventRegistrationRepository::new(&txn);
        if registration_repo.is_registered(id, actor.id).await? {
            return Err(AppError::Conflict(
                "You are already registered for this event".to_string(),
            ));
        }

        let registration_count = registration_repo.count(id).await?;
        if event.is_full(registration_count) {
            return Err(AppError::Conflict("The event is full".to_string()));
        }

        registration_repo.register(id, actor.id).await?;
        txn.commit().await?;

        NotificationService::new(self.db, self.mailer)
            .notify(
                &[actor.id],
                NewNotification::new(
                    NotificationKind::EventRegistered,
                    "Registration confirmed",
                    format!(
                        "You are registered for {} on {}",
                        event.title,
                        event.starts_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                )
                .with_link(format!("/events/{}", id)),
            )
            .await?;

        Ok(EventWithStats {
            event,
            registration_count: registration_count + 1,
            is_registered: true,
        })
    }

    /// Cancels the caller's registration. Only possible before the event starts.
    pub async fn unregister(&self, user_id: i32, id: i32) -> Result<(), AppError> {
        let event = self.find(id).await?;

        if event.has_started(Utc::now()) {
            return Err(AppError::BadRequest("The event has already started".to_string()));
        }

        let removed = EventRegistrationRepository::new(self.db)
            .unregister(id, user_id)
            .await?;
        if !removed {
            return Err(AppError::NotFound(
                "You are not registered for this event".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn registrations(&self, id: i32) -> Result<Vec<EventRegistration>, AppError> {
        self.find(id).await?;

        Ok(EventRegistrationRepository::new(self.db)
            .get_registrations(id)
            .await?)
    }

    /// Sends a reminder to the registrants of every event starting within the reminder
    /// window that has not been reminded yet.
    ///
    /// Each event is flagged before its notifications go out so an overlapping run cannot
    /// remind twice.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of events reminded
    pub async fn send_due_reminders(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let event_repo = EventRepository::new(self.db);
        let registration_repo = EventRegistrationRepository::new(self.db);
        let notifications = NotificationService::new(self.db, self.mailer);

        let due = event_repo
            .due_for_reminder(now, now + Duration::hours(REMINDER_WINDOW_HOURS))
            .await?;

        let mut reminded = 0;
        for event in due {
            if !event_repo.mark_reminded(event.id).await? {
                continue;
            }

            let registrants = registration_repo.registrant_ids(event.id).await?;
            notifications
                .notify(
                    &registrants,
                    NewNotification::new(
                        NotificationKind::EventReminder,
                        format!("Reminder: {}", event.title),
                        format!(
                            "{} starts {}",
                            event.title,
                            event.starts_at.format("%Y-%m-%d %H:%M UTC")
                        ),
                    )
                    .with_link(format!("/events/{}", event.id)),
                )
                .await?;

            reminded += 1;
        }

        Ok(reminded)
    }

    async fn find(&self, id: i32) -> Result<Event, AppError> {
        EventRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(event_not_found)
    }

    async fn with_stats(
        &self,
        events: Paginated<Event>,
        user_id: i32,
    ) -> Result<Paginated<EventWithStats>, AppError> {
        let registration_repo = EventRegistrationRepository::new(self.db);
        let ids: Vec<i32> = events.items.iter().map(|e| e.id).collect();
        let counts = registration_repo.counts(&ids).await?;
        let registered = registration_repo.event_ids_for_user(user_id, &ids).await?;

        Ok(events.map(|event| EventWithStats {
            registration_count: counts.get(&event.id).copied().unwrap_or(0),
            is_registered: registered.contains(&event.id),
            event,
        }))
    }
}

fn check_deadline(
    deadline: Option<DateTime<Utc>>,
    starts_at: DateTime<Utc>,
) -> Result<(), AppError> {
    if deadline.is_some_and(|d| d > starts_at) {
        return Err(AppError::BadRequest(
            "registration_deadline must not be after starts_at".to_string(),
        ));
    }
    Ok(())
}

fn event_not_found() -> AppError {
    AppError::NotFound("Event not found".to_string())
}
