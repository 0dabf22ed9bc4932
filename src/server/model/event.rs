//! Event domain models and parameters.

use chrono::{DateTime, Utc};

use crate::{
    model::event::{EventDto, EventRegistrationDto, PaginatedEventsDto},
    server::model::pagination::Paginated,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i32,
    pub hub_id: i32,
    pub created_by: i32,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn from_entity(entity: entity::event::Model) -> Self {
        Self {
            id: entity.id,
            hub_id: entity.hub_id,
            created_by: entity.created_by,
            title: entity.title,
            description: entity.description,
            location: entity.location,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            capacity: entity.capacity,
            registration_deadline: entity.registration_deadline,
            reminder_sent: entity.reminder_sent,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Whether `registration_count` has reached the event's capacity.
    pub fn is_full(&self, registration_count: u64) -> bool {
        self.capacity
            .is_some_and(|cap| registration_count >= cap.max(0) as u64)
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now
    }

    pub fn registration_closed(&self, now: DateTime<Utc>) -> bool {
        self.registration_deadline.is_some_and(|deadline| deadline < now)
    }
}

/// Event with its registration count and whether the caller is registered.
#[derive(Debug, Clone, PartialEq)]
pub struct EventWithStats {
    pub event: Event,
    pub registration_count: u64,
    pub is_registered: bool,
}

impl EventWithStats {
    pub fn into_dto(self) -> EventDto {
        EventDto {
            id: self.event.id,
            hub_id: self.event.hub_id,
            created_by: self.event.created_by,
            title: self.event.title,
            description: self.event.description,
            location: self.event.location,
            starts_at: self.event.starts_at,
            ends_at: self.event.ends_at,
            capacity: self.event.capacity,
            registration_deadline: self.event.registration_deadline,
            registration_count: self.registration_count,
            is_registered: self.is_registered,
            created_at: self.event.created_at,
            updated_at: self.event.updated_at,
        }
    }
}

impl Paginated<EventWithStats> {
    pub fn into_dto(self) -> PaginatedEventsDto {
        let page = self.map(EventWithStats::into_dto);
        PaginatedEventsDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// A registration joined with the registrant's name.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRegistration {
    pub user_id: i32,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

impl EventRegistration {
    pub fn into_dto(self) -> EventRegistrationDto {
        EventRegistrationDto {
            user_id: self.user_id,
            name: self.name,
            registered_at: self.registered_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventParam {
    pub hub_id: i32,
    pub created_by: i32,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventParam {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(capacity: Option<i32>, deadline: Option<DateTime<Utc>>) -> Event {
        let now = Utc::now();
        Event {
            id: 1,
            hub_id: 1,
            created_by: 1,
            title: "Robot Wars".to_string(),
            description: String::new(),
            location: None,
            starts_at: now + Duration::days(1),
            ends_at: now + Duration::days(1) + Duration::hours(2),
            capacity,
            registration_deadline: deadline,
            reminder_sent: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn capacity_is_inclusive() {
        let e = event(Some(2), None);
        assert!(!e.is_full(1));
        assert!(e.is_full(2));
        assert!(!event(None, None).is_full(10_000));
    }

    #[test]
    fn deadline_in_past_closes_registration() {
        let now = Utc::now();
        assert!(event(None, Some(now - Duration::minutes(1))).registration_closed(now));
        assert!(!event(None, Some(now + Duration::minutes(1))).registration_closed(now));
        assert!(!event(None, None).registration_closed(now));
    }
}
