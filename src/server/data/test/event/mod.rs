use crate::server::{
    data::event::EventRepository,
    model::{event::UpdateEventParam, pagination::PageParam},
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests selecting events inside the reminder window.
///
/// Events already reminded, already started, or starting after the window
/// are skipped.
///
/// Expected: only the event starting within the next 24 hours
#[tokio::test]
async fn selects_events_due_for_reminder() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let now = Utc::now();

    let due = factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(now + Duration::hours(3))
        .build()
        .await?;
    factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(now + Duration::hours(5))
        .reminder_sent(true)
        .build()
        .await?;
    factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(now + Duration::days(3))
        .build()
        .await?;
    factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(now - Duration::hours(1))
        .build()
        .await?;

    let events = EventRepository::new(db)
        .due_for_reminder(now, now + Duration::hours(24))
        .await?;

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, due.id);

    Ok(())
}

/// Tests that marking a reminder only succeeds once.
///
/// Expected: true, then false
#[tokio::test]
async fn marks_reminder_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;

    let repo = EventRepository::new(db);

    assert!(repo.mark_reminded(event.id).await?);
    assert!(!repo.mark_reminded(event.id).await?);

    Ok(())
}

/// Tests that rescheduling an event re-arms its reminder.
///
/// Expected: reminder_sent false after moving the start time
#[tokio::test]
async fn rescheduling_resets_reminder() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = factory::event::EventFactory::new(db, hub.id, owner.id)
        .reminder_sent(true)
        .build()
        .await?;

    let new_start = event.starts_at + Duration::days(7);
    let updated = EventRepository::new(db)
        .update(
            event.id,
            UpdateEventParam {
                starts_at: Some(new_start),
                ends_at: Some(new_start + Duration::hours(1)),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert!(!updated.reminder_sent);
    assert_eq!(updated.starts_at, new_start);

    Ok(())
}

/// Tests the upcoming listing only covers the given hubs and future events.
///
/// Expected: one upcoming event from the member hub
#[tokio::test]
async fn lists_upcoming_events_for_hubs() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let (other_owner, other_hub) = factory::helpers::create_hub_with_owner(db).await?;
    let now = Utc::now();

    let upcoming = factory::event::create_event(db, hub.id, owner.id).await?;
    factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(now - Duration::days(1))
        .build()
        .await?;
    factory::event::create_event(db, other_hub.id, other_owner.id).await?;

    let result = EventRepository::new(db)
        .get_upcoming_paginated(&[hub.id], now, PageParam::default())
        .await?;

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].id, upcoming.id);

    Ok(())
}
