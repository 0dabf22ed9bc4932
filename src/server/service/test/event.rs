use chrono::{Duration, Utc};
use test_utils::{
    builder::TestBuilder,
    factory::{self, event::EventFactory, hub::HubFactory},
};

use crate::{
    model::event::{CreateEventDto, UpdateEventDto},
    server::{
        error::{auth::AuthError, AppError},
        model::{notification::NotificationKind, pagination::PageParam},
        service::event::EventService,
    },
};

use super::{create_admin, create_user, notifications_for};

fn event_dto(starts_in: Duration) -> CreateEventDto {
    let starts_at = Utc::now() + starts_in;
    CreateEventDto {
        title: "Hack Night".to_string(),
        description: "Bring a laptop".to_string(),
        location: Some("Lab 3".to_string()),
        starts_at,
        ends_at: starts_at + Duration::hours(3),
        capacity: Some(30),
        registration_deadline: None,
    }
}

/// Tests creating an event notifies hub members other than the creator.
///
/// Expected: one EventCreated notification for the member, none for the creator
#[tokio::test]
async fn create_notifies_other_members() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let member = create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, member.id, "member").await?;

    let event = EventService::new(db, None)
        .create(&owner, hub.id, event_dto(Duration::days(2)))
        .await?;
    assert_eq!(event.registration_count, 0);

    let notifications = notifications_for(db, member.id).await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::EventCreated);
    assert_eq!(
        notifications[0].link,
        Some(format!("/events/{}", event.event.id))
    );
    assert!(notifications_for(db, owner.id).await?.is_empty());

    Ok(())
}

/// Tests event times are validated on creation.
///
/// Expected: Err(AppError::BadRequest) for a past start, an inverted range and a late deadline
#[tokio::test]
async fn create_validates_times() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let service = EventService::new(db, None);

    let result = service
        .create(&owner, hub.id, event_dto(-Duration::hours(1)))
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut dto = event_dto(Duration::days(1));
    dto.ends_at = dto.starts_at - Duration::minutes(1);
    let result = service.create(&owner, hub.id, dto).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut dto = event_dto(Duration::days(1));
    dto.registration_deadline = Some(dto.starts_at + Duration::hours(1));
    let result = service.create(&owner, hub.id, dto).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests registration respects capacity and refuses duplicates.
///
/// Expected: first registration succeeds, a repeat and an over-capacity one conflict
#[tokio::test]
async fn register_respects_capacity() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = EventFactory::new(db, hub.id, owner.id)
        .capacity(Some(1))
        .build()
        .await?;
    let first = create_user(db).await?;
    let second = create_user(db).await?;
    let service = EventService::new(db, None);

    let registered = service.register(&first, event.id).await?;
    assert!(registered.is_registered);
    assert_eq!(registered.registration_count, 1);

    let notifications = notifications_for(db, first.id).await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::EventRegistered);

    assert!(matches!(
        service.register(&first, event.id).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        service.register(&second, event.id).await,
        Err(AppError::Conflict(_))
    ));

    Ok(())
}

/// Tests registration closes at the deadline.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn register_after_deadline_fails() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = EventFactory::new(db, hub.id, owner.id)
        .registration_deadline(Some(Utc::now() - Duration::hours(1)))
        .build()
        .await?;
    let user = create_user(db).await?;

    let result = EventService::new(db, None).register(&user, event.id).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests events of private hubs are limited to members and admins.
///
/// Expected: AccessDenied for an outsider, success for a platform admin
#[tokio::test]
async fn private_hub_event_requires_membership() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;
    let hub = HubFactory::new(db, owner.id).private(true).build().await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;
    let outsider = create_user(db).await?;
    let admin = create_admin(db).await?;
    let service = EventService::new(db, None);

    assert!(matches!(
        service.register(&outsider, event.id).await,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));
    service.register(&admin, event.id).await?;

    Ok(())
}

/// Tests a private hub's event list is limited to members and admins.
///
/// Expected: AccessDenied for an outsider, the event for a member and for an admin
#[tokio::test]
async fn private_hub_event_list_requires_membership() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;
    let hub = HubFactory::new(db, owner.id).private(true).build().await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;
    let outsider = create_user(db).await?;
    let member = create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, member.id, "member").await?;
    let admin = create_admin(db).await?;
    let service = EventService::new(db, None);

    assert!(matches!(
        service.list_by_hub(hub.id, &outsider, PageParam::default()).await,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));

    for viewer in [&member, &admin] {
        let page = service.list_by_hub(hub.id, viewer, PageParam::default()).await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].event.id, event.id);
    }

    Ok(())
}

/// Tests unregistering requires an existing registration.
///
/// Expected: first unregister succeeds, the second returns NotFound
#[tokio::test]
async fn unregister_removes_registration() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;
    let user = create_user(db).await?;
    factory::event::register_user(db, event.id, user.id).await?;

    let service = EventService::new(db, None);
    service.unregister(user.id, event.id).await?;

    assert!(matches!(
        service.unregister(user.id, event.id).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}

/// Tests capacity cannot be lowered below the current registrations.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn update_keeps_capacity_above_registrations() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;
    for _ in 0..2 {
        let user = factory::user::create_user(db).await?;
        factory::event::register_user(db, event.id, user.id).await?;
    }

    let result = EventService::new(db, None)
        .update(
            event.id,
            owner.id,
            UpdateEventDto {
                capacity: Some(1),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests cancelling an event notifies its registrants.
///
/// Expected: EventCancelled notification and the event is no longer found
#[tokio::test]
async fn delete_notifies_registrants() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;
    let user = create_user(db).await?;
    factory::event::register_user(db, event.id, user.id).await?;

    let service = EventService::new(db, None);
    service.delete(&owner, event.id).await?;

    let notifications = notifications_for(db, user.id).await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::EventCancelled);

    assert!(matches!(
        service.get(event.id, user.id).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}

/// Tests reminders go out once for events inside the reminder window.
///
/// Expected: one event reminded on the first sweep, none on the second
#[tokio::test]
async fn sends_each_reminder_once() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let soon = EventFactory::new(db, hub.id, owner.id)
        .starts_at(Utc::now() + Duration::hours(2))
        .build()
        .await?;
    let later = EventFactory::new(db, hub.id, owner.id)
        .starts_at(Utc::now() + Duration::days(3))
        .build()
        .await?;
    let user = create_user(db).await?;
    factory::event::register_user(db, soon.id, user.id).await?;
    factory::event::register_user(db, later.id, user.id).await?;

    let service = EventService::new(db, None);

    assert_eq!(service.send_due_reminders(Utc::now()).await?, 1);
    assert_eq!(service.send_due_reminders(Utc::now()).await?, 0);

    let notifications = notifications_for(db, user.id).await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::EventReminder);
    assert_eq!(notifications[0].link, Some(format!("/events/{}", soon.id)));

    Ok(())
}

/// Tests moving an event's start re-arms its reminder.
///
/// Expected: a reminded event is reminded again after being rescheduled into the window
#[tokio::test]
async fn rescheduling_rearms_reminder() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = EventFactory::new(db, hub.id, owner.id)
        .starts_at(Utc::now() + Duration::hours(3))
        .reminder_sent(true)
        .build()
        .await?;

    let service = EventService::new(db, None);
    assert_eq!(service.send_due_reminders(Utc::now()).await?, 0);

    let starts_at = Utc::now() + Duration::hours(5);
    service
        .update(
            event.id,
            owner.id,
            UpdateEventDto {
                starts_at: Some(starts_at),
                ends_at: Some(starts_at + Duration::hours(1)),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(service.send_due_reminders(Utc::now()).await?, 1);

    Ok(())
}
