use crate::server::data::event_registration::EventRegistrationRepository;
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests registering, counting and unregistering.
///
/// Expected: registration visible in count and lookup, gone after unregister
#[tokio::test]
async fn registers_and_unregisters() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;
    let user = factory::user::create_user(db).await?;

    let repo = EventRegistrationRepository::new(db);
    repo.register(event.id, user.id).await?;

    assert!(repo.is_registered(event.id, user.id).await?);
    assert_eq!(repo.count(event.id).await?, 1);
    assert_eq!(repo.registrant_ids(event.id).await?, vec![user.id]);

    assert!(repo.unregister(event.id, user.id).await?);
    assert!(!repo.unregister(event.id, user.id).await?);
    assert_eq!(repo.count(event.id).await?, 0);

    Ok(())
}

/// Tests that a user cannot register twice.
///
/// Expected: Err(DbErr) from the unique index
#[tokio::test]
async fn rejects_duplicate_registration() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let event = factory::event::create_event(db, hub.id, owner.id).await?;

    let repo = EventRegistrationRepository::new(db);
    repo.register(event.id, owner.id).await?;

    assert!(repo.register(event.id, owner.id).await.is_err());

    Ok(())
}

/// Tests the per-user upcoming registration summary.
///
/// Expected: only the future event, ordered by start time
#[tokio::test]
async fn summarises_upcoming_registrations() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let now = Utc::now();
    let future = factory::event::create_event(db, hub.id, owner.id).await?;
    let past = factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(now - Duration::days(2))
        .build()
        .await?;
    factory::event::register_user(db, future.id, owner.id).await?;
    factory::event::register_user(db, past.id, owner.id).await?;

    let summaries = EventRegistrationRepository::new(db)
        .upcoming_for_user(owner.id, now)
        .await?;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].event_id, future.id);

    Ok(())
}
