use super::*;

/// Tests soft deletion hides the hub and is not repeatable.
///
/// Expected: first delete true, hub no longer found, second delete false
#[tokio::test]
async fn hides_hub_after_delete() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let repo = HubRepository::new(db);

    assert!(repo.soft_delete(hub.id).await?);
    assert!(repo.find_by_id(hub.id).await?.is_none());
    assert!(!repo.soft_delete(hub.id).await?);

    Ok(())
}

/// Tests deleting a hub also hides its projects, programmes and events.
///
/// Expected: children not found, no upcoming or due events, another hub's event untouched
#[tokio::test]
async fn hides_children_after_delete() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let project = factory::project::create_project(db, hub.id, owner.id).await?;
    let programme = factory::programme::create_programme(db, hub.id, owner.id).await?;
    let soon = Utc::now() + Duration::hours(2);
    let event = factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(soon)
        .build()
        .await?;
    let (other_owner, other_hub) = factory::helpers::create_hub_with_owner(db).await?;
    let other_event = factory::event::create_event(db, other_hub.id, other_owner.id).await?;

    assert!(HubRepository::new(db).soft_delete(hub.id).await?);

    assert!(ProjectRepository::new(db)
        .find_by_id(project.id)
        .await?
        .is_none());
    assert!(ProgrammeRepository::new(db)
        .find_by_id(programme.id)
        .await?
        .is_none());

    let event_repo = EventRepository::new(db);
    let now = Utc::now();
    assert!(event_repo.find_by_id(event.id).await?.is_none());
    assert!(event_repo
        .due_for_reminder(now, now + Duration::hours(24))
        .await?
        .is_empty());

    let upcoming = event_repo.get_all_upcoming(now).await?;
    assert_eq!(
        upcoming.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![other_event.id]
    );
    assert_eq!(event_repo.count_upcoming(now).await?, 1);

    Ok(())
}

/// Tests updating a deleted hub.
///
/// Expected: Ok(None)
#[tokio::test]
async fn update_ignores_deleted_hub() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;
    let hub = factory::hub::HubFactory::new(db, owner.id)
        .deleted()
        .build()
        .await?;

    let result = HubRepository::new(db)
        .update(
            hub.id,
            UpdateHubParam {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await?;

    assert!(result.is_none());

    Ok(())
}
