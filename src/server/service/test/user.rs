use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    error::AppError,
    model::{hub::HubRole, join_request::JoinTarget},
    service::{join_request::JoinRequestService, user::UserService},
};

use super::create_user;

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Tests interest tags are trimmed, lowercased and de-duplicated on update.
///
/// Expected: ["robotics", "ai"] in first-seen order
#[tokio::test]
async fn update_profile_normalises_interests() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;

    let updated = UserService::new(db)
        .update_profile(
            user.id,
            Some("  Ada Lovelace ".to_string()),
            Some("Engineering".to_string()),
            Some(tags(&[" Robotics", "AI", "robotics ", ""])),
        )
        .await?;

    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.department.as_deref(), Some("Engineering"));
    assert_eq!(updated.interests, tags(&["robotics", "ai"]));

    Ok(())
}

/// Tests a blank department clears it while untouched fields keep their values.
///
/// Expected: department None, interests unchanged
#[tokio::test]
async fn update_profile_clears_blank_department() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;
    let service = UserService::new(db);
    service
        .update_profile(
            user.id,
            None,
            Some("Physics".to_string()),
            Some(tags(&["optics"])),
        )
        .await?;

    let updated = service
        .update_profile(user.id, None, Some("   ".to_string()), None)
        .await?;

    assert_eq!(updated.department, None);
    assert_eq!(updated.interests, tags(&["optics"]));

    Ok(())
}

/// Tests more than twenty distinct interests are refused.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn update_profile_limits_interests() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;
    let many: Vec<String> = (0..21).map(|i| format!("topic{}", i)).collect();

    let result = UserService::new(db)
        .update_profile(user.id, None, None, Some(many))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests memberships cover hubs, projects, programmes and upcoming registrations only.
///
/// Expected: one of each, the past event left out
#[tokio::test]
async fn memberships_collects_every_group() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;
    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    factory::hub::add_hub_member(db, hub.id, user.id, "member").await?;
    let project = factory::project::create_project(db, hub.id, user.id).await?;
    let programme = factory::programme::create_programme(db, hub.id, owner.id).await?;
    factory::programme::add_programme_member(db, programme.id, user.id).await?;

    let upcoming = factory::event::create_event(db, hub.id, owner.id).await?;
    let past = factory::event::EventFactory::new(db, hub.id, owner.id)
        .starts_at(Utc::now() - Duration::days(2))
        .build()
        .await?;
    factory::event::register_user(db, upcoming.id, user.id).await?;
    factory::event::register_user(db, past.id, user.id).await?;

    let memberships = UserService::new(db).memberships(user.id).await?;

    assert_eq!(memberships.hubs.len(), 1);
    assert_eq!(memberships.hubs[0].hub_id, hub.id);
    assert_eq!(memberships.hubs[0].role, HubRole::Member);
    assert_eq!(memberships.projects.len(), 1);
    assert_eq!(memberships.projects[0].project_id, project.id);
    assert_eq!(memberships.programmes.len(), 1);
    assert_eq!(memberships.programmes[0].programme_id, programme.id);
    assert_eq!(memberships.events.len(), 1);
    assert_eq!(memberships.events[0].event_id, upcoming.id);

    Ok(())
}

/// Tests the caller's join requests come back newest first.
///
/// Expected: the later request first, another user's request absent
#[tokio::test]
async fn join_requests_are_newest_first() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;
    let other = create_user(db).await?;
    let (_, first_hub) = factory::helpers::create_hub_with_owner(db).await?;
    let (_, second_hub) = factory::helpers::create_hub_with_owner(db).await?;

    factory::join_request::JoinRequestFactory::new(db, "hub", first_hub.id, user.id)
        .created_at(Utc::now() - Duration::days(1))
        .build()
        .await?;
    factory::join_request::create_pending_request(db, "hub", second_hub.id, user.id).await?;
    factory::join_request::create_pending_request(db, "hub", first_hub.id, other.id).await?;

    let requests = JoinRequestService::new(db, None)
        .list_for_user(user.id)
        .await?;

    let targets: Vec<JoinTarget> = requests.iter().map(|r| r.target).collect();
    assert_eq!(
        targets,
        vec![JoinTarget::Hub(second_hub.id), JoinTarget::Hub(first_hub.id)]
    );

    Ok(())
}
