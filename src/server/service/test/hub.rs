use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::hub::CreateHubDto,
    server::{
        data::hub_member::HubMemberRepository,
        error::AppError,
        model::{hub::HubRole, notification::NotificationKind},
        service::{hub::HubService, setting::SettingService},
    },
};

use super::{create_admin, create_user, notifications_for};

fn hub_dto(name: &str) -> CreateHubDto {
    CreateHubDto {
        name: name.to_string(),
        description: "Weekly meetups".to_string(),
        category: "technology".to_string(),
        is_private: false,
        max_members: None,
    }
}

/// Tests creating a hub makes the creator its owner.
///
/// Expected: member count is one and the creator holds the owner role
#[tokio::test]
async fn create_makes_actor_owner() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;
    let hub = HubService::new(db, None)
        .create(&user, hub_dto("Robotics Society"))
        .await?;

    assert_eq!(hub.member_count, 1);
    assert_eq!(hub.my_role, Some(HubRole::Owner));
    assert_eq!(
        HubMemberRepository::new(db).find_role(hub.hub.id, user.id).await?,
        Some(HubRole::Owner)
    );

    Ok(())
}

/// Tests hub names are unique.
///
/// Expected: Err(AppError::Conflict) for the second hub with the same name
#[tokio::test]
async fn create_rejects_duplicate_name() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let first = create_user(db).await?;
    let second = create_user(db).await?;
    let service = HubService::new(db, None);

    service.create(&first, hub_dto("Chess Club")).await?;
    let result = service.create(&second, hub_dto("Chess Club")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests the per-user ownership limit applies to regular users only.
///
/// Expected: the user's second hub is refused while an admin can exceed the limit
#[tokio::test]
async fn create_enforces_ownership_limit() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let admin = create_admin(db).await?;
    SettingService::new(db)
        .update(&admin, "max_hubs_per_user", &json!(1))
        .await?;

    let user = create_user(db).await?;
    let service = HubService::new(db, None);

    service.create(&user, hub_dto("Film Club")).await?;
    let result = service.create(&user, hub_dto("Drama Club")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    service.create(&admin, hub_dto("Admin Hub One")).await?;
    service.create(&admin, hub_dto("Admin Hub Two")).await?;

    Ok(())
}

/// Tests invalid hub fields are rejected before anything is written.
///
/// Expected: Err(AppError::BadRequest) for a short name and for a zero member limit
#[tokio::test]
async fn create_validates_fields() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;
    let service = HubService::new(db, None);

    let result = service.create(&user, hub_dto("ab")).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut dto = hub_dto("Valid Name");
    dto.max_members = Some(0);
    let result = service.create(&user, dto).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests the owner can neither leave nor be removed, while members can.
///
/// Expected: BadRequest for the owner, membership gone for the member
#[tokio::test]
async fn owner_stays_in_hub() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let member = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, member.id, "member").await?;

    let service = HubService::new(db, None);

    assert!(matches!(
        service.leave(hub.id, owner.id).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        service.remove_member(hub.id, owner.id).await,
        Err(AppError::BadRequest(_))
    ));

    service.leave(hub.id, member.id).await?;
    assert_eq!(
        HubMemberRepository::new(db).find_role(hub.id, member.id).await?,
        None
    );

    Ok(())
}

/// Tests removing a member notifies them.
///
/// Expected: the removed user has one RemovedFromGroup notification
#[tokio::test]
async fn remove_member_notifies_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let member = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, member.id, "member").await?;

    HubService::new(db, None)
        .remove_member(hub.id, member.id)
        .await?;

    let notifications = notifications_for(db, member.id).await?;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::RemovedFromGroup);

    Ok(())
}

/// Tests role changes cannot assign or touch ownership.
///
/// Expected: promoting to admin works, assigning owner is refused
#[tokio::test]
async fn set_member_role_guards_ownership() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let member = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, member.id, "member").await?;

    let service = HubService::new(db, None);

    service.set_member_role(hub.id, member.id, "admin").await?;
    assert_eq!(
        HubMemberRepository::new(db).find_role(hub.id, member.id).await?,
        Some(HubRole::Admin)
    );

    assert!(matches!(
        service.set_member_role(hub.id, member.id, "owner").await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        service.set_member_role(hub.id, owner.id, "member").await,
        Err(AppError::BadRequest(_))
    ));

    Ok(())
}
