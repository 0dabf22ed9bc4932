use crate::server::{data::hub_member::HubMemberRepository, model::hub::HubRole};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests member listing order.
///
/// Expected: owner first, then remaining members in join order
#[tokio::test]
async fn lists_owner_first() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let first = factory::user::create_user(db).await?;
    let second = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, first.id, "member").await?;
    factory::hub::add_hub_member(db, hub.id, second.id, "admin").await?;

    let members = HubMemberRepository::new(db).get_members(hub.id).await.unwrap();

    assert_eq!(members.len(), 3);
    assert_eq!(members[0].user_id, owner.id);
    assert_eq!(members[0].role, HubRole::Owner);

    Ok(())
}

/// Tests counting members across several hubs at once.
///
/// Expected: counts keyed by hub ID, hubs without rows absent
#[tokio::test]
async fn counts_members_per_hub() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub_a) = factory::helpers::create_hub_with_owner(db).await?;
    let (_, hub_b) = factory::helpers::create_hub_with_owner(db).await?;
    let extra = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub_a.id, extra.id, "member").await?;

    let counts = HubMemberRepository::new(db)
        .counts(&[hub_a.id, hub_b.id, 999])
        .await?;

    assert_eq!(counts.get(&hub_a.id), Some(&2));
    assert_eq!(counts.get(&hub_b.id), Some(&1));
    assert_eq!(counts.get(&999), None);

    Ok(())
}

/// Tests changing and removing a membership.
///
/// Expected: role updated, then membership removed
#[tokio::test]
async fn changes_role_and_removes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let user = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, user.id, "member").await?;

    let repo = HubMemberRepository::new(db);

    assert!(repo.set_role(hub.id, user.id, HubRole::Admin).await?);
    assert_eq!(
        repo.find_role(hub.id, user.id).await.unwrap(),
        Some(HubRole::Admin)
    );
    assert_eq!(repo.manager_ids(hub.id).await?.len(), 2);

    assert!(repo.remove(hub.id, user.id).await?);
    assert_eq!(repo.find_role(hub.id, user.id).await.unwrap(), None);

    Ok(())
}

/// Tests the membership table refuses a second row for the same user and hub.
///
/// Expected: second add fails, member count unchanged
#[tokio::test]
async fn rejects_duplicate_membership() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let user = factory::user::create_user(db).await?;
    let repo = HubMemberRepository::new(db);

    repo.add(hub.id, user.id, HubRole::Member).await?;
    assert!(repo.add(hub.id, user.id, HubRole::Admin).await.is_err());
    assert_eq!(repo.count(hub.id).await?, 2);

    Ok(())
}
