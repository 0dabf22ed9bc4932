use super::*;

/// Tests that creating a hub also creates the owner membership.
///
/// Expected: Ok with the owner holding the owner role and a member count of 1
#[tokio::test]
async fn creates_hub_with_owner_membership() -> Result<(), sea_orm::DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;

    let hub = HubRepository::new(db)
        .create(CreateHubParam {
            owner_id: owner.id,
            name: "Robotics".to_string(),
            description: "Build things".to_string(),
            category: "engineering".to_string(),
            is_private: false,
            max_members: Some(30),
        })
        .await?;

    let members = HubMemberRepository::new(db);
    let role = members.find_role(hub.id, owner.id).await.unwrap();

    assert_eq!(hub.owner_id, owner.id);
    assert_eq!(role, Some(HubRole::Owner));
    assert_eq!(members.count(hub.id).await?, 1);

    Ok(())
}
