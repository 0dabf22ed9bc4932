use super::*;

/// Tests hub manage permission for each role.
///
/// Expected: owner and admin members pass, plain members and outsiders are denied
#[tokio::test]
async fn hub_manage_requires_manager_role() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let hub_admin = factory::user::create_user(db).await?;
    let member = factory::user::create_user(db).await?;
    let outsider = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, hub_admin.id, "admin").await?;
    factory::hub::add_hub_member(db, hub.id, member.id, "member").await?;

    let cases = [
        (owner.id, true),
        (hub_admin.id, true),
        (member.id, false),
        (outsider.id, false),
    ];

    for (user_id, allowed) in cases {
        AuthSession::new(session).set_user_id(user_id).await?;
        let result = AuthGuard::new(db, session)
            .require(&[Permission::HubManage(hub.id)])
            .await;
        assert_eq!(result.is_ok(), allowed, "user {user_id}");
    }

    Ok(())
}

/// Tests that only the owner holds the hub owner permission.
///
/// Expected: hub admin denied, owner granted
#[tokio::test]
async fn hub_owner_excludes_hub_admins() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let hub_admin = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, hub_admin.id, "admin").await?;

    AuthSession::new(session).set_user_id(hub_admin.id).await?;
    let denied = AuthGuard::new(db, session)
        .require(&[Permission::HubOwner(hub.id)])
        .await;
    assert!(denied.is_err());

    AuthSession::new(session).set_user_id(owner.id).await?;
    let granted = AuthGuard::new(db, session)
        .require(&[Permission::HubOwner(hub.id)])
        .await;
    assert!(granted.is_ok());

    Ok(())
}

/// Tests that platform admins bypass hub roles.
///
/// Expected: Ok(User) for an admin who is not a member
#[tokio::test]
async fn platform_admin_bypasses_hub_roles() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let admin = factory::user::create_admin(db).await?;
    AuthSession::new(session).set_user_id(admin.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::HubOwner(hub.id), Permission::HubMember(hub.id)])
        .await;

    assert!(result.is_ok());

    Ok(())
}

/// Tests that a missing or deleted hub yields not found rather than forbidden.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn deleted_hub_is_not_found() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let owner = factory::user::create_user(db).await?;
    let hub = factory::hub::HubFactory::new(db, owner.id)
        .deleted()
        .build()
        .await?;
    AuthSession::new(session).set_user_id(owner.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::HubManage(hub.id)])
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
