use super::*;

/// Tests detecting when admin users exist.
///
/// Expected: Ok(true)
#[tokio::test]
async fn returns_true_when_admin_exists() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    factory::user::create_admin(db).await?;

    let result = UserRepository::new(db).admin_exists().await?;

    assert!(result);

    Ok(())
}

/// Tests that only regular users means no admin exists.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_with_only_regular_users() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    factory::user::create_user(db).await?;
    factory::user::create_user(db).await?;

    let result = UserRepository::new(db).admin_exists().await?;

    assert!(!result);

    Ok(())
}

/// Tests that a deactivated admin does not count.
///
/// Deactivated accounts cannot sign in, so the first-admin claim flow must
/// stay available when the only admin has been deactivated.
///
/// Expected: Ok(false)
#[tokio::test]
async fn ignores_deactivated_admins() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    factory::user::UserFactory::new(db)
        .admin(true)
        .deleted()
        .build()
        .await?;

    let result = UserRepository::new(db).admin_exists().await?;

    assert!(!result);

    Ok(())
}
