use super::*;
use chrono::Utc;

/// Tests deactivating and restoring an account.
///
/// Expected: user inactive after deactivation and active after restore
#[tokio::test]
async fn deactivates_and_restores() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    let user = factory::user::create_user(db).await?;
    let repo = UserRepository::new(db);

    assert!(repo.set_deleted_at(user.id, Some(Utc::now())).await?);
    let deactivated = repo.find_by_id(user.id).await?.unwrap();
    assert!(!deactivated.is_active());

    assert!(repo.set_deleted_at(user.id, None).await?);
    let restored = repo.find_by_id(user.id).await?.unwrap();
    assert!(restored.is_active());

    Ok(())
}

/// Tests that a missing user reports no update.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();

    let result = UserRepository::new(test.db())
        .set_deleted_at(999, Some(Utc::now()))
        .await?;

    assert!(!result);

    Ok(())
}
