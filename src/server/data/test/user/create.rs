use super::*;

/// Tests creating a user account.
///
/// Verifies that a new account starts as a non-admin with an empty profile
/// and that its credentials can be looked up by email.
///
/// Expected: Ok with stored hash returned by find_credentials_by_email
#[tokio::test]
async fn creates_user_with_empty_profile() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    let repo = UserRepository::new(db);
    let user = repo
        .create(CreateUserParam {
            email: "ada@uni.example".to_string(),
            name: "Ada".to_string(),
            password_hash: "hash".to_string(),
        })
        .await?;

    assert!(!user.admin);
    assert!(user.department.is_none());
    assert!(user.interests.is_empty());
    assert!(user.is_active());

    let (found, hash) = repo
        .find_credentials_by_email("ada@uni.example")
        .await?
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(hash, "hash");

    Ok(())
}

/// Tests that email addresses are unique.
///
/// Expected: Err(DbErr) on the second insert
#[tokio::test]
async fn rejects_duplicate_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    let repo = UserRepository::new(db);
    let param = CreateUserParam {
        email: "dup@uni.example".to_string(),
        name: "First".to_string(),
        password_hash: "hash".to_string(),
    };
    repo.create(param.clone()).await?;

    let result = repo.create(param).await;

    assert!(result.is_err());

    Ok(())
}
