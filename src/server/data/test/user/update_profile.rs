use super::*;

/// Tests partial profile updates.
///
/// Fields left as `None` keep their value; `Some(None)` clears the department.
///
/// Expected: name unchanged, department cleared, interests replaced
#[tokio::test]
async fn applies_only_provided_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    let user = factory::user::UserFactory::new(db)
        .name("Lin")
        .department("Physics")
        .interests(&["optics"])
        .build()
        .await?;

    let updated = UserRepository::new(db)
        .update_profile(
            user.id,
            UpdateProfileParam {
                name: None,
                department: Some(None),
                interests: Some(vec!["robotics".to_string(), "ai".to_string()]),
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.name, "Lin");
    assert!(updated.department.is_none());
    assert_eq!(updated.interests, vec!["robotics", "ai"]);

    Ok(())
}

/// Tests updating a user that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();

    let result = UserRepository::new(test.db())
        .update_profile(42, UpdateProfileParam::default())
        .await?;

    assert!(result.is_none());

    Ok(())
}
