use super::*;

/// Tests that deactivated users are hidden unless requested.
///
/// Expected: Ok with one user by default and two with include_deleted
#[tokio::test]
async fn hides_deactivated_users_by_default() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    factory::user::create_user(db).await?;
    factory::user::UserFactory::new(db).deleted().build().await?;

    let repo = UserRepository::new(db);

    let active = repo
        .get_paginated(&UserFilter::default(), PageParam::default())
        .await?;
    assert_eq!(active.total, 1);

    let all = repo
        .get_paginated(
            &UserFilter {
                search: None,
                include_deleted: true,
            },
            PageParam::default(),
        )
        .await?;
    assert_eq!(all.total, 2);

    Ok(())
}

/// Tests searching by name or email.
///
/// Expected: Ok with only the matching user
#[tokio::test]
async fn filters_by_search_term() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    factory::user::UserFactory::new(db)
        .name("Grace Hopper")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .name("Alan Turing")
        .build()
        .await?;

    let result = UserRepository::new(db)
        .get_paginated(
            &UserFilter {
                search: Some("Hopper".to_string()),
                include_deleted: false,
            },
            PageParam::default(),
        )
        .await?;

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].name, "Grace Hopper");

    Ok(())
}

/// Tests page arithmetic.
///
/// Expected: Ok with 2 items on page 0 and 3 total pages for 5 users
#[tokio::test]
async fn paginates_results() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    for _ in 0..5 {
        factory::user::create_user(db).await?;
    }

    let result = UserRepository::new(db)
        .get_paginated(&UserFilter::default(), PageParam::new(0, 2))
        .await?;

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.total, 5);
    assert_eq!(result.total_pages, 3);

    Ok(())
}

/// Tests a page index far past the end of the data.
///
/// Expected: an empty page with the real total, no offset overflow
#[tokio::test]
async fn huge_page_returns_empty() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db();

    factory::user::create_user(db).await?;

    let result = UserRepository::new(db)
        .get_paginated(&UserFilter::default(), PageParam::new(u64::MAX, 100))
        .await?;

    assert!(result.items.is_empty());
    assert_eq!(result.total, 1);
    assert_eq!(result.page, MAX_PAGE);

    Ok(())
}
