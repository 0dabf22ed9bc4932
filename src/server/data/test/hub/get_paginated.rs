use super::*;

/// Tests that deleted hubs are excluded from listings.
///
/// Expected: Ok with only the live hub
#[tokio::test]
async fn excludes_deleted_hubs() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;
    let live = factory::hub::HubFactory::new(db, owner.id)
        .name("Live")
        .build()
        .await?;
    factory::hub::HubFactory::new(db, owner.id)
        .name("Gone")
        .deleted()
        .build()
        .await?;

    let result = HubRepository::new(db)
        .get_paginated(&HubFilter::default(), PageParam::default())
        .await?;

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].id, live.id);

    Ok(())
}

/// Tests category and search filters together.
///
/// Expected: Ok with the hub matching both filters
#[tokio::test]
async fn filters_by_category_and_search() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;
    factory::hub::HubFactory::new(db, owner.id)
        .name("Chess Club")
        .category("games")
        .build()
        .await?;
    factory::hub::HubFactory::new(db, owner.id)
        .name("Go Club")
        .category("games")
        .build()
        .await?;
    factory::hub::HubFactory::new(db, owner.id)
        .name("Chess Theory Reading Group")
        .category("reading")
        .build()
        .await?;

    let result = HubRepository::new(db)
        .get_paginated(
            &HubFilter {
                search: Some("Chess".to_string()),
                category: Some("games".to_string()),
            },
            PageParam::default(),
        )
        .await?;

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].name, "Chess Club");

    Ok(())
}
