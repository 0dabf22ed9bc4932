use super::*;

/// Tests hub name uniqueness checks.
///
/// A hub's own name is not a conflict when renaming it, and deleted hubs
/// free their name.
///
/// Expected: taken for other hubs, free for self and for deleted names
#[tokio::test]
async fn detects_names_in_use() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;
    let hub = factory::hub::HubFactory::new(db, owner.id)
        .name("Astronomy")
        .build()
        .await?;
    factory::hub::HubFactory::new(db, owner.id)
        .name("Archived")
        .deleted()
        .build()
        .await?;

    let repo = HubRepository::new(db);

    assert!(repo.name_taken("Astronomy", None).await?);
    assert!(!repo.name_taken("Astronomy", Some(hub.id)).await?);
    assert!(!repo.name_taken("Archived", None).await?);

    Ok(())
}
