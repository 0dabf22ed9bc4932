use crate::server::{
    data::setting::SettingRepository,
    model::setting::{SettingKey, SettingValue},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests that unset keys resolve to their defaults.
///
/// Expected: every key present and marked as default
#[tokio::test]
async fn returns_defaults_when_unset() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Setting)
        .build()
        .await
        .unwrap();

    let settings = SettingRepository::new(test.db()).get_all().await?;

    assert_eq!(settings.len(), SettingKey::ALL.len());
    assert!(settings.iter().all(|s| s.is_default));
    assert_eq!(settings[0].value, SettingValue::Bool(true));

    Ok(())
}

/// Tests that upserting twice overwrites the stored value.
///
/// Expected: latest value returned, no longer marked as default
#[tokio::test]
async fn upsert_overwrites_value() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .with_table(entity::prelude::Setting)
        .build()
        .await
        .unwrap();
    let db = test.db();

    let admin = factory::user::create_admin(db).await?;
    let repo = SettingRepository::new(db);

    repo.upsert(SettingKey::MaxHubsPerUser, &SettingValue::Int(2), admin.id)
        .await?;
    let setting = repo
        .upsert(SettingKey::MaxHubsPerUser, &SettingValue::Int(7), admin.id)
        .await?;

    assert_eq!(setting.value, SettingValue::Int(7));
    assert!(!setting.is_default);
    assert!(setting.updated_at.is_some());

    Ok(())
}
