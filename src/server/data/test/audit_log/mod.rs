use crate::server::{
    data::audit_log::AuditLogRepository,
    error::AppError,
    model::{
        audit::{action, AuditFilter, RecordAuditParam},
        pagination::PageParam,
    },
};
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

/// Tests recording entries and filtering by action.
///
/// Expected: details round-trip as JSON and the filter narrows to one entry
#[tokio::test]
async fn records_and_filters_entries() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .with_table(entity::prelude::AuditLog)
        .build()
        .await
        .unwrap();
    let db = test.db();

    let admin = factory::user::create_admin(db).await?;
    let repo = AuditLogRepository::new(db);

    repo.create(RecordAuditParam {
        actor_id: Some(admin.id),
        action: action::HUB_DELETED,
        target_type: "hub",
        target_id: Some(4),
        details: json!({ "name": "Chess" }),
    })
    .await?;
    repo.create(RecordAuditParam {
        actor_id: Some(admin.id),
        action: action::SETTING_UPDATED,
        target_type: "setting",
        target_id: None,
        details: json!({ "key": "max_hubs_per_user", "value": 3 }),
    })
    .await?;

    let all = repo
        .get_paginated(&AuditFilter::default(), PageParam::default())
        .await?;
    assert_eq!(all.total, 2);

    let hubs = repo
        .get_paginated(
            &AuditFilter {
                action: Some(action::HUB_DELETED.to_string()),
                ..Default::default()
            },
            PageParam::default(),
        )
        .await?;
    assert_eq!(hubs.total, 1);
    assert_eq!(hubs.items[0].details["name"], "Chess");
    assert_eq!(hubs.items[0].target_id, Some(4));

    Ok(())
}
