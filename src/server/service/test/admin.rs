use chrono::Utc;
use test_utils::{
    builder::TestBuilder,
    factory::{self, join_request::JoinRequestFactory},
};
use url::Url;

use crate::server::{
    config::CompletionConfig,
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::{
        audit::{action, AuditFilter},
        insight::InsightSource,
        pagination::PageParam,
    },
    service::{
        admin::{code::AdminCodeService, AdminService},
        audit::AuditService,
        insight::{completion::CompletionClient, InsightService},
        setting::SettingService,
    },
};

use super::{create_admin, create_user};

/// Tests admins cannot revoke their own access.
///
/// Expected: Err(AppError::BadRequest) and the flag stays set
#[tokio::test]
async fn cannot_revoke_own_admin() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let admin = create_admin(db).await?;

    let result = AdminService::new(db).set_admin(&admin, admin.id, false).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(UserRepository::new(db).admin_exists().await?);

    Ok(())
}

/// Tests granting admin is audited with the old and new values.
///
/// Expected: the user becomes admin and one USER_ADMIN_CHANGED entry is recorded
#[tokio::test]
async fn set_admin_is_audited() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let admin = create_admin(db).await?;
    let user = create_user(db).await?;

    let updated = AdminService::new(db).set_admin(&admin, user.id, true).await?;
    assert!(updated.admin);

    let entries = AuditService::new(db)
        .list(
            &AuditFilter {
                action: Some(action::USER_ADMIN_CHANGED.to_string()),
                ..Default::default()
            },
            PageParam::default(),
        )
        .await?;
    assert_eq!(entries.total, 1);
    assert_eq!(entries.items[0].actor_id, Some(admin.id));
    assert_eq!(entries.items[0].target_id, Some(user.id));
    assert_eq!(entries.items[0].details["to"], true);

    Ok(())
}

/// Tests deactivating and restoring an account.
///
/// Expected: deleted_at set then cleared, self-deactivation refused
#[tokio::test]
async fn deactivate_and_restore_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let admin = create_admin(db).await?;
    let user = create_user(db).await?;
    let service = AdminService::new(db);

    assert!(matches!(
        service.deactivate_user(&admin, admin.id).await,
        Err(AppError::BadRequest(_))
    ));

    service.deactivate_user(&admin, user.id).await?;
    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert!(!stored.is_active());

    service.restore_user(&admin, user.id).await?;
    let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
    assert!(stored.is_active());

    Ok(())
}

/// Tests claiming admin with the bootstrap code.
///
/// Expected: a wrong code is refused, the real code promotes the user exactly once
#[tokio::test]
async fn claim_admin_consumes_code() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let user = create_user(db).await?;
    let codes = AdminCodeService::new();
    let code = codes.generate().await;
    let service = AdminService::new(db);

    assert!(matches!(
        service.claim_admin(&user, "not-the-code", &codes).await,
        Err(AppError::AuthErr(AuthError::InvalidAdminCode))
    ));

    let promoted = service.claim_admin(&user, &code, &codes).await?;
    assert!(promoted.admin);

    assert!(matches!(
        service.claim_admin(&user, &code, &codes).await,
        Err(AppError::AuthErr(AuthError::InvalidAdminCode))
    ));

    Ok(())
}

/// Tests setting updates are type checked.
///
/// Expected: BadRequest for a wrong type and for an unknown key
#[tokio::test]
async fn setting_update_validates_value() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let admin = create_admin(db).await?;
    let service = SettingService::new(db);

    assert!(matches!(
        service
            .update(&admin, "registration_open", &serde_json::json!(5))
            .await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        service
            .update(&admin, "theme", &serde_json::json!("dark"))
            .await,
        Err(AppError::BadRequest(_))
    ));

    let setting = service
        .update(&admin, "registration_open", &serde_json::json!(false))
        .await?;
    assert_eq!(setting.into_dto().value, serde_json::json!(false));

    Ok(())
}

/// Tests platform counters.
///
/// Expected: deactivated users are not counted, pending requests are
#[tokio::test]
async fn stats_count_active_records() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    factory::user::UserFactory::new(db).deleted().build().await?;
    let requester = factory::user::create_user(db).await?;
    factory::join_request::create_pending_request(db, "hub", hub.id, requester.id).await?;
    JoinRequestFactory::new(db, "hub", hub.id, owner.id)
        .status("rejected")
        .build()
        .await?;
    factory::event::create_event(db, hub.id, owner.id).await?;

    let stats = AdminService::new(db).stats(Utc::now()).await?;

    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_hubs, 1);
    assert_eq!(stats.upcoming_events, 1);
    assert_eq!(stats.pending_join_requests, 1);

    Ok(())
}

/// Tests insights fall back to the fixed rules when the completion API is unreachable.
///
/// Expected: a report with the rules source and the current stats
#[tokio::test]
async fn insights_fall_back_to_rules() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    factory::helpers::create_hub_with_owner(db).await?;

    let client = CompletionClient::new(
        reqwest::Client::new(),
        CompletionConfig {
            api_url: Url::parse("http://127.0.0.1:9/v1/chat/completions").unwrap(),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
        },
    );

    let report = InsightService::new(db, Some(&client))
        .generate(Utc::now())
        .await?;

    assert_eq!(report.source, InsightSource::Rules);
    assert_eq!(report.stats.total_hubs, 1);
    assert!(!report.insights.is_empty());

    Ok(())
}
