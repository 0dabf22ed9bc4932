use crate::server::{
    data::join_request::JoinRequestRepository,
    error::AppError,
    model::join_request::{JoinRequestStatus, JoinTarget},
};
use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory};

/// Tests creating a request and finding it as pending.
///
/// Expected: the created request is returned by find_pending and counted for the user
#[tokio::test]
async fn creates_pending_request() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let user = factory::user::create_user(db).await?;
    let target = JoinTarget::Hub(hub.id);

    let repo = JoinRequestRepository::new(db);
    let request = repo
        .create(target, user.id, Some("Please let me in".to_string()))
        .await?;

    assert!(request.is_pending());
    assert_eq!(request.target, target);

    let found = repo.find_pending(user.id, target).await?.unwrap();
    assert_eq!(found.id, request.id);
    assert_eq!(repo.count_pending_for_user(user.id).await?, 1);

    Ok(())
}

/// Tests resolving a request only succeeds while it is pending.
///
/// Expected: approve succeeds once, a second resolution is refused
#[tokio::test]
async fn resolves_only_pending_requests() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let user = factory::user::create_user(db).await?;
    let row = factory::join_request::create_pending_request(db, "hub", hub.id, user.id).await?;

    let repo = JoinRequestRepository::new(db);
    let now = Utc::now();

    assert!(
        repo.resolve(row.id, JoinRequestStatus::Approved, Some(owner.id), None, now)
            .await?
    );
    assert!(
        !repo
            .resolve(
                row.id,
                JoinRequestStatus::Rejected,
                Some(owner.id),
                Some("late".to_string()),
                now
            )
            .await?
    );

    let request = repo.find_by_id(row.id).await?.unwrap();
    assert_eq!(request.status, JoinRequestStatus::Approved);
    assert_eq!(request.reviewed_by, Some(owner.id));
    assert!(request.reviewed_at.is_some());

    Ok(())
}

/// Tests counting stale pending requests.
///
/// Expected: only the request older than the cutoff is counted
#[tokio::test]
async fn counts_stale_pending_requests() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let old_user = factory::user::create_user(db).await?;
    let new_user = factory::user::create_user(db).await?;
    let now = Utc::now();

    factory::join_request::JoinRequestFactory::new(db, "hub", hub.id, old_user.id)
        .created_at(now - Duration::days(10))
        .build()
        .await?;
    factory::join_request::create_pending_request(db, "hub", hub.id, new_user.id).await?;

    let repo = JoinRequestRepository::new(db);

    assert_eq!(repo.count_pending().await?, 2);
    assert_eq!(
        repo.count_pending_older_than(now - Duration::days(7)).await?,
        1
    );

    Ok(())
}

/// Tests that pending requests for a target come back oldest first.
///
/// Expected: two pending requests, the older first, resolved requests excluded
#[tokio::test]
async fn lists_pending_for_target() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (_, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let first = factory::user::create_user(db).await?;
    let second = factory::user::create_user(db).await?;
    let third = factory::user::create_user(db).await?;
    let now = Utc::now();

    factory::join_request::JoinRequestFactory::new(db, "hub", hub.id, second.id)
        .created_at(now - Duration::hours(1))
        .build()
        .await?;
    factory::join_request::JoinRequestFactory::new(db, "hub", hub.id, first.id)
        .created_at(now - Duration::hours(2))
        .build()
        .await?;
    factory::join_request::JoinRequestFactory::new(db, "hub", hub.id, third.id)
        .status("rejected")
        .build()
        .await?;

    let pending = JoinRequestRepository::new(db)
        .get_pending_for_target(JoinTarget::Hub(hub.id))
        .await?;

    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].user_id, first.id);
    assert_eq!(pending[1].user_id, second.id);

    Ok(())
}
