use crate::server::{
    data::notification::NotificationRepository,
    error::AppError,
    model::{
        notification::{NewNotification, NotificationKind},
        pagination::PageParam,
    },
};
use test_utils::{builder::TestBuilder, factory};

fn reminder() -> NewNotification {
    NewNotification::new(NotificationKind::EventReminder, "Soon", "Starts tomorrow")
        .with_link("/events/1")
}

/// Tests fan-out to several recipients.
///
/// Expected: each recipient has one unread notification
#[tokio::test]
async fn creates_one_row_per_recipient() -> Result<(), AppError> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let a = factory::user::create_user(db).await?;
    let b = factory::user::create_user(db).await?;

    let repo = NotificationRepository::new(db);
    repo.create_many(&[a.id, b.id], &reminder()).await?;

    assert_eq!(repo.unread_count(a.id).await?, 1);
    assert_eq!(repo.unread_count(b.id).await?, 1);

    let page = repo.get_paginated(a.id, false, PageParam::default()).await?;
    assert_eq!(page.items[0].kind, NotificationKind::EventReminder);
    assert_eq!(page.items[0].link.as_deref(), Some("/events/1"));

    Ok(())
}

/// Tests that users can only mark their own notifications.
///
/// Expected: other user's attempt returns false and leaves it unread
#[tokio::test]
async fn mark_read_is_scoped_to_owner() -> Result<(), AppError> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let owner = factory::user::create_user(db).await?;
    let other = factory::user::create_user(db).await?;

    let repo = NotificationRepository::new(db);
    repo.create_many(&[owner.id], &reminder()).await?;
    let id = repo
        .get_paginated(owner.id, false, PageParam::default())
        .await?
        .items[0]
        .id;

    assert!(!repo.mark_read(id, other.id).await?);
    assert_eq!(repo.unread_count(owner.id).await?, 1);

    assert!(repo.mark_read(id, owner.id).await?);
    assert_eq!(repo.unread_count(owner.id).await?, 0);

    // Marking again is still a success.
    assert!(repo.mark_read(id, owner.id).await?);

    Ok(())
}

/// Tests marking everything read and the unread-only filter.
///
/// Expected: mark_all_read reports 3 changes, unread page becomes empty
#[tokio::test]
async fn marks_all_read() -> Result<(), AppError> {
    let test = TestBuilder::new().with_hub_tables().build().await.unwrap();
    let db = test.db();

    let user = factory::user::create_user(db).await?;
    let repo = NotificationRepository::new(db);
    for _ in 0..3 {
        repo.create_many(&[user.id], &reminder()).await?;
    }

    assert_eq!(repo.mark_all_read(user.id).await?, 3);
    assert_eq!(repo.mark_all_read(user.id).await?, 0);

    let unread = repo.get_paginated(user.id, true, PageParam::default()).await?;
    assert_eq!(unread.total, 0);

    let all = repo.get_paginated(user.id, false, PageParam::default()).await?;
    assert_eq!(all.total, 3);

    Ok(())
}
