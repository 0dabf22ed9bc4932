use super::*;

/// Tests that project owners and hub managers can manage a project.
///
/// Expected: project owner and hub owner pass, project member denied
#[tokio::test]
async fn project_manage_allows_owner_and_hub_managers() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (hub_owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let project_owner = factory::user::create_user(db).await?;
    let project_member = factory::user::create_user(db).await?;
    factory::hub::add_hub_member(db, hub.id, project_owner.id, "member").await?;
    factory::hub::add_hub_member(db, hub.id, project_member.id, "member").await?;
    let project = factory::project::create_project(db, hub.id, project_owner.id).await?;
    factory::project::add_project_member(db, project.id, project_member.id, "member").await?;

    let cases = [
        (project_owner.id, true),
        (hub_owner.id, true),
        (project_member.id, false),
    ];

    for (user_id, allowed) in cases {
        AuthSession::new(session).set_user_id(user_id).await?;
        let result = AuthGuard::new(db, session)
            .require(&[Permission::ProjectManage(project.id)])
            .await;
        assert_eq!(result.is_ok(), allowed, "user {user_id}");
    }

    Ok(())
}

/// Tests that join request review follows the target's manager.
///
/// Expected: hub owner may review a hub request, requester may not
#[tokio::test]
async fn join_request_review_checks_target_manager() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let requester = factory::user::create_user(db).await?;
    let request =
        factory::join_request::create_pending_request(db, "hub", hub.id, requester.id).await?;

    AuthSession::new(session).set_user_id(requester.id).await?;
    let denied = AuthGuard::new(db, session)
        .require(&[Permission::JoinRequestReview(request.id)])
        .await;
    assert!(matches!(
        denied,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));

    AuthSession::new(session).set_user_id(owner.id).await?;
    let granted = AuthGuard::new(db, session)
        .require(&[Permission::JoinRequestReview(request.id)])
        .await;
    assert!(granted.is_ok());

    Ok(())
}

/// Tests that a missing event yields not found.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn missing_event_is_not_found() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::EventManage(77)])
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
