use test_utils::{
    builder::TestBuilder,
    factory::{self, project::ProjectFactory},
};

use crate::{
    model::project::{CreateProjectDto, UpdateProjectDto},
    server::{
        data::project_member::ProjectMemberRepository,
        error::AppError,
        model::project::{ProjectRole, ProjectStatus},
        service::project::ProjectService,
    },
};

use super::create_user;

/// Tests creating a project makes the creator its owner.
///
/// Expected: planning status by default, one member holding the owner role
#[tokio::test]
async fn create_makes_actor_owner() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;

    let project = ProjectService::new(db, None)
        .create(
            &owner,
            hub.id,
            CreateProjectDto {
                name: "Solar Car".to_string(),
                description: String::new(),
                status: None,
                max_members: Some(8),
            },
        )
        .await?;

    assert_eq!(project.project.status, ProjectStatus::Planning);
    assert_eq!(project.member_count, 1);
    assert_eq!(
        ProjectMemberRepository::new(db)
            .find_role(project.project.id, owner.id)
            .await?,
        Some(ProjectRole::Owner)
    );

    Ok(())
}

/// Tests an unknown status is refused.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn create_rejects_unknown_status() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;

    let result = ProjectService::new(db, None)
        .create(
            &owner,
            hub.id,
            CreateProjectDto {
                name: "Solar Car".to_string(),
                description: String::new(),
                status: Some("abandoned".to_string()),
                max_members: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests the member limit cannot drop below the current member count.
///
/// Expected: Err(AppError::BadRequest) for a limit of one with two members
#[tokio::test]
async fn update_keeps_limit_above_members() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let project = ProjectFactory::new(db, hub.id, owner.id).build().await?;
    let member = factory::user::create_user(db).await?;
    factory::project::add_project_member(db, project.id, member.id, "member").await?;

    let result = ProjectService::new(db, None)
        .update(
            project.id,
            UpdateProjectDto {
                max_members: Some(1),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests the project owner cannot be removed or leave.
///
/// Expected: BadRequest for the owner, members can leave
#[tokio::test]
async fn owner_stays_in_project() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let (owner, hub) = factory::helpers::create_hub_with_owner(db).await?;
    let project = factory::project::create_project(db, hub.id, owner.id).await?;
    let member = factory::user::create_user(db).await?;
    factory::project::add_project_member(db, project.id, member.id, "member").await?;

    let service = ProjectService::new(db, None);

    assert!(matches!(
        service.remove_member(project.id, owner.id).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        service.leave(project.id, owner.id).await,
        Err(AppError::BadRequest(_))
    ));

    service.leave(project.id, member.id).await?;
    assert!(matches!(
        service.leave(project.id, member.id).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}
