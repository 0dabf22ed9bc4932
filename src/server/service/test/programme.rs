use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory};

use crate::{
    model::programme::{CreateProgrammeDto, UpdateProgrammeDto},
    server::{error::AppError, service::programme::ProgrammeService},
};

use super::create_user;

fn create_dto(name: &str) -> CreateProgrammeDto {
    CreateProgrammeDto {
        name: name.to_string(),
        description: "Weekly sessions".to_string(),
        capacity: Some(20),
        requires_approval: false,
        starts_at: None,
        ends_at: None,
    }
}

/// Tests creating a programme with a valid schedule.
///
/// Expected: programme stored in the hub with no enrolments
#[tokio::test]
async fn create_stores_schedule() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let starts_at = Utc::now() + Duration::days(7);

    let created = ProgrammeService::new(db)
        .create(
            &owner,
            hub.id,
            CreateProgrammeDto {
                starts_at: Some(starts_at),
                ends_at: Some(starts_at + Duration::weeks(10)),
                ..create_dto("Rust Bootcamp")
            },
        )
        .await?;

    assert_eq!(created.programme.hub_id, hub.id);
    assert_eq!(created.programme.name, "Rust Bootcamp");
    assert_eq!(created.member_count, 0);

    Ok(())
}

/// Tests creating a programme whose end is not after its start.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn create_rejects_inverted_schedule() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let starts_at = Utc::now() + Duration::days(7);

    let result = ProgrammeService::new(db)
        .create(
            &owner,
            hub.id,
            CreateProgrammeDto {
                starts_at: Some(starts_at),
                ends_at: Some(starts_at),
                ..create_dto("Rust Bootcamp")
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests an update moving the end before the stored start.
///
/// Expected: Err(AppError::BadRequest), stored schedule unchanged
#[tokio::test]
async fn update_checks_schedule_against_stored_start() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let starts_at = Utc::now() + Duration::days(7);
    let service = ProgrammeService::new(db);
    let created = service
        .create(
            &owner,
            hub.id,
            CreateProgrammeDto {
                starts_at: Some(starts_at),
                ends_at: Some(starts_at + Duration::days(30)),
                ..create_dto("Rust Bootcamp")
            },
        )
        .await?;

    let result = service
        .update(
            created.programme.id,
            UpdateProgrammeDto {
                ends_at: Some(starts_at - Duration::days(1)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let stored = service.get(created.programme.id).await?;
    assert_eq!(
        stored.programme.ends_at.map(|t| t.timestamp()),
        Some((starts_at + Duration::days(30)).timestamp())
    );

    Ok(())
}

/// Tests lowering capacity below the number of enrolled members.
///
/// Expected: Err(AppError::BadRequest) below enrolment, Ok at exactly the enrolment
#[tokio::test]
async fn update_keeps_capacity_above_enrolment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let programme = factory::programme::create_programme(db, hub.id, owner.id).await?;
    for _ in 0..2 {
        let student = factory::user::create_user(db).await?;
        factory::programme::add_programme_member(db, programme.id, student.id).await?;
    }

    let service = ProgrammeService::new(db);

    let result = service
        .update(
            programme.id,
            UpdateProgrammeDto {
                capacity: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let updated = service
        .update(
            programme.id,
            UpdateProgrammeDto {
                capacity: Some(2),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.programme.capacity, Some(2));
    assert_eq!(updated.member_count, 2);

    Ok(())
}

/// Tests leaving a programme the user is not enrolled in.
///
/// Expected: first leave succeeds, second returns Err(AppError::NotFound)
#[tokio::test]
async fn leave_requires_enrolment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db();

    let owner = create_user(db).await?;
    let hub = factory::hub::create_hub(db, owner.id).await?;
    let programme = factory::programme::create_programme(db, hub.id, owner.id).await?;
    let student = create_user(db).await?;
    factory::programme::add_programme_member(db, programme.id, student.id).await?;

    let service = ProgrammeService::new(db);
    service.leave(programme.id, student.id).await?;

    let result = service.leave(programme.id, student.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
