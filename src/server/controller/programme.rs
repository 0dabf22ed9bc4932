use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        join_request::{JoinDto, JoinOutcomeDto, JoinRequestDto},
        programme::{
            CreateProgrammeDto, PaginatedProgrammesDto, ProgrammeDto, ProgrammeMemberDto,
            UpdateProgrammeDto,
        },
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            join_request::{JoinRequest, JoinTarget},
            programme::ProgrammeMember,
        },
        service::{join_request::JoinRequestService, programme::ProgrammeService},
        state::AppState,
    },
};

/// Tag for grouping programme endpoints in OpenAPI documentation
pub static PROGRAMME_TAG: &str = "programme";

/// Create a programme in a hub.
///
/// # Access Control
/// - `HubManage` - Hub owner, hub admin or platform admin
///
/// # Returns
/// - `201 Created` - The new programme
/// - `400 Bad Request` - Invalid name or capacity, or `ends_at` not after `starts_at`
/// - `403 Forbidden` - Caller does not manage the hub
/// - `404 Not Found` - Hub not found
#[utoipa::path(
    post,
    path = "/api/hubs/{hub_id}/programmes",
    tag = PROGRAMME_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    request_body = CreateProgrammeDto,
    responses(
        (status = 201, description = "Programme created", body = ProgrammeDto),
        (status = 400, description = "Invalid programme data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the hub", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_programme(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Json(payload): Json<CreateProgrammeDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubManage(hub_id)])
        .await?;

    let programme = ProgrammeService::new(&state.db)
        .create(&user, hub_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(programme.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/hubs/{hub_id}/programmes",
    tag = PROGRAMME_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID"), PageQuery),
    responses(
        (status = 200, description = "Programmes of the hub", body = PaginatedProgrammesDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_hub_programmes(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let programmes = ProgrammeService::new(&state.db)
        .list(Some(hub_id), query.into_param())
        .await?;

    Ok((StatusCode::OK, Json(programmes.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/programmes",
    tag = PROGRAMME_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Programmes across all hubs", body = PaginatedProgrammesDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_programmes(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let programmes = ProgrammeService::new(&state.db)
        .list(None, query.into_param())
        .await?;

    Ok((StatusCode::OK, Json(programmes.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/programmes/{programme_id}",
    tag = PROGRAMME_TAG,
    params(("programme_id" = i32, Path, description = "Programme ID")),
    responses(
        (status = 200, description = "Programme with enrolment count", body = ProgrammeDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Programme not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_programme(
    State(state): State<AppState>,
    session: Session,
    Path(programme_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let programme = ProgrammeService::new(&state.db).get(programme_id).await?;

    Ok((StatusCode::OK, Json(programme.into_dto())))
}

/// Update a programme.
///
/// Time fields are validated against the merged result, and capacity cannot drop below
/// the current enrolment.
#[utoipa::path(
    patch,
    path = "/api/programmes/{programme_id}",
    tag = PROGRAMME_TAG,
    params(("programme_id" = i32, Path, description = "Programme ID")),
    request_body = UpdateProgrammeDto,
    responses(
        (status = 200, description = "Programme updated", body = ProgrammeDto),
        (status = 400, description = "Invalid programme data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the programme's hub", body = ErrorDto),
        (status = 404, description = "Programme not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_programme(
    State(state): State<AppState>,
    session: Session,
    Path(programme_id): Path<i32>,
    Json(payload): Json<UpdateProgrammeDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgrammeManage(programme_id)])
        .await?;

    let programme = ProgrammeService::new(&state.db)
        .update(programme_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(programme.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/programmes/{programme_id}",
    tag = PROGRAMME_TAG,
    params(("programme_id" = i32, Path, description = "Programme ID")),
    responses(
        (status = 204, description = "Programme deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the programme's hub", body = ErrorDto),
        (status = 404, description = "Programme not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_programme(
    State(state): State<AppState>,
    session: Session,
    Path(programme_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgrammeManage(programme_id)])
        .await?;

    ProgrammeService::new(&state.db)
        .delete(&user, programme_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/programmes/{programme_id}/members",
    tag = PROGRAMME_TAG,
    params(("programme_id" = i32, Path, description = "Programme ID")),
    responses(
        (status = 200, description = "Enrolled members", body = Vec<ProgrammeMemberDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Programme not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_members(
    State(state): State<AppState>,
    session: Session,
    Path(programme_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let members = ProgrammeService::new(&state.db)
        .members(programme_id)
        .await?;
    let dtos: Vec<ProgrammeMemberDto> =
        members.into_iter().map(ProgrammeMember::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

#[utoipa::path(
    post,
    path = "/api/programmes/{programme_id}/leave",
    tag = PROGRAMME_TAG,
    params(("programme_id" = i32, Path, description = "Programme ID")),
    responses(
        (status = 204, description = "Left the programme"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Programme not found or caller is not enrolled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn leave_programme(
    State(state): State<AppState>,
    session: Session,
    Path(programme_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ProgrammeService::new(&state.db)
        .leave(programme_id, user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Enrol in a programme.
///
/// Programmes without an approval step enrol the caller immediately, subject to capacity.
/// Otherwise a pending request is created for the hub's managers.
#[utoipa::path(
    post,
    path = "/api/programmes/{programme_id}/join",
    tag = PROGRAMME_TAG,
    params(("programme_id" = i32, Path, description = "Programme ID")),
    request_body = JoinDto,
    responses(
        (status = 200, description = "Join outcome", body = JoinOutcomeDto),
        (status = 400, description = "Message too long", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Programme not found", body = ErrorDto),
        (status = 409, description = "Join not possible in the current state", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn join_programme(
    State(state): State<AppState>,
    session: Session,
    Path(programme_id): Path<i32>,
    Json(payload): Json<JoinDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let outcome = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .request(&user, JoinTarget::Programme(programme_id), payload)
        .await?;

    Ok((StatusCode::OK, Json(outcome.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/programmes/{programme_id}/join-requests",
    tag = PROGRAMME_TAG,
    params(("programme_id" = i32, Path, description = "Programme ID")),
    responses(
        (status = 200, description = "Pending requests, oldest first", body = Vec<JoinRequestDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the programme's hub", body = ErrorDto),
        (status = 404, description = "Programme not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_pending_requests(
    State(state): State<AppState>,
    session: Session,
    Path(programme_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgrammeManage(programme_id)])
        .await?;

    let requests = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .list_pending(JoinTarget::Programme(programme_id))
        .await?;
    let dtos: Vec<JoinRequestDto> = requests.into_iter().map(JoinRequest::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}
