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
        project::{
            CreateProjectDto, PaginatedProjectsDto, ProjectDto, ProjectMemberDto, UpdateProjectDto,
        },
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            join_request::{JoinRequest, JoinTarget},
            project::ProjectMember,
        },
        service::{join_request::JoinRequestService, project::ProjectService},
        state::AppState,
    },
};

/// Tag for grouping project endpoints in OpenAPI documentation
pub static PROJECT_TAG: &str = "project";

/// Create a project in a hub.
///
/// # Access Control
/// - `HubMember` - Any member of the hub, or a platform admin
///
/// # Returns
/// - `201 Created` - The new project with the caller as owner
/// - `400 Bad Request` - Invalid project data
/// - `403 Forbidden` - Caller is not a member of the hub
/// - `404 Not Found` - Hub not found
#[utoipa::path(
    post,
    path = "/api/hubs/{hub_id}/projects",
    tag = PROJECT_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    request_body = CreateProjectDto,
    responses(
        (status = 201, description = "Project created", body = ProjectDto),
        (status = 400, description = "Invalid project data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not a member of the hub", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_project(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Json(payload): Json<CreateProjectDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubMember(hub_id)])
        .await?;

    let project = ProjectService::new(&state.db, state.mailer.as_ref())
        .create(&user, hub_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(project.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/hubs/{hub_id}/projects",
    tag = PROJECT_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID"), PageQuery),
    responses(
        (status = 200, description = "Projects of the hub", body = PaginatedProjectsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_hub_projects(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let projects = ProjectService::new(&state.db, state.mailer.as_ref())
        .list_by_hub(hub_id, query.into_param())
        .await?;

    Ok((StatusCode::OK, Json(projects.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    tag = PROJECT_TAG,
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project with member count", body = ProjectDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let project = ProjectService::new(&state.db, state.mailer.as_ref())
        .get(project_id)
        .await?;

    Ok((StatusCode::OK, Json(project.into_dto())))
}

/// Update a project.
///
/// # Access Control
/// - `ProjectManage` - Project owner, manager of the project's hub, or platform admin
#[utoipa::path(
    patch,
    path = "/api/projects/{project_id}",
    tag = PROJECT_TAG,
    params(("project_id" = i32, Path, description = "Project ID")),
    request_body = UpdateProjectDto,
    responses(
        (status = 200, description = "Project updated", body = ProjectDto),
        (status = 400, description = "Invalid data, or max_members below the member count", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot manage the project", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i32>,
    Json(payload): Json<UpdateProjectDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProjectManage(project_id)])
        .await?;

    let project = ProjectService::new(&state.db, state.mailer.as_ref())
        .update(project_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(project.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}",
    tag = PROJECT_TAG,
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot manage the project", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProjectManage(project_id)])
        .await?;

    ProjectService::new(&state.db, state.mailer.as_ref())
        .delete(&user, project_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/projects/{project_id}/members",
    tag = PROJECT_TAG,
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project members", body = Vec<ProjectMemberDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_members(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let members = ProjectService::new(&state.db, state.mailer.as_ref())
        .members(project_id)
        .await?;
    let dtos: Vec<ProjectMemberDto> = members.into_iter().map(ProjectMember::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}/members/{user_id}",
    tag = PROJECT_TAG,
    params(
        ("project_id" = i32, Path, description = "Project ID"),
        ("user_id" = i32, Path, description = "Member user ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 400, description = "The owner cannot be removed", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot manage the project", body = ErrorDto),
        (status = 404, description = "Project or member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_member(
    State(state): State<AppState>,
    session: Session,
    Path((project_id, user_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProjectManage(project_id)])
        .await?;

    ProjectService::new(&state.db, state.mailer.as_ref())
        .remove_member(project_id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/leave",
    tag = PROJECT_TAG,
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Left the project"),
        (status = 400, description = "The owner cannot leave", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Project not found or caller is not a member", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn leave_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ProjectService::new(&state.db, state.mailer.as_ref())
        .leave(project_id, user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Ask to join a project.
///
/// Project joins always need approval from the project owner or a hub manager, and the
/// caller must already belong to the project's hub.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/join",
    tag = PROJECT_TAG,
    params(("project_id" = i32, Path, description = "Project ID")),
    request_body = JoinDto,
    responses(
        (status = 200, description = "Join outcome", body = JoinOutcomeDto),
        (status = 400, description = "Message too long", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not a member of the project's hub", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 409, description = "Join not possible in the current state", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn join_project(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i32>,
    Json(payload): Json<JoinDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let outcome = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .request(&user, JoinTarget::Project(project_id), payload)
        .await?;

    Ok((StatusCode::OK, Json(outcome.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/projects/{project_id}/join-requests",
    tag = PROJECT_TAG,
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Pending requests, oldest first", body = Vec<JoinRequestDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot manage the project", body = ErrorDto),
        (status = 404, description = "Project not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_pending_requests(
    State(state): State<AppState>,
    session: Session,
    Path(project_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProjectManage(project_id)])
        .await?;

    let requests = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .list_pending(JoinTarget::Project(project_id))
        .await?;
    let dtos: Vec<JoinRequestDto> = requests.into_iter().map(JoinRequest::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}
