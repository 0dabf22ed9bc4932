use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        hub::{CreateHubDto, HubDto, HubMemberDto, PaginatedHubsDto, SetMemberRoleDto, UpdateHubDto},
        join_request::{JoinDto, JoinOutcomeDto, JoinRequestDto},
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            hub::{HubFilter, HubMember},
            join_request::{JoinRequest, JoinTarget},
        },
        service::{hub::HubService, join_request::JoinRequestService},
        state::AppState,
    },
};

/// Tag for grouping hub endpoints in OpenAPI documentation
pub static HUB_TAG: &str = "hub";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HubListQuery {
    /// Case-insensitive substring of the hub name or description
    pub search: Option<String>,
    /// Exact category
    pub category: Option<String>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "super::default_per_page")]
    pub per_page: u64,
}

/// Create a new hub owned by the caller.
///
/// The caller becomes the hub's `owner` member. Non-admins may own at most the number of
/// hubs allowed by the `max_hubs_per_user` setting.
///
/// # Returns
/// - `201 Created` - The new hub
/// - `400 Bad Request` - Invalid hub data
/// - `401 Unauthorized` - Not logged in
/// - `409 Conflict` - Name already in use, or hub ownership limit reached
#[utoipa::path(
    post,
    path = "/api/hubs",
    tag = HUB_TAG,
    request_body = CreateHubDto,
    responses(
        (status = 201, description = "Hub created", body = HubDto),
        (status = 400, description = "Invalid hub data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "Name in use or ownership limit reached", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_hub(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateHubDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let hub = HubService::new(&state.db, state.mailer.as_ref())
        .create(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(hub.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/hubs",
    tag = HUB_TAG,
    params(HubListQuery),
    responses(
        (status = 200, description = "Hubs with member counts", body = PaginatedHubsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_hubs(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HubListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let filter = HubFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        category: query.category.filter(|c| !c.trim().is_empty()),
    };
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .into_param();

    let hubs = HubService::new(&state.db, state.mailer.as_ref())
        .list(user.id, filter, page)
        .await?;

    Ok((StatusCode::OK, Json(hubs.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/hubs/{hub_id}",
    tag = HUB_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    responses(
        (status = 200, description = "Hub with member count and the caller's role", body = HubDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_hub(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let hub = HubService::new(&state.db, state.mailer.as_ref())
        .get(hub_id, user.id)
        .await?;

    Ok((StatusCode::OK, Json(hub.into_dto())))
}

/// Update a hub.
///
/// # Access Control
/// - `HubManage` - Hub owner, hub admin or platform admin
///
/// # Returns
/// - `200 OK` - Updated hub
/// - `400 Bad Request` - Invalid data, or `max_members` below the member count
/// - `403 Forbidden` - Caller does not manage the hub
/// - `404 Not Found` - Hub not found
/// - `409 Conflict` - New name already in use
#[utoipa::path(
    patch,
    path = "/api/hubs/{hub_id}",
    tag = HUB_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    request_body = UpdateHubDto,
    responses(
        (status = 200, description = "Hub updated", body = HubDto),
        (status = 400, description = "Invalid hub data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the hub", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 409, description = "Name already in use", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_hub(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Json(payload): Json<UpdateHubDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubManage(hub_id)])
        .await?;

    let hub = HubService::new(&state.db, state.mailer.as_ref())
        .update(hub_id, user.id, payload)
        .await?;

    Ok((StatusCode::OK, Json(hub.into_dto())))
}

/// Soft-delete a hub. Only the owner or a platform admin may do this.
#[utoipa::path(
    delete,
    path = "/api/hubs/{hub_id}",
    tag = HUB_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    responses(
        (status = 204, description = "Hub deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not own the hub", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_hub(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubOwner(hub_id)])
        .await?;

    HubService::new(&state.db, state.mailer.as_ref())
        .delete(&user, hub_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/hubs/{hub_id}/members",
    tag = HUB_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    responses(
        (status = 200, description = "Hub members", body = Vec<HubMemberDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_members(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let members = HubService::new(&state.db, state.mailer.as_ref())
        .members(hub_id)
        .await?;
    let dtos: Vec<HubMemberDto> = members.into_iter().map(HubMember::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Remove a member from a hub.
///
/// # Access Control
/// - `HubManage` - Hub owner, hub admin or platform admin
///
/// # Returns
/// - `204 No Content` - Member removed and notified
/// - `400 Bad Request` - Target is the hub owner
/// - `404 Not Found` - Hub not found or user is not a member
#[utoipa::path(
    delete,
    path = "/api/hubs/{hub_id}/members/{user_id}",
    tag = HUB_TAG,
    params(
        ("hub_id" = i32, Path, description = "Hub ID"),
        ("user_id" = i32, Path, description = "Member user ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 400, description = "The owner cannot be removed", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the hub", body = ErrorDto),
        (status = 404, description = "Hub or member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_member(
    State(state): State<AppState>,
    session: Session,
    Path((hub_id, user_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubManage(hub_id)])
        .await?;

    HubService::new(&state.db, state.mailer.as_ref())
        .remove_member(hub_id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change a member's role to `admin` or `member`.
///
/// # Access Control
/// - `HubOwner` - Hub owner or platform admin
#[utoipa::path(
    put,
    path = "/api/hubs/{hub_id}/members/{user_id}/role",
    tag = HUB_TAG,
    params(
        ("hub_id" = i32, Path, description = "Hub ID"),
        ("user_id" = i32, Path, description = "Member user ID")
    ),
    request_body = SetMemberRoleDto,
    responses(
        (status = 200, description = "Role changed", body = MessageDto),
        (status = 400, description = "Invalid role, or target is the owner", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not own the hub", body = ErrorDto),
        (status = 404, description = "Hub or member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_member_role(
    State(state): State<AppState>,
    session: Session,
    Path((hub_id, user_id)): Path<(i32, i32)>,
    Json(payload): Json<SetMemberRoleDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubOwner(hub_id)])
        .await?;

    HubService::new(&state.db, state.mailer.as_ref())
        .set_member_role(hub_id, user_id, &payload.role)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto {
            message: format!("Role changed to {}", payload.role),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/hubs/{hub_id}/leave",
    tag = HUB_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    responses(
        (status = 204, description = "Left the hub"),
        (status = 400, description = "The owner cannot leave", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Hub not found or caller is not a member", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn leave_hub(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    HubService::new(&state.db, state.mailer.as_ref())
        .leave(hub_id, user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Join a hub.
///
/// Public hubs are joined immediately. Private hubs create a pending request and notify
/// the hub's managers.
///
/// # Returns
/// - `200 OK` - `joined`, or `pending` with the created request
/// - `404 Not Found` - Hub not found
/// - `409 Conflict` - Already a member, request already pending, too many pending
///   requests, or the hub is full
#[utoipa::path(
    post,
    path = "/api/hubs/{hub_id}/join",
    tag = HUB_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    request_body = JoinDto,
    responses(
        (status = 200, description = "Join outcome", body = JoinOutcomeDto),
        (status = 400, description = "Message too long", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 409, description = "Join not possible in the current state", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn join_hub(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Json(payload): Json<JoinDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let outcome = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .request(&user, JoinTarget::Hub(hub_id), payload)
        .await?;

    Ok((StatusCode::OK, Json(outcome.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/hubs/{hub_id}/join-requests",
    tag = HUB_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    responses(
        (status = 200, description = "Pending requests, oldest first", body = Vec<JoinRequestDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the hub", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_pending_requests(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubManage(hub_id)])
        .await?;

    let requests = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .list_pending(JoinTarget::Hub(hub_id))
        .await?;
    let dtos: Vec<JoinRequestDto> = requests.into_iter().map(JoinRequest::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}
