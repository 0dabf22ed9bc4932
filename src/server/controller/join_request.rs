use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        join_request::{JoinRequestDto, RejectJoinRequestDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::join_request::JoinRequestService,
        state::AppState,
    },
};

/// Tag for grouping join request endpoints in OpenAPI documentation
pub static JOIN_REQUEST_TAG: &str = "join-request";

/// Approve a pending join request.
///
/// Membership is granted in the same transaction, so a target that filled up since the
/// request was made rejects the approval.
///
/// # Access Control
/// - `JoinRequestReview` - Manager of the request's target, or platform admin
///
/// # Returns
/// - `200 OK` - The approved request
/// - `400 Bad Request` - Request is no longer pending
/// - `404 Not Found` - Request or its target not found
/// - `409 Conflict` - Requester is already a member, or the target is full
#[utoipa::path(
    post,
    path = "/api/join-requests/{request_id}/approve",
    tag = JOIN_REQUEST_TAG,
    params(("request_id" = i32, Path, description = "Join request ID")),
    responses(
        (status = 200, description = "Request approved", body = JoinRequestDto),
        (status = 400, description = "Request is not pending", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot review this request", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 409, description = "Already a member or target full", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::JoinRequestReview(request_id)])
        .await?;

    let request = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .approve(&user, request_id)
        .await?;

    Ok((StatusCode::OK, Json(request.into_dto())))
}

#[utoipa::path(
    post,
    path = "/api/join-requests/{request_id}/reject",
    tag = JOIN_REQUEST_TAG,
    params(("request_id" = i32, Path, description = "Join request ID")),
    request_body = RejectJoinRequestDto,
    responses(
        (status = 200, description = "Request rejected", body = JoinRequestDto),
        (status = 400, description = "Request is not pending or reason too long", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller cannot review this request", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
    Json(payload): Json<RejectJoinRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::JoinRequestReview(request_id)])
        .await?;

    let request = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .reject(&user, request_id, payload.reason)
        .await?;

    Ok((StatusCode::OK, Json(request.into_dto())))
}

/// Withdraw one of the caller's own pending requests.
#[utoipa::path(
    post,
    path = "/api/join-requests/{request_id}/cancel",
    tag = JOIN_REQUEST_TAG,
    params(("request_id" = i32, Path, description = "Join request ID")),
    responses(
        (status = 200, description = "Request cancelled", body = JoinRequestDto),
        (status = 400, description = "Request is not pending", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Request belongs to another user", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let request = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .cancel(user.id, request_id)
        .await?;

    Ok((StatusCode::OK, Json(request.into_dto())))
}
