use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        join_request::JoinRequestDto,
        recommendation::RecommendationDto,
        user::{MembershipsDto, UpdateProfileDto, UserDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::{
            join_request::JoinRequest,
            recommendation::{Recommendation, DEFAULT_LIMIT},
        },
        service::{
            join_request::JoinRequestService, recommendation::RecommendationService,
            user::UserService,
        },
        state::AppState,
    },
};

/// Tag for grouping user endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

/// Largest number of recommendations a client may ask for.
const MAX_RECOMMENDATIONS: usize = 50;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecommendationQuery {
    /// Number of suggestions to return (default: 10, max: 50)
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Profile of the caller", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Update the caller's profile.
///
/// Omitted fields are left unchanged. A blank department clears it, and `interests`
/// replaces the whole list (normalised to lowercase, de-duplicated, at most 20).
///
/// # Returns
/// - `200 OK` - Updated profile
/// - `400 Bad Request` - Invalid name or interests
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = USER_TAG,
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = UserDto),
        (status = 400, description = "Invalid profile data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let updated = UserService::new(&state.db)
        .update_profile(user.id, payload.name, payload.department, payload.interests)
        .await?;

    Ok((StatusCode::OK, Json(updated.into_dto())))
}

/// Hubs, projects, programmes and upcoming event registrations of the caller.
#[utoipa::path(
    get,
    path = "/api/users/me/memberships",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Memberships of the caller", body = MembershipsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_memberships(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let memberships = UserService::new(&state.db).memberships(user.id).await?;

    Ok((StatusCode::OK, Json(memberships.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/users/me/join-requests",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Join requests of the caller, newest first", body = Vec<JoinRequestDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_join_requests(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let requests = JoinRequestService::new(&state.db, state.mailer.as_ref())
        .list_for_user(user.id)
        .await?;
    let dtos: Vec<JoinRequestDto> = requests.into_iter().map(JoinRequest::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Suggested hubs, events and programmes for the caller.
///
/// Scores are based on the caller's interests and department, candidate popularity and,
/// for events, how soon they start. Anything the caller already belongs to is left out.
#[utoipa::path(
    get,
    path = "/api/users/me/recommendations",
    tag = USER_TAG,
    params(RecommendationQuery),
    responses(
        (status = 200, description = "Ranked recommendations", body = Vec<RecommendationDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RecommendationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_RECOMMENDATIONS);

    let recommendations = RecommendationService::new(&state.db)
        .recommend(&user, Utc::now(), limit)
        .await?;
    let dtos: Vec<RecommendationDto> = recommendations
        .into_iter()
        .map(Recommendation::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(dtos)))
}
