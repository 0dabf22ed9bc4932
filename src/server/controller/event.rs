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
        event::{
            CreateEventDto, EventDto, EventRegistrationDto, PaginatedEventsDto, UpdateEventDto,
        },
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::event::EventRegistration,
        service::event::EventService,
        state::AppState,
    },
};

/// Tag for grouping event endpoints in OpenAPI documentation
pub static EVENT_TAG: &str = "event";

/// Schedule an event in a hub.
///
/// Hub members other than the creator are notified.
///
/// # Access Control
/// - `HubManage` - Hub owner, hub admin or platform admin
///
/// # Returns
/// - `201 Created` - The new event
/// - `400 Bad Request` - Start in the past, end before start, deadline after start,
///   or a non-positive capacity
/// - `403 Forbidden` - Caller does not manage the hub
/// - `404 Not Found` - Hub not found
#[utoipa::path(
    post,
    path = "/api/hubs/{hub_id}/events",
    tag = EVENT_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID")),
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid event data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the hub", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_event(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Json(payload): Json<CreateEventDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::HubManage(hub_id)])
        .await?;

    let event = EventService::new(&state.db, state.mailer.as_ref())
        .create(&user, hub_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(event.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/hubs/{hub_id}/events",
    tag = EVENT_TAG,
    params(("hub_id" = i32, Path, description = "Hub ID"), PageQuery),
    responses(
        (status = 200, description = "Events of the hub, soonest first", body = PaginatedEventsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Private hub", body = ErrorDto),
        (status = 404, description = "Hub not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_hub_events(
    State(state): State<AppState>,
    session: Session,
    Path(hub_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let events = EventService::new(&state.db, state.mailer.as_ref())
        .list_by_hub(hub_id, &user, query.into_param())
        .await?;

    Ok((StatusCode::OK, Json(events.into_dto())))
}

/// Upcoming events visible to the caller: those in public hubs and in hubs they belong to.
#[utoipa::path(
    get,
    path = "/api/events/upcoming",
    tag = EVENT_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Upcoming events, soonest first", body = PaginatedEventsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_upcoming_events(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let events = EventService::new(&state.db, state.mailer.as_ref())
        .list_upcoming(user.id, query.into_param())
        .await?;

    Ok((StatusCode::OK, Json(events.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    tag = EVENT_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event with registration stats", body = EventDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_event(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let event = EventService::new(&state.db, state.mailer.as_ref())
        .get(event_id, user.id)
        .await?;

    Ok((StatusCode::OK, Json(event.into_dto())))
}

/// Update an event.
///
/// # Access Control
/// - `EventManage` - Manager of the event's hub, or platform admin
///
/// # Returns
/// - `200 OK` - The updated event
/// - `400 Bad Request` - Merged times are inconsistent, or capacity is below the
///   current registrations
/// - `403 Forbidden` - Caller does not manage the event
/// - `404 Not Found` - Event not found
#[utoipa::path(
    patch,
    path = "/api/events/{event_id}",
    tag = EVENT_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = EventDto),
        (status = 400, description = "Invalid event data", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the event", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_event(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
    Json(payload): Json<UpdateEventDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EventManage(event_id)])
        .await?;

    let event = EventService::new(&state.db, state.mailer.as_ref())
        .update(event_id, user.id, payload)
        .await?;

    Ok((StatusCode::OK, Json(event.into_dto())))
}

/// Cancel an event. Registered users are notified.
#[utoipa::path(
    delete,
    path = "/api/events/{event_id}",
    tag = EVENT_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event cancelled"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the event", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_event(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EventManage(event_id)])
        .await?;

    EventService::new(&state.db, state.mailer.as_ref())
        .delete(&user, event_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Register the caller for an event.
///
/// # Returns
/// - `200 OK` - The event with updated stats
/// - `400 Bad Request` - Event already started or registration deadline passed
/// - `403 Forbidden` - Event belongs to a private hub the caller is not a member of
/// - `404 Not Found` - Event not found
/// - `409 Conflict` - Already registered or event full
#[utoipa::path(
    post,
    path = "/api/events/{event_id}/register",
    tag = EVENT_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registered", body = EventDto),
        (status = 400, description = "Registration closed", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Private hub", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 409, description = "Already registered or event full", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let event = EventService::new(&state.db, state.mailer.as_ref())
        .register(&user, event_id)
        .await?;

    Ok((StatusCode::OK, Json(event.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}/register",
    tag = EVENT_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Registration withdrawn"),
        (status = 400, description = "Event already started", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Event not found or caller not registered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unregister(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    EventService::new(&state.db, state.mailer.as_ref())
        .unregister(user.id, event_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/registrations",
    tag = EVENT_TAG,
    params(("event_id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registered users", body = Vec<EventRegistrationDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the event", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_registrations(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EventManage(event_id)])
        .await?;

    let registrations = EventService::new(&state.db, state.mailer.as_ref())
        .registrations(event_id)
        .await?;
    let dtos: Vec<EventRegistrationDto> = registrations
        .into_iter()
        .map(EventRegistration::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(dtos)))
}
