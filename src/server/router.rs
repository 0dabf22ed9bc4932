use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    config::Config,
    controller::{
        admin::{self, ADMIN_TAG},
        auth::{self, AUTH_TAG},
        event::{self, EVENT_TAG},
        hub::{self, HUB_TAG},
        join_request::{self, JOIN_REQUEST_TAG},
        notification::{self, NOTIFICATION_TAG},
        programme::{self, PROGRAMME_TAG},
        project::{self, PROJECT_TAG},
        user::{self, USER_TAG},
    },
    error::{config::ConfigError, AppError},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "UniHub API", description = "University hub management"),
    tags(
        (name = AUTH_TAG, description = "Registration and session login"),
        (name = USER_TAG, description = "Profile, memberships and recommendations of the caller"),
        (name = HUB_TAG, description = "Hubs and hub membership"),
        (name = PROJECT_TAG, description = "Projects within hubs"),
        (name = PROGRAMME_TAG, description = "Time-bound programmes within hubs"),
        (name = EVENT_TAG, description = "Events and registrations"),
        (name = JOIN_REQUEST_TAG, description = "Reviewing join requests"),
        (name = NOTIFICATION_TAG, description = "In-app notifications"),
        (name = ADMIN_TAG, description = "Platform administration"),
    )
)]
struct ApiDoc;

/// Builds the API router with OpenAPI docs served at `/api/docs`.
///
/// Handlers sharing a path are registered together since `routes!` binds one path per call.
pub fn router(config: &Config) -> Result<Router<AppState>, AppError> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // auth
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_user))
        // user
        .routes(routes!(user::get_profile, user::update_profile))
        .routes(routes!(user::get_memberships))
        .routes(routes!(user::get_join_requests))
        .routes(routes!(user::get_recommendations))
        // hub
        .routes(routes!(hub::create_hub, hub::get_hubs))
        .routes(routes!(hub::get_hub, hub::update_hub, hub::delete_hub))
        .routes(routes!(hub::get_members))
        .routes(routes!(hub::remove_member))
        .routes(routes!(hub::set_member_role))
        .routes(routes!(hub::leave_hub))
        .routes(routes!(hub::join_hub))
        .routes(routes!(hub::get_pending_requests))
        // project
        .routes(routes!(project::create_project, project::get_hub_projects))
        .routes(routes!(
            project::get_project,
            project::update_project,
            project::delete_project
        ))
        .routes(routes!(project::get_members))
        .routes(routes!(project::remove_member))
        .routes(routes!(project::leave_project))
        .routes(routes!(project::join_project))
        .routes(routes!(project::get_pending_requests))
        // programme
        .routes(routes!(
            programme::create_programme,
            programme::get_hub_programmes
        ))
        .routes(routes!(programme::get_programmes))
        .routes(routes!(
            programme::get_programme,
            programme::update_programme,
            programme::delete_programme
        ))
        .routes(routes!(programme::get_members))
        .routes(routes!(programme::leave_programme))
        .routes(routes!(programme::join_programme))
        .routes(routes!(programme::get_pending_requests))
        // event
        .routes(routes!(event::create_event, event::get_hub_events))
        .routes(routes!(event::get_upcoming_events))
        .routes(routes!(event::get_event, event::update_event, event::delete_event))
        .routes(routes!(event::register, event::unregister))
        .routes(routes!(event::get_registrations))
        // join request
        .routes(routes!(join_request::approve))
        .routes(routes!(join_request::reject))
        .routes(routes!(join_request::cancel))
        // notification
        .routes(routes!(notification::get_notifications))
        .routes(routes!(notification::get_unread_count))
        .routes(routes!(notification::mark_read))
        .routes(routes!(notification::mark_all_read))
        // admin
        .routes(routes!(admin::get_users))
        .routes(routes!(admin::set_admin))
        .routes(routes!(admin::deactivate_user))
        .routes(routes!(admin::restore_user))
        .routes(routes!(admin::get_audit_logs))
        .routes(routes!(admin::get_settings))
        .routes(routes!(admin::update_setting))
        .routes(routes!(admin::get_stats))
        .routes(routes!(admin::get_insights))
        .routes(routes!(admin::claim_admin))
        .split_for_parts();

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: "CORS_ORIGIN".to_string(),
            reason: e.to_string(),
        })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(router
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", api))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
