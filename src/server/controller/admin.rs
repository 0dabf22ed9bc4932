use axum::{
    extract::{Path, Query, State},
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
        admin::{
            ClaimAdminDto, InsightReportDto, PaginatedAuditLogsDto, PlatformStatsDto, SettingDto,
            UpdateSettingDto,
        },
        api::ErrorDto,
        user::{PaginatedUsersDto, SetAdminDto, UserDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            audit::AuditFilter,
            pagination::{PageParam, DEFAULT_PER_PAGE},
            setting::Setting,
            user::UserFilter,
        },
        service::{
            admin::AdminService, audit::AuditService, insight::InsightService,
            setting::SettingService,
        },
        state::AppState,
    },
};

/// Tag for grouping admin endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Case-insensitive substring of the name or email
    pub search: Option<String>,
    /// Include deactivated accounts
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    /// Exact action name, e.g. `HUB_DELETED`
    pub action: Option<String>,
    pub actor_id: Option<i32>,
    /// Exact target type, e.g. `hub`
    pub target_type: Option<String>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

/// List user accounts.
///
/// # Access Control
/// - `Admin` - Platform administrators only
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = PaginatedUsersDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let filter = UserFilter {
        search: query.search,
        include_deleted: query.include_deleted,
    };
    let users = AdminService::new(&state.db)
        .list_users(filter, PageParam::new(query.page, query.per_page))
        .await?;

    Ok((StatusCode::OK, Json(users.into_dto())))
}

/// Grant or revoke platform admin.
///
/// # Returns
/// - `200 OK` - The updated user
/// - `400 Bad Request` - Admin tried to revoke their own access
/// - `404 Not Found` - User not found
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/admin",
    tag = ADMIN_TAG,
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = SetAdminDto,
    responses(
        (status = 200, description = "Admin flag changed", body = UserDto),
        (status = 400, description = "Cannot revoke own admin", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_admin(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetAdminDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db)
        .set_admin(&actor, user_id, payload.admin)
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Deactivate an account. The user can no longer log in and existing sessions stop working.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}",
    tag = ADMIN_TAG,
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 400, description = "Cannot deactivate own account", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db)
        .deactivate_user(&actor, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/restore",
    tag = ADMIN_TAG,
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User restored"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn restore_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db)
        .restore_user(&actor, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    tag = ADMIN_TAG,
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Audit log entries, newest first", body = PaginatedAuditLogsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_audit_logs(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AuditLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let filter = AuditFilter {
        action: query.action,
        actor_id: query.actor_id,
        target_type: query.target_type,
    };
    let entries = AuditService::new(&state.db)
        .list(&filter, PageParam::new(query.page, query.per_page))
        .await?;

    Ok((StatusCode::OK, Json(entries.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Every known setting with its effective value", body = Vec<SettingDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_settings(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let settings = SettingService::new(&state.db).list().await?;
    let dtos: Vec<SettingDto> = settings.into_iter().map(Setting::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Change a platform setting.
///
/// # Returns
/// - `200 OK` - The updated setting
/// - `400 Bad Request` - Unknown key, or a value of the wrong type or out of range
#[utoipa::path(
    put,
    path = "/api/admin/settings/{key}",
    tag = ADMIN_TAG,
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingDto,
    responses(
        (status = 200, description = "Setting updated", body = SettingDto),
        (status = 400, description = "Invalid key or value", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_setting(
    State(state): State<AppState>,
    session: Session,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let setting = SettingService::new(&state.db)
        .update(&actor, &key, &payload.value)
        .await?;

    Ok((StatusCode::OK, Json(setting.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Platform counters", body = PlatformStatsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let stats = AdminService::new(&state.db).stats(Utc::now()).await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}

/// Generate platform insights.
///
/// Uses the completion API when configured, and the fixed rule set when it is not or
/// when the call fails. The response's `source` says which one produced the report.
#[utoipa::path(
    get,
    path = "/api/admin/insights",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Insight report", body = InsightReportDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_insights(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let report = InsightService::new(&state.db, state.completion_client.as_ref())
        .generate(Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(report.into_dto())))
}

/// Claim platform admin with the one-time code printed in the server log.
///
/// # Access Control
/// - Any logged in user holding a valid code
///
/// # Returns
/// - `200 OK` - The caller, now an admin
/// - `403 Forbidden` - Code wrong, expired or already used
#[utoipa::path(
    post,
    path = "/api/admin/claim",
    tag = ADMIN_TAG,
    request_body = ClaimAdminDto,
    responses(
        (status = 200, description = "Admin granted", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Invalid or expired code", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn claim_admin(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ClaimAdminDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let user = AdminService::new(&state.db)
        .claim_admin(&actor, &payload.code, &state.admin_code_service)
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}
