//! Error hierarchy for the server and its mapping onto HTTP responses.
//!
//! Services return `AppError`. Rule violations carry a client-facing message
//! (`NotFound`, `BadRequest`, `Conflict`), auth failures go through `AuthError`, and
//! everything else collapses into a logged 500 with a generic body.

pub mod auth;
pub mod config;
pub mod internal;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError, internal::InternalError},
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),
    /// 401 or 403 depending on the variant, see `AuthError`.
    #[error(transparent)]
    AuthErr(#[from] AuthError),
    #[error(transparent)]
    InternalErr(#[from] InternalError),
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Raised by the session store migration at startup.
    #[error(transparent)]
    SqlxErr(#[from] sea_orm::SqlxError),
    #[error(transparent)]
    SessionErr(#[from] tower_sessions::session::Error),
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
    /// 404. The hub, project, event or other resource is missing or soft-deleted.
    #[error("{0}")]
    NotFound(String),
    /// 400. Field validation or a rule such as "the owner cannot leave".
    #[error("{0}")]
    BadRequest(String),
    /// 409. Duplicate membership or name, an open pending request, or a full capacity.
    #[error("{0}")]
    Conflict(String),
    /// 500 with the message logged and hidden from the client.
    #[error("{0}")]
    InternalError(String),
}

/// JSON error body used by every failing response.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => error_response(StatusCode::CONFLICT, msg),
            err => {
                tracing::error!("Request failed: {}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::InternalError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::AuthErr(AuthError::UserNotInSession),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::AuthErr(AuthError::AccessDenied(1, "no".into())),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::DbErr(sea_orm::DbErr::Custom("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
