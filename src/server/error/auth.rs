use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user ID is stored in the session.
    ///
    /// The request came from a client that has not logged in, or whose session expired.
    /// Results in a 401 Unauthorized response.
    #[error("Failed to find user ID in session")]
    UserNotInSession,

    /// The session references a user that no longer exists.
    ///
    /// Results in a 401 Unauthorized response so the client logs in again.
    #[error("User {0} from session was not found in the database")]
    UserNotInDatabase(i32),

    /// Email and password did not match an active account.
    ///
    /// Deliberately indistinguishable from an unknown email. Results in a 401 Unauthorized
    /// response.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account has been deactivated by an administrator.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("User {0} is deactivated")]
    AccountDeactivated(i32),

    /// The user is authenticated but lacks a required permission.
    ///
    /// The message is logged for diagnostics but not returned to the client. Results in a
    /// 403 Forbidden response.
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),

    /// Self-service registration is turned off in settings.
    ///
    /// Results in a 403 Forbidden response.
    #[error("Registration is closed")]
    RegistrationClosed,

    /// The admin bootstrap code was wrong, expired or already used.
    ///
    /// Results in a 403 Forbidden response.
    #[error("Invalid or expired admin code")]
    InvalidAdminCode,
}

/// Converts authentication errors into HTTP responses.
///
/// Maps authentication errors to appropriate HTTP status codes and user-friendly error messages:
/// - `UserNotInSession` / `UserNotInDatabase` → 401 Unauthorized with "Not logged in"
/// - `InvalidCredentials` → 401 Unauthorized with "Invalid email or password"
/// - `AccountDeactivated` → 401 Unauthorized with "Account is deactivated"
/// - `AccessDenied` → 403 Forbidden with "Insufficient permissions"
/// - `RegistrationClosed` → 403 Forbidden with "Registration is currently closed"
/// - `InvalidAdminCode` → 403 Forbidden with "Invalid or expired admin code"
///
/// All errors are logged at debug level for diagnostics while keeping client-facing messages
/// generic to avoid information leakage.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "Not logged in")
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password"),
            Self::AccountDeactivated(_) => (StatusCode::UNAUTHORIZED, "Account is deactivated"),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "Insufficient permissions"),
            Self::RegistrationClosed => (StatusCode::FORBIDDEN, "Registration is currently closed"),
            Self::InvalidAdminCode => (StatusCode::FORBIDDEN, "Invalid or expired admin code"),
        };

        error_response(status, message)
    }
}
