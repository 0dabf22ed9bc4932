use sea_orm::DatabaseConnection;

use super::service::{
    admin::code::AdminCodeService, insight::completion::CompletionClient,
    notification::email::Mailer,
};

/// Handles shared by every request.
///
/// Cloned per request by axum. The connection pool, admin code store and both HTTP
/// clients are reference counted internally, so clones share them.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// One-time code that lets the first user claim admin while no admin exists.
    pub admin_code_service: AdminCodeService,
    /// Sends notification emails. `None` leaves notifications in-app only.
    pub mailer: Option<Mailer>,
    /// LLM backend for admin insights. `None` always uses the rule-based summary.
    pub completion_client: Option<CompletionClient>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        admin_code_service: AdminCodeService,
        mailer: Option<Mailer>,
        completion_client: Option<CompletionClient>,
    ) -> Self {
        Self {
            db,
            admin_code_service,
            mailer,
            completion_client,
        }
    }
}
