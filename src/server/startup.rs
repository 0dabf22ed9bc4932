use std::time::Duration;

use sea_orm::DatabaseConnection;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::{
    config::Config, data::user::UserRepository, error::AppError,
    service::admin::code::AdminCodeService,
};

/// Days of inactivity after which a session expires.
const SESSION_INACTIVITY_DAYS: i64 = 7;
/// Timeout applied to every outbound HTTP request.
const HTTP_TIMEOUT_SECONDS: u64 = 15;

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` when set and falls back to info-level logs for the
/// application and HTTP trace layer.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unihub=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application's Sqlite pool.
///
/// Runs the session store's own migration, then configures cookies to expire after a week
/// of inactivity. The `Secure` cookie flag follows `SESSION_SECURE`.
///
/// # Returns
/// - `Ok(SessionManagerLayer)` - Layer ready to wrap the router
/// - `Err(AppError::SqlxErr)` - Failed to create the session table
pub async fn connect_to_session(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());

    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.session_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            SESSION_INACTIVITY_DAYS,
        )));

    Ok(session_layer)
}

/// Builds the HTTP client shared by the mailer and the completion client.
///
/// Redirects are disabled so configured endpoints cannot bounce requests elsewhere.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
        .build()?;

    Ok(client)
}

/// Generates and logs an admin claim code when no admin exists yet.
///
/// The code is valid for 60 seconds. A logged-in user who posts it to
/// `/api/admin/claim` is granted admin privileges.
///
/// # Returns
/// - `Ok(true)` - No admin existed and a code was generated
/// - `Ok(false)` - An admin already exists
/// - `Err(AppError::DbErr)` - Failed to query users
pub async fn check_for_admin(
    db: &DatabaseConnection,
    config: &Config,
    admin_code_service: &AdminCodeService,
) -> Result<bool, AppError> {
    let user_repo = UserRepository::new(db);

    if user_repo.admin_exists().await? {
        return Ok(false);
    }

    let code = admin_code_service.generate().await;
    let claim_url = config.app_url.join("api/admin/claim").map_err(|e| {
        AppError::InternalError(format!("Failed to build admin claim URL: {}", e))
    })?;

    tracing::info!(
        "No admin user found. Within 60 seconds, log in and POST {{\"code\": \"{}\"}} to {}",
        code,
        claim_url
    );

    Ok(true)
}
