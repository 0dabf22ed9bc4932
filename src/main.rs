mod model;
mod server;

use tokio::net::TcpListener;

use crate::server::{
    config::Config,
    error::AppError,
    router,
    scheduler::event_reminders,
    service::{
        admin::code::AdminCodeService, insight::completion::CompletionClient,
        notification::email::Mailer,
    },
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db, &config).await?;
    let http_client = startup::setup_reqwest_client()?;

    let mailer = config
        .email
        .clone()
        .map(|email| Mailer::new(http_client.clone(), email, config.app_url.clone()));
    let completion_client = config
        .completion
        .clone()
        .map(|completion| CompletionClient::new(http_client.clone(), completion));

    if mailer.is_none() {
        tracing::info!("EMAIL_API_URL not set, notifications are in-app only");
    }
    if completion_client.is_none() {
        tracing::info!("COMPLETION_API_URL not set, insights use the fixed rules");
    }

    let admin_code_service = AdminCodeService::new();

    // Check for admin users and log a claim code if none exist
    startup::check_for_admin(&db, &config, &admin_code_service).await?;

    let _scheduler = event_reminders::start_scheduler(db.clone(), mailer.clone()).await?;

    let app = router::router(&config)?
        .with_state(AppState::new(
            db,
            admin_code_service,
            mailer,
            completion_client,
        ))
        .layer(session);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
