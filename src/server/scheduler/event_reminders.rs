use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::AppError,
    service::{event::EventService, notification::email::Mailer},
};

/// Runs at second zero of every fifth minute.
const REMINDER_SCHEDULE: &str = "0 */5 * * * *";

/// Starts the event reminder scheduler.
///
/// Every five minutes, registrants of events starting within the reminder window get a
/// single reminder notification. Events are flagged as reminded before notifications go
/// out, so a failed run never sends the same reminder twice.
///
/// # Arguments
/// - `db`: Database connection
/// - `mailer`: Email sender used for the notification fan-out, if configured
pub async fn start_scheduler(
    db: DatabaseConnection,
    mailer: Option<Mailer>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(REMINDER_SCHEDULE, move |_uuid, _lock| {
        let db = db.clone();
        let mailer = mailer.clone();

        Box::pin(async move {
            let service = EventService::new(&db, mailer.as_ref());

            match service.send_due_reminders(Utc::now()).await {
                Ok(0) => {}
                Ok(count) => tracing::info!("Sent reminders for {} event(s)", count),
                Err(e) => tracing::error!("Error sending event reminders: {}", e),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Event reminder scheduler started");

    Ok(scheduler)
}
