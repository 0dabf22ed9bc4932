//! Admin insights: a model-written summary of platform health, with fixed rules as the
//! fallback.

pub mod completion;

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        event::EventRepository, event_registration::EventRegistrationRepository,
        hub::HubRepository, hub_member::HubMemberRepository, join_request::JoinRequestRepository,
        programme::ProgrammeRepository, programme_member::ProgrammeMemberRepository,
    },
    error::AppError,
    model::insight::{rule_based_insights, EventFill, InsightReport, InsightSignals, InsightSource},
    service::admin::AdminService,
};

use completion::CompletionClient;

/// Pending requests older than this are reported as stale.
const STALE_REQUEST_DAYS: i64 = 7;

pub struct InsightService<'a> {
    db: &'a DatabaseConnection,
    completion: Option<&'a CompletionClient>,
}

impl<'a> InsightService<'a> {
    pub fn new(db: &'a DatabaseConnection, completion: Option<&'a CompletionClient>) -> Self {
        Self { db, completion }
    }

    /// Produces an insight report.
    ///
    /// The completion API is tried first when configured. Any failure there is logged and
    /// the fixed rules answer instead, so this only fails on database errors.
    pub async fn generate(&self, now: DateTime<Utc>) -> Result<InsightReport, AppError> {
        let signals = self.collect_signals(now).await?;

        if let Some(client) = self.completion {
            match client.generate_insights(&signals).await {
                Ok(insights) => {
                    return Ok(InsightReport {
                        source: InsightSource::Model,
                        stats: signals.stats,
                        insights,
                        generated_at: now,
                    })
                }
                Err(e) => {
                    tracing::warn!("Completion API failed, falling back to insight rules: {}", e)
                }
            }
        }

        Ok(InsightReport {
            source: InsightSource::Rules,
            insights: rule_based_insights(&signals),
            stats: signals.stats,
            generated_at: now,
        })
    }

    pub async fn collect_signals(&self, now: DateTime<Utc>) -> Result<InsightSignals, AppError> {
        let stats = AdminService::new(self.db).stats(now).await?;

        let stale_pending_requests = JoinRequestRepository::new(self.db)
            .count_pending_older_than(now - Duration::days(STALE_REQUEST_DAYS))
            .await?;

        let events: Vec<_> = EventRepository::new(self.db)
            .get_all_upcoming(now)
            .await?
            .into_iter()
            .filter(|e| e.capacity.is_some())
            .collect();
        let event_ids: Vec<i32> = events.iter().map(|e| e.id).collect();
        let registrations = EventRegistrationRepository::new(self.db)
            .counts(&event_ids)
            .await?;
        let event_fill = events
            .into_iter()
            .map(|e| EventFill {
                event_id: e.id,
                registrations: registrations.get(&e.id).copied().unwrap_or(0),
                capacity: e.capacity.unwrap_or(0).max(0) as u64,
                title: e.title,
            })
            .collect();

        let hub_ids: Vec<i32> = HubRepository::new(self.db)
            .get_all_active()
            .await?
            .into_iter()
            .map(|hub| hub.id)
            .collect();
        let hub_counts = HubMemberRepository::new(self.db).counts(&hub_ids).await?;
        let solo_owner_hubs = hub_ids
            .iter()
            .filter(|id| hub_counts.get(id).copied().unwrap_or(0) == 1)
            .count() as u64;

        let programmes = ProgrammeRepository::new(self.db).get_all_active().await?;
        let programme_ids: Vec<i32> = programmes.iter().map(|p| p.id).collect();
        let programme_counts = ProgrammeMemberRepository::new(self.db)
            .counts(&programme_ids)
            .await?;
        let full_programmes = programmes
            .into_iter()
            .filter(|p| p.is_full(programme_counts.get(&p.id).copied().unwrap_or(0)))
            .map(|p| p.name)
            .collect();

        Ok(InsightSignals {
            stats,
            stale_pending_requests,
            event_fill,
            solo_owner_hubs,
            full_programmes,
        })
    }
}
