//! Platform statistics and insight models, including the fixed fallback rules.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::model::admin::{InsightDto, InsightReportDto, PlatformStatsDto};

/// Upcoming events at or above this share of capacity are reported.
const NEAR_FULL_RATIO: f64 = 0.9;
/// Maximum number of near-full event insights.
const MAX_NEAR_FULL_EVENTS: usize = 5;

/// Headline platform counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformStats {
    pub total_users: u64,
    pub new_users_last_7_days: u64,
    pub total_hubs: u64,
    pub total_projects: u64,
    pub total_programmes: u64,
    pub upcoming_events: u64,
    pub pending_join_requests: u64,
}

impl PlatformStats {
    pub fn into_dto(self) -> PlatformStatsDto {
        PlatformStatsDto {
            total_users: self.total_users,
            new_users_last_7_days: self.new_users_last_7_days,
            total_hubs: self.total_hubs,
            total_projects: self.total_projects,
            total_programmes: self.total_programmes,
            upcoming_events: self.upcoming_events,
            pending_join_requests: self.pending_join_requests,
        }
    }
}

/// Upcoming event with its fill level.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFill {
    pub event_id: i32,
    pub title: String,
    pub registrations: u64,
    pub capacity: u64,
}

/// Everything the insight rules look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightSignals {
    pub stats: PlatformStats,
    /// Pending join requests created more than 7 days ago.
    pub stale_pending_requests: u64,
    /// Upcoming events that have a capacity, ordered by start time.
    pub event_fill: Vec<EventFill>,
    /// Hubs whose only member is their owner.
    pub solo_owner_hubs: u64,
    /// Names of programmes whose enrolment has reached capacity.
    pub full_programmes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Insight {
    pub title: String,
    pub detail: String,
    pub severity: Severity,
}

impl Insight {
    fn new(severity: Severity, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            severity,
        }
    }

    pub fn into_dto(self) -> InsightDto {
        InsightDto {
            title: self.title,
            detail: self.detail,
            severity: self.severity.to_string(),
        }
    }
}

/// Who produced an insight report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSource {
    Model,
    Rules,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Rules => "rules",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightReport {
    pub source: InsightSource,
    pub stats: PlatformStats,
    pub insights: Vec<Insight>,
    pub generated_at: DateTime<Utc>,
}

impl InsightReport {
    pub fn into_dto(self) -> InsightReportDto {
        InsightReportDto {
            source: self.source.as_str().to_string(),
            stats: self.stats.into_dto(),
            insights: self.insights.into_iter().map(Insight::into_dto).collect(),
            generated_at: self.generated_at,
        }
    }
}

/// Applies the fixed insight rules to the collected signals.
///
/// Always returns at least one insight: when no rule fires, a single "All clear".
pub fn rule_based_insights(signals: &InsightSignals) -> Vec<Insight> {
    let mut insights = Vec::new();

    if signals.stats.new_users_last_7_days == 0 {
        insights.push(Insight::new(
            Severity::Warning,
            "No new users this week",
            "Nobody has registered in the last 7 days. Consider promoting the platform.",
        ));
    }

    if signals.stale_pending_requests > 0 {
        insights.push(Insight::new(
            Severity::Warning,
            "Stale join requests",
            format!(
                "{} join request(s) have been pending for more than 7 days.",
                signals.stale_pending_requests
            ),
        ));
    }

    insights.extend(
        signals
            .event_fill
            .iter()
            .filter(|e| {
                e.capacity > 0 && e.registrations as f64 / e.capacity as f64 >= NEAR_FULL_RATIO
            })
            .take(MAX_NEAR_FULL_EVENTS)
            .map(|e| {
                Insight::new(
                    Severity::Info,
                    format!("\"{}\" is nearly full", e.title),
                    format!(
                        "{} of {} places are taken.",
                        e.registrations, e.capacity
                    ),
                )
            }),
    );

    if signals.solo_owner_hubs > 0 {
        insights.push(Insight::new(
            Severity::Info,
            "Hubs without members",
            format!(
                "{} hub(s) have no members besides their owner.",
                signals.solo_owner_hubs
            ),
        ));
    }

    if !signals.full_programmes.is_empty() {
        insights.push(Insight::new(
            Severity::Info,
            "Programmes at capacity",
            format!(
                "{} programme(s) are full: {}.",
                signals.full_programmes.len(),
                signals.full_programmes.join(", ")
            ),
        ));
    }

    if insights.is_empty() {
        insights.push(Insight::new(
            Severity::Info,
            "All clear",
            "No issues detected on the platform.",
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> InsightSignals {
        InsightSignals {
            stats: PlatformStats {
                new_users_last_7_days: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn quiet_platform_is_all_clear() {
        let insights = rule_based_insights(&healthy());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "All clear");
        assert_eq!(insights[0].severity, Severity::Info);
    }

    #[test]
    fn no_signups_is_a_warning() {
        let insights = rule_based_insights(&InsightSignals::default());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert_eq!(insights[0].title, "No new users this week");
    }

    #[test]
    fn stale_requests_report_count() {
        let signals = InsightSignals {
            stale_pending_requests: 4,
            ..healthy()
        };
        let insights = rule_based_insights(&signals);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].detail.starts_with("4 join request(s)"));
    }

    #[test]
    fn near_full_events_are_capped_at_five() {
        let event_fill = (0..7)
            .map(|i| EventFill {
                event_id: i,
                title: format!("Event {}", i),
                registrations: 9,
                capacity: 10,
            })
            .chain(std::iter::once(EventFill {
                event_id: 99,
                title: "Half empty".to_string(),
                registrations: 5,
                capacity: 10,
            }))
            .collect();
        let signals = InsightSignals {
            event_fill,
            ..healthy()
        };

        let insights = rule_based_insights(&signals);
        assert_eq!(insights.len(), 5);
        assert!(insights.iter().all(|i| i.title.contains("nearly full")));
    }

    #[test]
    fn solo_hubs_and_full_programmes_are_info() {
        let signals = InsightSignals {
            solo_owner_hubs: 2,
            full_programmes: vec!["Rust 101".to_string()],
            ..healthy()
        };
        let insights = rule_based_insights(&signals);
        assert_eq!(insights.len(), 2);
        assert!(insights.iter().all(|i| i.severity == Severity::Info));
        assert!(insights[1].detail.contains("Rust 101"));
    }
}
