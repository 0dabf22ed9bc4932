//! Personalised suggestions of hubs, events and programmes to join.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::collections::{HashMap, HashSet};

use crate::server::{
    data::{
        event::EventRepository, event_registration::EventRegistrationRepository,
        hub::HubRepository, hub_member::HubMemberRepository, programme::ProgrammeRepository,
        programme_member::ProgrammeMemberRepository,
    },
    error::AppError,
    model::{
        hub::Hub,
        recommendation::{rank, Candidate, Profile, Recommendation, RecommendationKind},
        user::User,
    },
};

pub struct RecommendationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RecommendationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Scores everything the user is not already part of and returns the best `limit`.
    pub async fn recommend(
        &self,
        user: &User,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Recommendation>, AppError> {
        let hub_member_repo = HubMemberRepository::new(self.db);

        let hubs: HashMap<i32, Hub> = HubRepository::new(self.db)
            .get_all_active()
            .await?
            .into_iter()
            .map(|hub| (hub.id, hub))
            .collect();
        let my_hubs: HashSet<i32> = hub_member_repo
            .hub_ids_for_user(user.id)
            .await?
            .into_iter()
            .collect();
        let hidden = |hub: &Hub| hub.is_private && !my_hubs.contains(&hub.id);

        let mut candidates = Vec::new();

        let hub_ids: Vec<i32> = hubs.keys().copied().collect();
        let hub_counts = hub_member_repo.counts(&hub_ids).await?;
        for hub in hubs.values().filter(|hub| !my_hubs.contains(&hub.id)) {
            let member_count = hub_counts.get(&hub.id).copied().unwrap_or(0);
            candidates.push(Candidate {
                kind: RecommendationKind::Hub,
                id: hub.id,
                title: hub.name.clone(),
                category: hub.category.clone(),
                member_count,
                is_full: hub.is_full(member_count),
                is_private: hub.is_private,
                starts_at: None,
            });
        }

        let registration_repo = EventRegistrationRepository::new(self.db);
        let events = EventRepository::new(self.db).get_all_upcoming(now).await?;
        let event_ids: Vec<i32> = events.iter().map(|e| e.id).collect();
        let event_counts = registration_repo.counts(&event_ids).await?;
        let registered = registration_repo
            .event_ids_for_user(user.id, &event_ids)
            .await?;
        for event in events.into_iter().filter(|e| !registered.contains(&e.id)) {
            let Some(hub) = hubs.get(&event.hub_id) else {
                continue;
            };
            let member_count = event_counts.get(&event.id).copied().unwrap_or(0);
            candidates.push(Candidate {
                kind: RecommendationKind::Event,
                id: event.id,
                is_full: event.is_full(member_count),
                title: event.title,
                category: hub.category.clone(),
                member_count,
                is_private: hidden(hub),
                starts_at: Some(event.starts_at),
            });
        }

        let programme_member_repo = ProgrammeMemberRepository::new(self.db);
        let programmes = ProgrammeRepository::new(self.db).get_all_active().await?;
        let programme_ids: Vec<i32> = programmes.iter().map(|p| p.id).collect();
        let programme_counts = programme_member_repo.counts(&programme_ids).await?;
        let enrolled: HashSet<i32> = programme_member_repo
            .programme_ids_for_user(user.id)
            .await?
            .into_iter()
            .collect();
        for programme in programmes.into_iter().filter(|p| !enrolled.contains(&p.id)) {
            let Some(hub) = hubs.get(&programme.hub_id) else {
                continue;
            };
            let member_count = programme_counts.get(&programme.id).copied().unwrap_or(0);
            candidates.push(Candidate {
                kind: RecommendationKind::Programme,
                id: programme.id,
                is_full: programme.is_full(member_count),
                title: programme.name,
                category: hub.category.clone(),
                member_count,
                is_private: hidden(hub),
                starts_at: programme.starts_at,
            });
        }

        let profile = Profile {
            interests: user.interests.clone(),
            department: user.department.clone(),
        };

        Ok(rank(&profile, candidates, now, limit))
    }
}
