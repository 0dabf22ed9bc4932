//! Recommendation scoring.
//!
//! Candidates are scored with a fixed-weight sum. Each weight that contributes also adds a
//! human-readable reason, so clients can explain why something was suggested.

use chrono::{DateTime, Duration, Utc};
use std::{cmp::Ordering, collections::HashSet};

use crate::model::recommendation::RecommendationDto;

pub const DEFAULT_LIMIT: usize = 10;

const INTEREST_WEIGHT: f64 = 3.0;
const DEPARTMENT_WEIGHT: f64 = 1.0;
const POPULARITY_WEIGHT: f64 = 2.0;
const SOON_WEIGHT: f64 = 1.5;
const SOON_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecommendationKind {
    Hub,
    Event,
    Programme,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hub => "hub",
            Self::Event => "event",
            Self::Programme => "programme",
        }
    }
}

/// Something that could be recommended, with the facts the scoring needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: RecommendationKind,
    pub id: i32,
    pub title: String,
    /// Category of the hub the candidate belongs to (or of the hub itself).
    pub category: String,
    /// Members, enrolments or registrations.
    pub member_count: u64,
    /// Whether the candidate's capacity has been reached.
    pub is_full: bool,
    /// Whether the candidate is a private hub, or belongs to one the user is not in.
    pub is_private: bool,
    pub starts_at: Option<DateTime<Utc>>,
}

/// The parts of a user profile the scoring looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub interests: Vec<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub id: i32,
    pub title: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub starts_at: Option<DateTime<Utc>>,
}

impl Recommendation {
    pub fn into_dto(self) -> RecommendationDto {
        RecommendationDto {
            kind: self.kind.as_str().to_string(),
            id: self.id,
            title: self.title,
            score: self.score,
            reasons: self.reasons,
            starts_at: self.starts_at,
        }
    }
}

/// Scores and ranks candidates for a profile.
///
/// Full and private candidates are dropped. Results are ordered by score descending, then
/// id ascending, and truncated to `limit`.
pub fn rank(
    profile: &Profile,
    candidates: Vec<Candidate>,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<Recommendation> {
    let eligible: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| !c.is_full && !c.is_private)
        .collect();

    let max_members = eligible.iter().map(|c| c.member_count).max().unwrap_or(0);

    let mut ranked: Vec<Recommendation> = eligible
        .into_iter()
        .map(|c| score(profile, c, max_members, now))
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
            .then(a.kind.cmp(&b.kind))
    });
    ranked.truncate(limit);

    ranked
}

fn score(
    profile: &Profile,
    candidate: Candidate,
    max_members: u64,
    now: DateTime<Utc>,
) -> Recommendation {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let category = candidate.category.to_lowercase();
    let words: HashSet<String> = words(&candidate.title)
        .chain(words(&candidate.category))
        .collect();

    for interest in &profile.interests {
        let interest = interest.to_lowercase();
        if interest == category || words.contains(&interest) {
            score += INTEREST_WEIGHT;
            reasons.push(format!("Matches your interest \"{}\"", interest));
        }
    }

    if let Some(department) = &profile.department {
        if department.trim().to_lowercase() == category {
            score += DEPARTMENT_WEIGHT;
            reasons.push("Related to your department".to_string());
        }
    }

    if max_members > 0 && candidate.member_count > 0 {
        score += POPULARITY_WEIGHT * candidate.member_count as f64 / max_members as f64;
        reasons.push(match candidate.kind {
            RecommendationKind::Event => {
                format!("{} people registered", candidate.member_count)
            }
            _ => format!("{} members", candidate.member_count),
        });
    }

    if candidate.kind == RecommendationKind::Event {
        if let Some(starts_at) = candidate.starts_at {
            if starts_at >= now && starts_at <= now + Duration::days(SOON_WINDOW_DAYS) {
                score += SOON_WEIGHT;
                reasons.push("Happening within the next week".to_string());
            }
        }
    }

    Recommendation {
        kind: candidate.kind,
        id: candidate.id,
        title: candidate.title,
        score,
        reasons,
        starts_at: candidate.starts_at,
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub(id: i32, title: &str, category: &str, members: u64) -> Candidate {
        Candidate {
            kind: RecommendationKind::Hub,
            id,
            title: title.to_string(),
            category: category.to_string(),
            member_count: members,
            is_full: false,
            is_private: false,
            starts_at: None,
        }
    }

    fn profile(interests: &[&str], department: Option<&str>) -> Profile {
        Profile {
            interests: interests.iter().map(|s| s.to_string()).collect(),
            department: department.map(str::to_string),
        }
    }

    #[test]
    fn interest_match_outweighs_popularity() {
        let now = Utc::now();
        let ranked = rank(
            &profile(&["robotics"], None),
            vec![
                hub(1, "Chess Club", "games", 50),
                hub(2, "Robotics Society", "engineering", 5),
            ],
            now,
            DEFAULT_LIMIT,
        );

        assert_eq!(ranked[0].id, 2);
        assert!((ranked[0].score - (3.0 + 2.0 * 5.0 / 50.0)).abs() < 1e-9);
        assert!(ranked[0].reasons[0].contains("robotics"));
        assert!((ranked[1].score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn department_matches_category_case_insensitively() {
        let ranked = rank(
            &profile(&[], Some("Engineering")),
            vec![hub(1, "Makers", "engineering", 0)],
            Utc::now(),
            DEFAULT_LIMIT,
        );
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[0].reasons, vec!["Related to your department"]);
    }

    #[test]
    fn full_and_private_candidates_are_excluded() {
        let mut full = hub(1, "Full", "x", 3);
        full.is_full = true;
        let mut private = hub(2, "Private", "x", 3);
        private.is_private = true;

        let ranked = rank(
            &Profile::default(),
            vec![full, private, hub(3, "Open", "x", 1)],
            Utc::now(),
            DEFAULT_LIMIT,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 3);
    }

    #[test]
    fn events_soon_get_a_bonus() {
        let now = Utc::now();
        let event = |id, days| Candidate {
            kind: RecommendationKind::Event,
            id,
            title: "Talk".to_string(),
            category: "general".to_string(),
            member_count: 0,
            is_full: false,
            is_private: false,
            starts_at: Some(now + Duration::days(days)),
        };

        let ranked = rank(
            &Profile::default(),
            vec![event(1, 30), event(2, 2)],
            now,
            DEFAULT_LIMIT,
        );
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[0].score, 1.5);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn ties_break_by_id_and_limit_applies() {
        let ranked = rank(
            &Profile::default(),
            vec![hub(5, "E", "x", 0), hub(2, "B", "x", 0), hub(9, "I", "x", 0)],
            Utc::now(),
            2,
        );
        let ids: Vec<i32> = ranked.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }
}
