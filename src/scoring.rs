//! # Scoring
//!
//! Stateless rating of timing deltas and aggregation of a session's
//! [`ScoreEvent`] log into a [`ScoreSummary`].
//!
//! ## Ratings
//! Windows are checked in order against the absolute delta; the first that
//! fits wins.
//!
//! | Rating  | Max abs delta (ms) | Points |
//! |---------|--------------------|--------|
//! | Perfect | 50                 | 100    |
//! | Great   | 120                | 70     |
//! | OK      | 250                | 40     |
//! | Miss    | -                  | 0      |
//!
//! ## Example
//! ```rust
//! use fretgate::scoring::{rate_hit, Rating, ScoreEvent, ScoreSummary};
//!
//! assert_eq!(rate_hit(-42.0), Rating::Perfect);
//!
//! let events = vec![
//!     ScoreEvent::from_delta(0, 40.0),
//!     ScoreEvent::from_delta(1, 90.0),
//!     ScoreEvent::from_delta(2, 400.0),
//! ];
//! let summary = ScoreSummary::from_events(&events);
//! assert_eq!(summary.total_score, 170);
//! assert_eq!(summary.longest_streak, 2);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rating {
    Perfect,
    Great,
    #[serde(rename = "OK")]
    Ok,
    Miss,
}

/// Rating windows in check order: (rating, max abs delta in ms).
const WINDOWS: [(Rating, f64); 3] = [
    (Rating::Perfect, 50.0),
    (Rating::Great, 120.0),
    (Rating::Ok, 250.0),
];

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Perfect, Rating::Great, Rating::Ok, Rating::Miss];

    pub fn points(self) -> u32 {
        match self {
            Rating::Perfect => 100,
            Rating::Great => 70,
            Rating::Ok => 40,
            Rating::Miss => 0,
        }
    }

    pub fn is_hit(self) -> bool {
        self != Rating::Miss
    }
}

/// Rate a signed timing delta in milliseconds.
pub fn rate_hit(delta_ms: f64) -> Rating {
    let abs = delta_ms.abs();
    WINDOWS
        .iter()
        .find(|(_, bound)| abs <= *bound)
        .map_or(Rating::Miss, |(rating, _)| *rating)
}

/// One resolved target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEvent {
    pub target_id: u32,
    pub rating: Rating,
    pub delta_ms: f64,
    pub points: u32,
}

impl ScoreEvent {
    /// Event for a hit `delta_ms` away from the target (negative = early).
    pub fn from_delta(target_id: u32, delta_ms: f64) -> Self {
        let rating = rate_hit(delta_ms);
        Self {
            target_id,
            rating,
            delta_ms,
            points: rating.points(),
        }
    }

    /// Event for a target that was never hit.
    pub fn miss(target_id: u32, delta_ms: f64) -> Self {
        Self {
            target_id,
            rating: Rating::Miss,
            delta_ms,
            points: 0,
        }
    }
}

/// Aggregate of a ScoreEvent log. Recomputable at any time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total_score: u32,
    /// Count per rating; every rating is present
    pub hit_distribution: BTreeMap<Rating, u32>,
    /// Mean delta over non-miss events, 0 without any
    pub average_reaction_ms: f64,
    /// Longest run of consecutive non-miss events
    pub longest_streak: u32,
}

impl ScoreSummary {
    pub fn from_events(events: &[ScoreEvent]) -> Self {
        let mut hit_distribution: BTreeMap<Rating, u32> =
            Rating::ALL.iter().map(|&r| (r, 0)).collect();
        let mut total_score = 0;
        let mut streak = 0;
        let mut longest_streak = 0;
        let mut hit_delta_sum = 0.0;
        let mut hits = 0u32;

        for event in events {
            total_score += event.points;
            *hit_distribution.entry(event.rating).or_insert(0) += 1;
            if event.rating.is_hit() {
                streak += 1;
                longest_streak = longest_streak.max(streak);
                hit_delta_sum += event.delta_ms;
                hits += 1;
            } else {
                streak = 0;
            }
        }

        let average_reaction_ms = if hits > 0 { hit_delta_sum / hits as f64 } else { 0.0 };

        Self {
            total_score,
            hit_distribution,
            average_reaction_ms,
            longest_streak,
        }
    }

    pub fn count(&self, rating: Rating) -> u32 {
        self.hit_distribution.get(&rating).copied().unwrap_or(0)
    }

    /// Score as a percentage of an all-Perfect run over the same events.
    pub fn accuracy_percent(&self) -> f64 {
        let events: u32 = self.hit_distribution.values().sum();
        if events == 0 {
            return 0.0;
        }
        self.total_score as f64 * 100.0 / (events * Rating::Perfect.points()) as f64
    }
}
