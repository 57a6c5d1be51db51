//! Scoring, ranking, and score classification.
//!
//! The score is a weighted blend of price attractiveness (cheaper per
//! square meter is better) and recency, each min-max normalized over the
//! run's candidates. The formula is intentionally data-driven: swap the
//! weights and the ranking contract (dense `rank` consistent with
//! descending `score`) still holds.

use crate::models::{Candidate, Listing};
use std::cmp::Ordering;
use std::fmt;

/// Relative weight of price vs. recency in the score
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub price: f64,
    pub recency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            price: 0.6,
            recency: 0.4,
        }
    }
}

/// Score every candidate, order by descending score (ties broken by link,
/// so reruns over the same input produce the same ordering), and assign
/// dense ranks starting at 1.
pub fn score_and_rank(candidates: Vec<Candidate>, weights: &ScoreWeights) -> Vec<Listing> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let prices: Vec<f64> = candidates.iter().map(|c| c.price_per_sqm).collect();
    let times: Vec<f64> = candidates
        .iter()
        .map(|c| c.received_time.timestamp() as f64)
        .collect();
    let (min_price, price_range) = min_and_range(&prices);
    let (min_time, time_range) = min_and_range(&times);

    let mut listings: Vec<Listing> = candidates
        .into_iter()
        .map(|c| {
            let norm_price = (c.price_per_sqm - min_price) / price_range;
            let norm_time = (c.received_time.timestamp() as f64 - min_time) / time_range;
            let score = round4(weights.price * (1.0 - norm_price) + weights.recency * norm_time);
            Listing {
                rank: 0,
                name: c.name,
                price: c.price,
                square_meters: c.square_meters,
                price_per_sqm: c.price_per_sqm,
                score,
                received_time: c.received_time,
                link: c.link,
                source: c.portal.as_str().to_string(),
                location: c.location,
            }
        })
        .collect();

    listings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.link.cmp(&b.link))
    });
    for (i, listing) in listings.iter_mut().enumerate() {
        listing.rank = (i + 1) as u32;
    }

    listings
}

/// Min and range of a non-empty slice; a degenerate range becomes 1.0 so a
/// uniform field contributes 0 to every score instead of dividing by zero.
fn min_and_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };
    (min, range)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Three-tier score classification thresholds
#[derive(Debug, Clone)]
pub struct ScoreBands {
    /// Scores at or below this are Bad
    pub bad_max: f64,
    /// Scores above `bad_max` and at or below this are Okay
    pub okay_max: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            bad_max: 0.005,
            okay_max: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Bad,
    Okay,
    Good,
}

impl ScoreTier {
    /// CSS class used by the report page
    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreTier::Bad => "bad",
            ScoreTier::Okay => "okay",
            ScoreTier::Good => "good",
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.css_class())
    }
}

impl ScoreBands {
    pub fn classify(&self, score: f64) -> ScoreTier {
        if score <= self.bad_max {
            ScoreTier::Bad
        } else if score <= self.okay_max {
            ScoreTier::Okay
        } else {
            ScoreTier::Good
        }
    }
}
