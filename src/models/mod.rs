use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Portal a listing alert came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portal {
    Immobiliare,
    CasaIt,
    Idealista,
}

impl Portal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Portal::Immobiliare => "immobiliare.it",
            Portal::CasaIt => "casa.it",
            Portal::Idealista => "idealista.it",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing as extracted from an alert email, before validation.
/// Price and floor area may be missing when the email markup lacks them.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub portal: Portal,
    pub name: String,
    pub link: String,
    pub price: Option<f64>,
    pub square_meters: Option<f64>,
    pub received_time: DateTime<Utc>,
}

/// A validated, enriched listing awaiting scoring
#[derive(Debug, Clone)]
pub struct Candidate {
    pub portal: Portal,
    pub name: String,
    pub link: String,
    pub price: f64,
    pub square_meters: f64,
    pub price_per_sqm: f64,
    pub location: String,
    pub received_time: DateTime<Utc>,
}

/// Core listing data model, as persisted in the snapshot.
/// `rank` is dense 1..=N, consistent with descending `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub rank: u32,
    pub name: String,
    pub price: f64,
    pub square_meters: f64,
    pub price_per_sqm: f64,
    pub score: f64,
    pub received_time: DateTime<Utc>,
    pub link: String,
    pub source: String,
    pub location: String,
}
