//! Validation and enrichment of raw parsed listings: anything that survives
//! becomes a [`Candidate`] with a guarded price-per-square-meter and a
//! display location extracted from its name.

use crate::models::{Candidate, RawListing};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Acceptance criteria for parsed listings
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    /// Names containing any of these are rejected (auctions, rentals, ...)
    pub bad_keywords: Vec<String>,
    pub min_square_meters: f64,
    pub max_square_meters: f64,
    /// Listings priced below this per square meter are junk data
    pub min_price_per_sqm: f64,
    /// Maximum listing age at validation time
    pub max_age: Duration,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            bad_keywords: [
                "asta",
                "affitto",
                "garage",
                "box",
                "ufficio",
                "laboratorio",
                "negozio",
                "capannone",
                "stazione",
                "corsica",
                "mansarda",
                "villaggio",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            min_square_meters: 60.0,
            max_square_meters: 105.0,
            min_price_per_sqm: 1700.0,
            max_age: Duration::days(45),
        }
    }
}

/// Validate one raw listing against the criteria, computing the derived
/// fields on success. Rejections are logged at debug level with the reason.
pub fn validate(
    raw: RawListing,
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Option<Candidate> {
    let (Some(price), Some(square_meters)) = (raw.price, raw.square_meters) else {
        debug!(name = %raw.name, "rejected: missing price or floor area");
        return None;
    };

    let name_lower = raw.name.to_lowercase();
    if let Some(keyword) = criteria
        .bad_keywords
        .iter()
        .find(|k| name_lower.contains(k.as_str()))
    {
        debug!(name = %raw.name, %keyword, "rejected: bad keyword");
        return None;
    }

    if square_meters < criteria.min_square_meters || square_meters > criteria.max_square_meters {
        debug!(name = %raw.name, square_meters, "rejected: floor area out of range");
        return None;
    }

    // guards the division below as well
    if price <= 0.0 || square_meters <= 0.0 {
        debug!(name = %raw.name, price, square_meters, "rejected: non-positive price or area");
        return None;
    }

    let price_per_sqm = round2(price / square_meters);
    if price_per_sqm < criteria.min_price_per_sqm {
        debug!(name = %raw.name, price_per_sqm, "rejected: price per square meter too low");
        return None;
    }

    if now - raw.received_time > criteria.max_age {
        debug!(name = %raw.name, received = %raw.received_time, "rejected: listing too old");
        return None;
    }

    let location = extract_location(&raw.name);

    Some(Candidate {
        portal: raw.portal,
        name: raw.name,
        link: raw.link,
        price,
        square_meters,
        price_per_sqm,
        location,
        received_time: raw.received_time,
    })
}

/// Pull a display location out of a listing name: the part after the last
/// comma, or after " in " as a fallback, with a trailing province code
/// ("(MI)") and a leading postal code stripped.
pub fn extract_location(name: &str) -> String {
    let raw = if let Some((_, after)) = name.rsplit_once(',') {
        after
    } else if let Some((_, after)) = name.rsplit_once(" in ") {
        after
    } else {
        return "Unknown".to_string();
    };

    let cleaned = strip_postal_code(strip_province_code(raw.trim()));
    if cleaned.is_empty() {
        "Unknown".to_string()
    } else {
        cleaned.to_string()
    }
}

fn strip_province_code(s: &str) -> &str {
    let t = s.trim_end();
    if t.ends_with(')') {
        if let Some(open) = t.rfind('(') {
            let inner = &t[open + 1..t.len() - 1];
            if inner.len() == 2 && inner.chars().all(|c| c.is_ascii_alphabetic()) {
                return t[..open].trim_end();
            }
        }
    }
    t
}

fn strip_postal_code(s: &str) -> &str {
    let t = s.trim_start();
    let digits = t.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 5 {
        t[5..].trim_start()
    } else {
        t
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Portal;

    fn raw(name: &str, price: Option<f64>, sqm: Option<f64>) -> RawListing {
        RawListing {
            portal: Portal::Immobiliare,
            name: name.to_string(),
            link: "https://clicks.immobiliare.it/x".to_string(),
            price,
            square_meters: sqm,
            received_time: Utc::now(),
        }
    }

    #[test]
    fn test_accepts_and_enriches_valid_listing() {
        let candidate = validate(
            raw("Trilocale via Roma, 20099 Sesto San Giovanni (MI)", Some(250_000.0), Some(80.0)),
            &FilterCriteria::default(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(candidate.price_per_sqm, 3125.0);
        assert_eq!(candidate.location, "Sesto San Giovanni");
    }

    #[test]
    fn test_rejects_missing_fields() {
        let criteria = FilterCriteria::default();
        assert!(validate(raw("Trilocale, Milano", None, Some(80.0)), &criteria, Utc::now()).is_none());
        assert!(validate(raw("Trilocale, Milano", Some(250_000.0), None), &criteria, Utc::now()).is_none());
    }

    #[test]
    fn test_rejects_bad_keyword() {
        let listing = raw("Box auto in vendita, Milano", Some(250_000.0), Some(80.0));
        assert!(validate(listing, &FilterCriteria::default(), Utc::now()).is_none());
    }

    #[test]
    fn test_rejects_area_out_of_range() {
        let criteria = FilterCriteria::default();
        assert!(validate(raw("Monolocale, Milano", Some(150_000.0), Some(30.0)), &criteria, Utc::now()).is_none());
        assert!(validate(raw("Villa, Milano", Some(900_000.0), Some(200.0)), &criteria, Utc::now()).is_none());
    }

    #[test]
    fn test_zero_area_never_divides() {
        let mut criteria = FilterCriteria::default();
        criteria.min_square_meters = 0.0;
        let listing = raw("Trilocale, Milano", Some(250_000.0), Some(0.0));
        assert!(validate(listing, &criteria, Utc::now()).is_none());
    }

    #[test]
    fn test_rejects_price_per_sqm_below_floor() {
        // 80_000 / 80 = 1_000 €/m², below the 1_700 floor
        let listing = raw("Trilocale, Milano", Some(80_000.0), Some(80.0));
        assert!(validate(listing, &FilterCriteria::default(), Utc::now()).is_none());
    }

    #[test]
    fn test_rejects_stale_listing() {
        let mut listing = raw("Trilocale, Milano", Some(250_000.0), Some(80.0));
        listing.received_time = Utc::now() - Duration::days(46);
        assert!(validate(listing, &FilterCriteria::default(), Utc::now()).is_none());
    }

    #[test]
    fn test_extract_location_variants() {
        assert_eq!(extract_location("Trilocale via Roma, Milano"), "Milano");
        assert_eq!(extract_location("Quadrilocale, Monza (MB)"), "Monza");
        assert_eq!(extract_location("Bilocale in Cinisello Balsamo"), "Cinisello Balsamo");
        assert_eq!(extract_location("Appartamento via Dante 4"), "Unknown");
        assert_eq!(extract_location("Trilocale,"), "Unknown");
    }
}
