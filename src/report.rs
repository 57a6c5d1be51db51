//! The static report page and its display derivations.
//!
//! The page is rendered once per run from an embedded template; the only
//! template inputs are the score band thresholds, so the artifact stays
//! byte-stable while the thresholds live in Rust config. The embedded
//! script fetches `listings.json` relative to the page at load time and
//! builds the table client-side, in array order. The same derivations the
//! script computes exist here as plain functions for the CLI summary.

use crate::scoring::ScoreBands;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use minijinja::{context, Environment};
use std::path::Path;
use tracing::info;

const TEMPLATE: &str = include_str!("../templates/report.html");

/// Render the report page for the given score bands
pub fn render(bands: &ScoreBands) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("report", TEMPLATE)
        .context("report template failed to parse")?;
    let html = env
        .get_template("report")?
        .render(context! {
            bad_max => bands.bad_max,
            okay_max => bands.okay_max,
        })
        .context("report template failed to render")?;
    Ok(html)
}

/// Render and write the report page
pub async fn write_report(path: &Path, bands: &ScoreBands) -> Result<()> {
    let html = render(bands)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, html)
        .await
        .context(format!("failed to write {}", path.display()))?;
    info!("💾 report written to {}", path.display());
    Ok(())
}

/// Listing age in whole hours, rounded
pub fn age_hours(now: DateTime<Utc>, received: DateTime<Utc>) -> i64 {
    ((now - received).num_seconds() as f64 / 3600.0).round() as i64
}

/// Listing age as displayed, e.g. "2h"
pub fn format_age(now: DateTime<Utc>, received: DateTime<Utc>) -> String {
    format!("{}h", age_hours(now, received))
}

/// Price per square meter as displayed (whole euros)
pub fn rounded_price_per_sqm(price_per_sqm: f64) -> i64 {
    price_per_sqm.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_two_hour_old_listing_displays_2h() {
        let now = Utc::now();
        assert_eq!(format_age(now, now - Duration::hours(2)), "2h");
    }

    #[test]
    fn test_age_rounds_to_nearest_hour() {
        let now = Utc::now();
        assert_eq!(age_hours(now, now - Duration::minutes(95)), 2);
        assert_eq!(age_hours(now, now - Duration::minutes(20)), 0);
    }

    #[test]
    fn test_price_per_sqm_rounds_to_whole_euros() {
        assert_eq!(rounded_price_per_sqm(3124.49), 3124);
        assert_eq!(rounded_price_per_sqm(3124.5), 3125);
    }

    #[test]
    fn test_render_embeds_thresholds_and_relative_fetch() {
        let html = render(&ScoreBands::default()).unwrap();
        assert!(html.contains("badMax: 0.005"));
        assert!(html.contains("okayMax: 0.01"));
        assert!(html.contains("fetch('listings.json')"));
        assert!(html.contains(r#"<table id="listings-table">"#));
    }

    #[test]
    fn test_render_is_deterministic() {
        let bands = ScoreBands::default();
        assert_eq!(render(&bands).unwrap(), render(&bands).unwrap());
    }
}
