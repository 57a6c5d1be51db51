use crate::models::RawListing;
use chrono::{DateTime, Utc};
use scraper::Html;

/// Common trait for all portal email parsers.
/// This allows easy addition of new alert senders in the future.
pub trait EmailParser: Send + Sync {
    /// Extract raw listings from one email's HTML body
    fn parse(&self, document: &Html, received: DateTime<Utc>) -> Vec<RawListing>;

    /// Portal the parser handles
    fn portal_name(&self) -> &'static str;
}
