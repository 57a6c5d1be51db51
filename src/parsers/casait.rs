use crate::models::{Portal, RawListing};
use crate::parsers::text::{clean_text, extract_number, extract_square_meters};
use crate::parsers::traits::EmailParser;
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parser for casa.it alert emails.
///
/// Listing anchors link straight to the portal; price sits in a
/// bold-styled span and floor area in a padded span inside the anchor's
/// parent element.
pub struct CasaItParser {
    anchors: Selector,
    spans: Selector,
    link_re: Regex,
    style_re: Regex,
    size_style_re: Regex,
    price_style_re: Regex,
}

impl CasaItParser {
    pub fn new() -> Self {
        Self {
            anchors: Selector::parse("a").unwrap(),
            spans: Selector::parse("span").unwrap(),
            link_re: Regex::new(r"^https://www\.casa\.it/immobili/").unwrap(),
            style_re: Regex::new(r"(?i)color:\s*#1a1f24").unwrap(),
            size_style_re: Regex::new(r"(?i)padding-right:\s*10px").unwrap(),
            price_style_re: Regex::new(r"(?i)font-weight:\s*bold").unwrap(),
        }
    }
}

impl Default for CasaItParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailParser for CasaItParser {
    fn parse(&self, document: &Html, received: DateTime<Utc>) -> Vec<RawListing> {
        let mut results = Vec::new();

        for tag in document.select(&self.anchors) {
            let Some(href) = tag.value().attr("href") else {
                continue;
            };
            if !self.link_re.is_match(href) {
                continue;
            }
            if !self.style_re.is_match(tag.value().attr("style").unwrap_or("")) {
                continue;
            }

            let name = clean_text(&tag.text().collect::<String>());
            if name.is_empty() {
                continue;
            }

            let Some(parent) = tag.parent().and_then(ElementRef::wrap) else {
                continue;
            };

            let mut price = None;
            let mut square_meters = None;
            for span in parent.select(&self.spans) {
                let style = span.value().attr("style").unwrap_or("");
                let span_text = span.text().collect::<String>();
                if square_meters.is_none() && self.size_style_re.is_match(style) {
                    square_meters = extract_square_meters(&span_text)
                        .or_else(|| extract_number(&span_text));
                }
                if price.is_none() && self.price_style_re.is_match(style) {
                    price = extract_number(&span_text);
                }
            }

            debug!(%name, ?price, ?square_meters, "casa.it anchor parsed");
            results.push(RawListing {
                portal: Portal::CasaIt,
                name,
                link: href.to_string(),
                price,
                square_meters,
                received_time: received,
            });
        }

        results
    }

    fn portal_name(&self) -> &'static str {
        Portal::CasaIt.as_str()
    }
}
