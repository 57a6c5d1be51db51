use crate::models::{Portal, RawListing};
use crate::parsers::text::{clean_text, extract_number, extract_square_meters};
use crate::parsers::traits::EmailParser;
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parser for immobiliare.it alert emails.
///
/// Listing anchors go through the portal's click tracker and carry the
/// portal link color inline; price and floor area live in sibling table
/// cells of the anchor's cell.
pub struct ImmobiliareParser {
    anchors: Selector,
    link_re: Regex,
    style_re: Regex,
}

impl ImmobiliareParser {
    pub fn new() -> Self {
        Self {
            anchors: Selector::parse("a").unwrap(),
            link_re: Regex::new(r"^https://clicks\.immobiliare\.it/").unwrap(),
            style_re: Regex::new(r"(?i)color:\s*#0074c1").unwrap(),
        }
    }
}

impl Default for ImmobiliareParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailParser for ImmobiliareParser {
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

            let mut price = None;
            let mut square_meters = None;
            if let Some(cell) = ancestor_cell(&tag) {
                if let Some(features) = next_sibling_cell(&cell, "realEstateBlock__features") {
                    square_meters =
                        extract_square_meters(&features.text().collect::<String>());
                }
                if let Some(price_cell) = next_sibling_cell(&cell, "realEstateBlock__price") {
                    price = extract_number(&price_cell.text().collect::<String>());
                }
            }

            debug!(%name, ?price, ?square_meters, "immobiliare.it anchor parsed");
            results.push(RawListing {
                portal: Portal::Immobiliare,
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
        Portal::Immobiliare.as_str()
    }
}

fn ancestor_cell<'a>(tag: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    tag.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "td")
}

fn next_sibling_cell<'a>(cell: &ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    cell.next_siblings().filter_map(ElementRef::wrap).find(|e| {
        e.value().name() == "td"
            && e.value()
                .attr("class")
                .map_or(false, |c| c.split_whitespace().any(|c| c == class))
    })
}
