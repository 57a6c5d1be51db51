use crate::models::{Portal, RawListing};
use crate::parsers::text::{clean_text, extract_number, extract_square_meters};
use crate::parsers::traits::EmailParser;
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parser for idealista.it alert emails.
///
/// The markup is the least stable of the three portals, so price and floor
/// area fall back to text patterns over the listing's container when no
/// styled element matches.
pub struct IdealistaParser {
    anchors: Selector,
    spans: Selector,
    link_re: Regex,
    style_re: Regex,
    price_style_re: Regex,
    price_text_re: Regex,
}

impl IdealistaParser {
    pub fn new() -> Self {
        Self {
            anchors: Selector::parse("a").unwrap(),
            spans: Selector::parse("span").unwrap(),
            link_re: Regex::new(r"^https://www\.idealista\.it/immobile/").unwrap(),
            style_re: Regex::new(r"(?i)color:\s*#2172b2").unwrap(),
            price_style_re: Regex::new(r"(?i)font-weight:\s*bold").unwrap(),
            price_text_re: Regex::new(r"([\d\., ]+)\s*€").unwrap(),
        }
    }
}

impl Default for IdealistaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailParser for IdealistaParser {
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

            let container = listing_container(&tag);
            let container_text = container
                .map(|c| c.text().collect::<Vec<_>>().join(" "))
                .unwrap_or_default();

            let mut price = None;
            if let Some(container) = container {
                for span in container.select(&self.spans) {
                    let style = span.value().attr("style").unwrap_or("");
                    // price spans carry both a bold weight and an explicit size
                    if self.price_style_re.is_match(style)
                        && style.to_lowercase().contains("font-size")
                    {
                        price = extract_number(&span.text().collect::<String>());
                        break;
                    }
                }
            }
            if price.is_none() {
                price = self
                    .price_text_re
                    .captures(&container_text)
                    .and_then(|c| extract_number(&c[1]));
            }

            let square_meters = extract_square_meters(&container_text);

            debug!(%name, ?price, ?square_meters, "idealista.it anchor parsed");
            results.push(RawListing {
                portal: Portal::Idealista,
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
        Portal::Idealista.as_str()
    }
}

/// Nearest enclosing table cell or div, falling back to the direct parent.
fn listing_container<'a>(tag: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    tag.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| matches!(e.value().name(), "td" | "div"))
        .or_else(|| tag.parent().and_then(ElementRef::wrap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const EMAIL: &str = r#"
        <table><tr><td>
            <a href="https://www.idealista.it/immobile/41223344/"
               style="color: #2172b2; text-decoration: underline">
               Appartamento via Dante, Monza</a>
            <span style="font-weight: bold; font-size: 16px">198.000 &#8364;</span>
            <div>68 m&#178; &#183; piano 2</div>
        </td></tr></table>
    "#;

    #[test]
    fn test_parses_styled_price_and_container_area() {
        let document = Html::parse_document(EMAIL);
        let listings = IdealistaParser::new().parse(&document, Utc::now());

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.link, "https://www.idealista.it/immobile/41223344/");
        assert_eq!(listing.price, Some(198_000.0));
        assert_eq!(listing.square_meters, Some(68.0));
    }

    #[test]
    fn test_falls_back_to_text_price() {
        let html = r#"<table><tr><td>
            <a href="https://www.idealista.it/immobile/5/"
               style="color:#2172B2">Monolocale centro storico</a>
            175.000 &#8364; &#183; 45 m&#178;
        </td></tr></table>"#;
        let document = Html::parse_document(html);
        let listings = IdealistaParser::new().parse(&document, Utc::now());

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, Some(175_000.0));
        assert_eq!(listings[0].square_meters, Some(45.0));
    }
}
