//! Text helpers shared by the portal parsers. Alert emails use Italian
//! number formatting: `.` as thousands separator, `,` as decimal separator,
//! often with a `€` sign or a `Da ` prefix.

/// Strip BOM and non-breaking spaces, collapse runs of whitespace.
pub fn clean_text(text: &str) -> String {
    text.replace('\u{feff}', "")
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract a number from Italian-formatted text like `"€ 1.234.567"` or
/// `"Da 250.000 €"`. Returns `None` when no digits are present.
pub fn extract_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == ' ')
        .collect();

    // Dots and spaces group thousands, the comma is the decimal separator.
    let normalized = digits.replace(['.', ' '], "").replace(',', ".");
    let normalized = normalized.trim_end_matches('.');
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().ok()
}

/// Extract a floor area from text containing an `m²`/`mq` marker,
/// e.g. `"75 m² · 3 locali"`.
pub fn extract_square_meters(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    for marker in ["m²", "m2", "mq"] {
        let mut search_from = 0;
        while let Some(pos) = lower[search_from..].find(marker) {
            let abs = search_from + pos;
            let before = lower[..abs].trim_end();
            let digits: String = before
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !digits.is_empty() {
                let value: String = digits.chars().rev().collect();
                return value.parse().ok();
            }
            search_from = abs + marker.len();
        }
    }
    None
}
