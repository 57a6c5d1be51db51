//! Within-run deduplication. Portals cross-post the same apartment with
//! slightly different titles, so exact-link matching is backed by a
//! word-ngram similarity check over normalized names.

use std::collections::HashSet;

/// Number of consecutive words two names must share to count as the same
/// listing
pub const SIMILARITY_WORD_SEQUENCE: usize = 5;

/// Lowercase, strip punctuation, split into words
pub fn normalize_name(name: &str) -> Vec<String> {
    name.to_lowercase()
        .replace('\u{feff}', "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// True when the names share at least one `min_sequence`-word run.
/// Names shorter than the sequence length never match.
pub fn are_names_similar(a: &str, b: &str, min_sequence: usize) -> bool {
    let words_a = normalize_name(a);
    let words_b = normalize_name(b);
    if words_a.len() < min_sequence || words_b.len() < min_sequence {
        return false;
    }

    let ngrams_b: HashSet<&[String]> = words_b.windows(min_sequence).collect();
    words_a.windows(min_sequence).any(|w| ngrams_b.contains(w))
}

/// Tracks listings staged during one run
pub struct Deduper {
    min_sequence: usize,
    seen_links: HashSet<String>,
    seen_names: Vec<String>,
}

impl Deduper {
    pub fn new(min_sequence: usize) -> Self {
        Self {
            min_sequence,
            seen_links: HashSet::new(),
            seen_names: Vec::new(),
        }
    }

    /// Stage a listing. Returns false when its link or a similar name was
    /// already staged this run.
    pub fn insert(&mut self, link: &str, name: &str) -> bool {
        if self.seen_links.contains(link) {
            return false;
        }
        if self
            .seen_names
            .iter()
            .any(|seen| are_names_similar(name, seen, self.min_sequence))
        {
            return false;
        }

        self.seen_links.insert(link.to_string());
        self.seen_names.push(name.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(
            normalize_name("Trilocale, Via G. Verdi 10 - Milano!"),
            vec!["trilocale", "via", "g", "verdi", "10", "milano"]
        );
    }

    #[test]
    fn test_similar_names_share_a_word_run() {
        let a = "Trilocale in vendita via Giuseppe Verdi 10, Milano";
        let b = "Appartamento trilocale in vendita via Giuseppe Verdi 10";
        assert!(are_names_similar(a, b, SIMILARITY_WORD_SEQUENCE));
    }

    #[test]
    fn test_short_names_never_match() {
        assert!(!are_names_similar("Trilocale Milano", "Trilocale Milano", SIMILARITY_WORD_SEQUENCE));
    }

    #[test]
    fn test_different_names_do_not_match() {
        let a = "Trilocale in vendita via Giuseppe Verdi 10, Milano";
        let b = "Bilocale in affitto corso Buenos Aires 42, Milano";
        assert!(!are_names_similar(a, b, SIMILARITY_WORD_SEQUENCE));
    }

    #[test]
    fn test_deduper_rejects_repeat_link_and_similar_name() {
        let mut deduper = Deduper::new(SIMILARITY_WORD_SEQUENCE);
        assert!(deduper.insert("https://a/1", "Trilocale in vendita via Giuseppe Verdi 10, Milano"));
        assert!(!deduper.insert("https://a/1", "Altro titolo completamente diverso, Milano"));
        assert!(!deduper.insert("https://b/2", "Trilocale in vendita via Giuseppe Verdi 10"));
        assert!(deduper.insert("https://c/3", "Bilocale corso Buenos Aires 42, Milano"));
    }
}
