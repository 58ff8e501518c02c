//! Product detection from call free text.

use std::sync::LazyLock;

use callvalue_callrail::CallRecord;
use callvalue_core::{ProductCatalog, DEFAULT_PRODUCT_KEY};
use regex::Regex;

/// Horsepower mentions, tried in order. Each captures the rating.
static HP_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*hp\b").expect("valid hp regex"),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*horse\s+power\b").expect("valid horse power regex"),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*horsepower\b").expect("valid horsepower regex"),
    ]
});

/// Lowercased transcript, note, and tag names joined into one blob.
#[must_use]
pub fn search_text(call: &CallRecord) -> String {
    let tags = call
        .tags
        .iter()
        .filter_map(|t| t.name())
        .collect::<Vec<_>>()
        .join(" ");

    [
        call.transcription.as_deref().unwrap_or_default(),
        call.note.as_deref().unwrap_or_default(),
        tags.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Catalog key of the product a call refers to, or [`DEFAULT_PRODUCT_KEY`].
///
/// Patterns are tried in order; within a pattern, matches are scanned left
/// to right. The first captured rating that is a catalog key wins. Ratings
/// missing from the catalog are skipped.
#[must_use]
pub fn detect_product(call: &CallRecord, catalog: &ProductCatalog) -> String {
    let text = search_text(call);

    HP_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(&text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|rating| catalog.contains(rating))
        .map_or_else(|| DEFAULT_PRODUCT_KEY.to_owned(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use callvalue_callrail::CallTag;
    use rust_decimal::Decimal;

    use super::*;

    fn catalog() -> ProductCatalog {
        let mut products = BTreeMap::new();
        products.insert("9.9".to_owned(), Decimal::new(1895, 0));
        products.insert("10".to_owned(), Decimal::new(1995, 0));
        products.insert("25".to_owned(), Decimal::new(3495, 0));
        ProductCatalog {
            default: Decimal::new(1495, 0),
            products,
        }
    }

    fn with_text(transcription: Option<&str>, note: Option<&str>, tags: Vec<CallTag>) -> CallRecord {
        CallRecord {
            transcription: transcription.map(str::to_owned),
            note: note.map(str::to_owned),
            tags,
            ..CallRecord::default()
        }
    }

    #[test]
    fn detects_compact_hp_in_transcript() {
        let call = with_text(Some("this customer wants the 25hp model"), None, vec![]);
        assert_eq!(detect_product(&call, &catalog()), "25");
    }

    #[test]
    fn detects_spaced_and_uppercase_forms() {
        let call = with_text(None, Some("Asked about the 10 HP tiller"), vec![]);
        assert_eq!(detect_product(&call, &catalog()), "10");
    }

    #[test]
    fn detects_horse_power_variants() {
        let two_words = with_text(Some("looking at 25 horse power"), None, vec![]);
        let one_word = with_text(Some("a 10 Horsepower engine"), None, vec![]);
        assert_eq!(detect_product(&two_words, &catalog()), "25");
        assert_eq!(detect_product(&one_word, &catalog()), "10");
    }

    #[test]
    fn detects_decimal_ratings() {
        let call = with_text(Some("the 9.9 hp kicker"), None, vec![]);
        assert_eq!(detect_product(&call, &catalog()), "9.9");
    }

    #[test]
    fn skips_ratings_missing_from_catalog() {
        let call = with_text(Some("not the 40hp, maybe the 10hp"), None, vec![]);
        assert_eq!(detect_product(&call, &catalog()), "10");
    }

    #[test]
    fn earlier_pattern_wins_over_earlier_text() {
        // "25 horsepower" appears first in the text, but the `hp` pattern is tried first.
        let call = with_text(Some("25 horsepower or 10hp"), None, vec![]);
        assert_eq!(detect_product(&call, &catalog()), "10");
    }

    #[test]
    fn reads_plain_and_structured_tags() {
        let plain = with_text(None, None, vec![CallTag::Name("25HP".into())]);
        let structured = with_text(
            None,
            None,
            vec![CallTag::Structured {
                name: Some("10 hp quote".into()),
            }],
        );
        assert_eq!(detect_product(&plain, &catalog()), "25");
        assert_eq!(detect_product(&structured, &catalog()), "10");
    }

    #[test]
    fn no_signal_is_default() {
        let call = with_text(Some("what are your hours?"), None, vec![]);
        assert_eq!(detect_product(&call, &catalog()), DEFAULT_PRODUCT_KEY);
        assert_eq!(detect_product(&CallRecord::default(), &catalog()), DEFAULT_PRODUCT_KEY);
    }

    #[test]
    fn hp_requires_word_boundary() {
        let call = with_text(Some("call 10 hpx support"), None, vec![]);
        assert_eq!(detect_product(&call, &catalog()), DEFAULT_PRODUCT_KEY);
    }
}
