//! Lead-score normalization to a percentage.
//!
//! Scores arrive in several shapes (see [`LeadScore`]); each shape has its
//! own normalizer and all of them share the same fallback.

use callvalue_callrail::{CallRecord, LeadScore, LeadScoreDetail};

/// Percentage assumed when a call carries no usable score. Low but nonzero,
/// so unscored calls are not all discarded.
pub const DEFAULT_SCORE_PERCENT: f64 = 30.0;

/// Percentages for the provider's five score labels (matched case-insensitively).
pub const LABEL_PERCENTS: [(&str, f64); 5] = [
    ("very_poor", 10.0),
    ("poor", 30.0),
    ("fair", 50.0),
    ("good", 70.0),
    ("very_good", 90.0),
];

/// Lead score of `call` as a percentage.
///
/// Numeric scores pass through unclamped. Missing or falsy values (absent,
/// `0`, `""`, `false`, `null`) yield [`DEFAULT_SCORE_PERCENT`].
#[must_use]
pub fn score_percent(call: &CallRecord) -> f64 {
    match &call.lead_score {
        None | Some(LeadScore::Other(_)) => DEFAULT_SCORE_PERCENT,
        Some(LeadScore::Numeric(n)) => from_number(*n),
        Some(LeadScore::Label(label)) => from_label(label),
        Some(LeadScore::Structured(detail)) => from_detail(detail),
    }
}

fn from_number(n: f64) -> f64 {
    truthy(n).unwrap_or(DEFAULT_SCORE_PERCENT)
}

fn from_label(label: &str) -> f64 {
    let label = label.trim();
    LABEL_PERCENTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map_or(DEFAULT_SCORE_PERCENT, |(_, percent)| *percent)
}

fn from_detail(detail: &LeadScoreDetail) -> f64 {
    detail
        .percentage
        .and_then(truthy)
        .or_else(|| detail.score.and_then(truthy))
        .unwrap_or(DEFAULT_SCORE_PERCENT)
}

/// Zero and NaN count as "no score".
fn truthy(n: f64) -> Option<f64> {
    (n != 0.0 && !n.is_nan()).then_some(n)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn with_score(score: Option<LeadScore>) -> CallRecord {
        CallRecord {
            lead_score: score,
            ..CallRecord::default()
        }
    }

    #[test]
    fn missing_score_defaults_to_30() {
        assert_eq!(score_percent(&with_score(None)), 30.0);
    }

    #[test]
    fn numeric_passes_through_unclamped() {
        assert_eq!(score_percent(&with_score(Some(LeadScore::Numeric(85.0)))), 85.0);
        assert_eq!(score_percent(&with_score(Some(LeadScore::Numeric(140.0)))), 140.0);
    }

    #[test]
    fn numeric_zero_is_falsy() {
        assert_eq!(score_percent(&with_score(Some(LeadScore::Numeric(0.0)))), 30.0);
    }

    #[test]
    fn labels_map_case_insensitively() {
        let label = |s: &str| score_percent(&with_score(Some(LeadScore::Label(s.into()))));
        assert_eq!(label("Good"), 70.0);
        assert_eq!(label("VERY_GOOD"), 90.0);
        assert_eq!(label("very_poor"), 10.0);
        assert_eq!(label("fair"), 50.0);
        assert_eq!(label("Poor"), 30.0);
    }

    #[test]
    fn unknown_or_empty_label_defaults() {
        let label = |s: &str| score_percent(&with_score(Some(LeadScore::Label(s.into()))));
        assert_eq!(label("excellent"), 30.0);
        assert_eq!(label(""), 30.0);
    }

    #[test]
    fn structured_prefers_percentage_then_score() {
        let detail = |percentage, score| {
            score_percent(&with_score(Some(LeadScore::Structured(LeadScoreDetail {
                percentage,
                score,
            }))))
        };
        assert_eq!(detail(Some(72.0), Some(3.0)), 72.0);
        assert_eq!(detail(None, Some(64.0)), 64.0);
        assert_eq!(detail(Some(0.0), Some(64.0)), 64.0);
        assert_eq!(detail(None, None), 30.0);
    }

    #[test]
    fn other_shapes_default() {
        assert_eq!(
            score_percent(&with_score(Some(LeadScore::Other(json!(true))))),
            30.0
        );
        assert_eq!(
            score_percent(&with_score(Some(LeadScore::Other(json!([1, 2]))))),
            30.0
        );
    }
}
