//! Caller grouping and group valuation.
//!
//! Repeat callers are valued once: the best score and the chosen product of
//! the whole group set the value, which is then split evenly over the group's
//! calls. This keeps a caller who rings five times from being worth five
//! conversions.

use std::collections::{HashMap, HashSet};

use callvalue_callrail::CallRecord;
use callvalue_core::{classify, round2, ProductCatalog, Tier, ValuationConfig, DEFAULT_PRODUCT_KEY};
use rust_decimal::Decimal;

use crate::phone::{normalize_phone, UNKNOWN_CALLER};
use crate::product::detect_product;
use crate::score::{score_percent, DEFAULT_SCORE_PERCENT};

/// Calls attributed to one caller, in input order. Each call is paired with
/// its click identifier.
#[derive(Debug, Clone)]
pub struct CallerGroup {
    /// Normalized phone, or [`UNKNOWN_CALLER`].
    pub key: String,
    pub calls: Vec<(CallRecord, String)>,
}

impl CallerGroup {
    fn new(key: String) -> Self {
        Self {
            key,
            calls: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Partition `(call, gclid)` pairs into caller groups.
///
/// Groups appear in order of their first call. With `aggregate_by_caller`
/// off every call is its own group. With `merge_phoneless_callers` off each
/// call lacking a phone number is its own group; with it on they all share
/// the [`UNKNOWN_CALLER`] group.
#[must_use]
pub fn group_calls(pairs: Vec<(CallRecord, String)>, config: &ValuationConfig) -> Vec<CallerGroup> {
    let mut groups: Vec<CallerGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (call, gclid) in pairs {
        let key = normalize_phone(call.customer_phone_number.as_deref());
        let shared = config.aggregate_by_caller
            && (key != UNKNOWN_CALLER || config.merge_phoneless_callers);

        let slot = if shared {
            *index.entry(key.clone()).or_insert_with(|| {
                groups.push(CallerGroup::new(key));
                groups.len() - 1
            })
        } else {
            groups.push(CallerGroup::new(key));
            groups.len() - 1
        };

        groups[slot].calls.push((call, gclid));
    }

    groups
}

/// Number of distinct callers among `calls`. Phoneless calls count as one
/// caller when `merge_phoneless` is set, otherwise one each.
#[must_use]
pub fn count_callers<'a>(calls: impl IntoIterator<Item = &'a CallRecord>, merge_phoneless: bool) -> usize {
    let mut seen = HashSet::new();
    let mut phoneless = 0usize;

    for call in calls {
        let key = normalize_phone(call.customer_phone_number.as_deref());
        if key == UNKNOWN_CALLER && !merge_phoneless {
            phoneless += 1;
        } else {
            seen.insert(key);
        }
    }

    seen.len() + phoneless
}

/// Value assigned to a caller group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupValuation {
    pub best_score: f64,
    pub tier: Tier,
    pub product: String,
    pub product_price: Decimal,
    /// `round2(product_price * tier multiplier)`.
    pub total_value: Decimal,
    /// `round2(total_value / group size)`; zero when the group is zero-valued.
    pub per_call_value: Decimal,
}

impl GroupValuation {
    /// A zero-valued group emits no conversions.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total_value <= Decimal::ZERO
    }
}

/// Score, classify, and price a caller group.
///
/// The best score is the first maximum in call order. The chosen product is
/// the last non-default detection, so a later mention overrides an earlier
/// one.
#[must_use]
pub fn value_group(group: &CallerGroup, catalog: &ProductCatalog) -> GroupValuation {
    let mut best_score: Option<f64> = None;
    let mut product = DEFAULT_PRODUCT_KEY.to_owned();

    for (call, _) in &group.calls {
        let score = score_percent(call);
        if best_score.is_none_or(|best| score > best) {
            best_score = Some(score);
        }

        let detected = detect_product(call, catalog);
        if detected != DEFAULT_PRODUCT_KEY {
            product = detected;
        }
    }

    let best_score = best_score.unwrap_or(DEFAULT_SCORE_PERCENT);
    let tier = classify(best_score);
    let product_price = catalog.price_of(&product);
    let total_value = round2(product_price * tier.multiplier());

    let per_call_value = if total_value > Decimal::ZERO && !group.is_empty() {
        round2(total_value / Decimal::from(group.len()))
    } else {
        Decimal::ZERO
    };

    GroupValuation {
        best_score,
        tier,
        product,
        product_price,
        total_value,
        per_call_value,
    }
}
