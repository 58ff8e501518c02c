//! Valued conversions, run statistics, and the immutable valuation settings
//! shared by the pipeline and its callers.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::app_config::AppConfig;
use crate::catalog::ProductCatalog;
use crate::tier::Tier;

/// Currency attached to every conversion.
pub const CONVERSION_CURRENCY: &str = "USD";

/// Conversion times are always reported at UTC-07:00, year round.
const CONVERSION_OFFSET_SECS: i32 = -7 * 3600;

/// Settings the valuation pipeline reads. Built once at startup and passed
/// by reference.
#[derive(Debug, Clone)]
pub struct ValuationConfig {
    pub catalog: ProductCatalog,
    /// Group calls by normalized caller phone before valuing. When `false`
    /// every call is scored on its own and no value splitting happens.
    pub aggregate_by_caller: bool,
    /// Put every call without a phone number into one shared `unknown`
    /// group. When `false` each phoneless call becomes its own group.
    pub merge_phoneless_callers: bool,
    /// Conversion action name written by the sinks.
    pub conversion_name: String,
}

impl ValuationConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig, catalog: ProductCatalog) -> Self {
        Self {
            catalog,
            aggregate_by_caller: config.aggregate_by_caller,
            merge_phoneless_callers: config.merge_phoneless_callers,
            conversion_name: config.conversion_name.clone(),
        }
    }
}

/// One call turned into an uploadable conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedConversion {
    pub gclid: String,
    /// Call start shifted to UTC-07:00. `None` when the provider sent no
    /// usable start time.
    pub conversion_time: Option<DateTime<FixedOffset>>,
    pub value: Decimal,
    pub currency: &'static str,
    pub tier: Tier,
    pub product: String,
    pub product_price: Decimal,
    pub campaign: Option<String>,
    pub source: Option<String>,
    pub duration_secs: Option<i64>,
    pub lead_score: f64,
    pub call_id: String,
    pub phone: Option<String>,
}

impl ValuedConversion {
    #[must_use]
    pub fn formatted_time(&self, style: OffsetStyle) -> String {
        format_conversion_time(self.conversion_time.as_ref(), style)
    }
}

/// Counters accumulated over one pipeline run.
///
/// `total_calls = with_gclid + calls without a click id` and
/// `with_gclid = with_value + zero_value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub total_calls: usize,
    pub with_gclid: usize,
    pub with_value: usize,
    pub zero_value: usize,
    pub total_value: Decimal,
    pub unique_callers: usize,
    pub pages_fetched: u32,
    /// The page ceiling was reached while pages were still full; calls past
    /// the ceiling were not fetched.
    pub truncated: bool,
}

/// How the UTC offset is written in a rendered conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetStyle {
    /// `-0700`, used by the CSV upload format.
    Compact,
    /// `-07:00`, used by the spreadsheet rows.
    Colon,
}

/// Convert a provider start time to the fixed conversion offset.
///
/// Accepts RFC 3339 timestamps (converted by offset arithmetic) and naive
/// `YYYY-MM-DD HH:MM:SS` values (taken as wall-clock time at the conversion
/// offset). Anything else yields `None`.
#[must_use]
pub fn conversion_time_from_start(raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(CONVERSION_OFFSET_SECS)?;
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&offset));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .and_then(|naive| naive.and_local_timezone(offset).single())
}

/// Render a conversion time as `yyyy-MM-dd HH:mm:ss` plus offset.
/// A missing time renders as an empty string.
#[must_use]
pub fn format_conversion_time(time: Option<&DateTime<FixedOffset>>, style: OffsetStyle) -> String {
    let Some(time) = time else {
        return String::new();
    };
    let pattern = match style {
        OffsetStyle::Compact => "%Y-%m-%d %H:%M:%S%z",
        OffsetStyle::Colon => "%Y-%m-%d %H:%M:%S%:z",
    };
    time.format(pattern).to_string()
}
