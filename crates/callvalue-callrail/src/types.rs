//! CallRail API response types for `GET /v3/a/{account_id}/calls.json`.
//!
//! ## Observed shape
//!
//! ### `id`
//! A string like `"CAL8154748ae6bd4e278a7cddd38a662f4f"`. Older accounts and
//! test fixtures sometimes send a bare number; both are accepted.
//!
//! ### `lead_score`
//! Varies by account configuration: a number (`85`), a label
//! (`"very_good"`, `"Good"`), an object (`{"percentage": 72, "score": 3}`),
//! or `null`. Modeled as the [`LeadScore`] union; anything else lands in
//! [`LeadScore::Other`] rather than failing the page.
//!
//! ### `tags`
//! Either plain strings or objects with a `name`. May be `null`.
//!
//! ### Free-text fields
//! `note` and `transcription` are `null` when absent.
//!
//! ### Shape drift
//! Every record field is read leniently: a value of an unexpected JSON type
//! becomes `None` (or an empty list) instead of failing the page. Phone
//! numbers and `duration` also accept the other of string/number.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level response from the call listing endpoint.
#[derive(Debug, Deserialize)]
pub struct CallsPage {
    #[serde(default, deserialize_with = "lenient_count")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub per_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_records: Option<u64>,
    /// Entries that are not JSON objects become empty records, so the page
    /// length still matches what the provider sent.
    #[serde(deserialize_with = "lenient_records")]
    pub calls: Vec<CallRecord>,
}

/// A single call as returned by CallRail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// RFC 3339 start time in the account's timezone.
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_time: Option<String>,

    /// Call length in seconds.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: Option<i64>,

    #[serde(default, deserialize_with = "lenient_phone")]
    pub customer_phone_number: Option<String>,

    #[serde(default, deserialize_with = "lenient_phone")]
    pub tracking_phone_number: Option<String>,

    /// Traffic source label, e.g. `"Google Ads"`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub campaign: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub landing_page_url: Option<String>,

    /// Click identifier captured directly by CallRail's swap script.
    #[serde(default, deserialize_with = "lenient_text")]
    pub gclid: Option<String>,

    #[serde(default)]
    pub lead_score: Option<LeadScore>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub note: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub transcription: Option<String>,

    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<CallTag>,
}

/// Provider-specific lead score representation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LeadScore {
    Numeric(f64),
    Label(String),
    Structured(LeadScoreDetail),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LeadScoreDetail {
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// A call tag: a plain string or an object carrying a `name`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CallTag {
    Name(String),
    Structured {
        #[serde(default)]
        name: Option<String>,
    },
    Other(serde_json::Value),
}

impl CallTag {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            CallTag::Name(name) => Some(name.as_str()),
            CallTag::Structured { name } => name.as_deref(),
            CallTag::Other(_) => None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<CallRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
            _ => CallRecord::default(),
        })
        .collect())
}

/// Strings only; any other JSON type reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_phone<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Whole seconds from an integer, a float (truncated) or a numeric string.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(whole_seconds)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_seconds))
        }
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn whole_seconds(value: f64) -> Option<i64> {
    // Bounds keep the cast exact; NaN fails both comparisons.
    (value.is_finite() && value.abs() < 9.0e15).then(|| value.trunc() as i64)
}

fn lenient_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .and_then(|n| T::try_from(n).ok()))
}

/// Non-array `tags` read as empty; elements always fit [`CallTag::Other`].
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<CallTag>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
