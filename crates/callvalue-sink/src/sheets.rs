//! Google Sheets append sink.
//!
//! Every run appends all of its rows in a single `values:append` call, so a
//! failed write leaves the sheet untouched.

use std::time::Duration;

use callvalue_core::{OffsetStyle, SheetsConfig, ValuedConversion};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::format_value;

/// Append-only writer for one spreadsheet range.
pub struct SheetsClient {
    client: Client,
    spreadsheet_id: String,
    access_token: String,
    range: String,
    base_url: Url,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[redacted]")
            .field("range", &self.range)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    values: &'a [Vec<String>],
}

#[derive(Debug, Default, Deserialize)]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_range: Option<String>,
}

/// What one append wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    pub rows_appended: usize,
    /// Range the API reports as written, when it says.
    pub updated_range: Option<String>,
}

impl SheetsClient {
    /// Builds a client from the configured destination.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::NotConfigured`] when no destination is set, or
    /// any error from [`Self::with_base_url`].
    pub fn from_config(
        config: Option<&SheetsConfig>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SinkError> {
        let config = config.ok_or(SinkError::NotConfigured(
            "GOOGLE_SHEETS_SPREADSHEET_ID and GOOGLE_SHEETS_ACCESS_TOKEN must both be set",
        ))?;
        Self::with_base_url(config, timeout_secs, user_agent, &config.base_url)
    }

    /// Builds a client against an explicit API root (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SinkError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        config: &SheetsConfig,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            SinkError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            }
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SinkError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "not a hierarchical URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            spreadsheet_id: config.spreadsheet_id.clone(),
            access_token: config.access_token.clone(),
            range: config.range.clone(),
            base_url: parsed,
        })
    }

    /// Appends one row per conversion after the last row of the range.
    ///
    /// An empty `conversions` slice makes no request.
    ///
    /// # Errors
    ///
    /// - [`SinkError::UnexpectedStatus`] for any non-2xx status.
    /// - [`SinkError::Http`] on network failure.
    pub async fn append_conversions(
        &self,
        conversions: &[ValuedConversion],
        conversion_name: &str,
        synced_at: DateTime<Utc>,
    ) -> Result<AppendOutcome, SinkError> {
        if conversions.is_empty() {
            tracing::info!(range = %self.range, "no conversions to append");
            return Ok(AppendOutcome::default());
        }

        let rows = sheet_rows(conversions, conversion_name, synced_at);
        let url = self.append_url();

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.access_token)
            .json(&AppendRequest { values: &rows })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut bare = url;
            bare.set_query(None);
            return Err(SinkError::UnexpectedStatus {
                status: status.as_u16(),
                url: bare.to_string(),
            });
        }

        // The body only carries bookkeeping; an unreadable one is not a failed write.
        let body: AppendResponse = response.json().await.unwrap_or_default();
        let outcome = AppendOutcome {
            rows_appended: rows.len(),
            updated_range: body.updates.and_then(|u| u.updated_range),
        };

        tracing::info!(
            rows = outcome.rows_appended,
            range = outcome.updated_range.as_deref().unwrap_or(&self.range),
            "appended conversions to sheet"
        );

        Ok(outcome)
    }

    fn append_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values"])
                .push(&format!("{}:append", self.range));
        }
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        url
    }
}

/// Sheet rows in column order: click id, conversion name, time, value,
/// currency, tier, product, campaign, source, call id, phone, synced at.
#[must_use]
pub fn sheet_rows(
    conversions: &[ValuedConversion],
    conversion_name: &str,
    synced_at: DateTime<Utc>,
) -> Vec<Vec<String>> {
    let synced_at = synced_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    conversions
        .iter()
        .map(|c| {
            vec![
                c.gclid.clone(),
                conversion_name.to_owned(),
                c.formatted_time(OffsetStyle::Colon),
                format_value(c.value),
                c.currency.to_owned(),
                c.tier.as_str().to_owned(),
                c.product.clone(),
                c.campaign.clone().unwrap_or_default(),
                c.source.clone().unwrap_or_default(),
                c.call_id.clone(),
                c.phone.clone().unwrap_or_default(),
                synced_at.clone(),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use callvalue_core::{conversion_time_from_start, Tier};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;

    fn config() -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: "sheet-123".to_owned(),
            access_token: "ya29.secret".to_owned(),
            range: "Conversions!A:L".to_owned(),
            base_url: "https://sheets.googleapis.com".to_owned(),
        }
    }

    fn conversion() -> ValuedConversion {
        ValuedConversion {
            gclid: "CjwKAAA".to_owned(),
            conversion_time: conversion_time_from_start(Some("2024-03-15T14:30:00-04:00")),
            value: Decimal::new(99_750, 2),
            currency: "USD",
            tier: Tier::VeryGood,
            product: "10".to_owned(),
            product_price: Decimal::new(1995, 0),
            campaign: Some("Spring Boats".to_owned()),
            source: None,
            duration_secs: Some(120),
            lead_score: 85.0,
            call_id: "CAL1".to_owned(),
            phone: Some("+15551234567".to_owned()),
        }
    }

    #[test]
    fn rows_follow_column_order() {
        let synced = Utc.with_ymd_and_hms(2024, 3, 16, 2, 0, 0).unwrap();
        let rows = sheet_rows(&[conversion()], "Phone Call Lead", synced);

        assert_eq!(
            rows,
            vec![vec![
                "CjwKAAA",
                "Phone Call Lead",
                "2024-03-15 11:30:00-07:00",
                "997.50",
                "USD",
                "very_good",
                "10",
                "Spring Boats",
                "",
                "CAL1",
                "+15551234567",
                "2024-03-16T02:00:00Z",
            ]]
        );
    }

    #[test]
    fn append_url_targets_range() {
        let client = SheetsClient::with_base_url(&config(), 5, "test", "https://example.test/").unwrap();
        assert_eq!(
            client.append_url().as_str(),
            "https://example.test/v4/spreadsheets/sheet-123/values/Conversions!A:L:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS"
        );
    }

    #[test]
    fn missing_config_is_not_configured() {
        let err = SheetsClient::from_config(None, 5, "test").unwrap_err();
        assert!(matches!(err, SinkError::NotConfigured(_)));
    }

    #[test]
    fn debug_redacts_token() {
        let client = SheetsClient::from_config(Some(&config()), 5, "test").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("ya29.secret"));
        assert!(debug.contains("[redacted]"));
    }
}
