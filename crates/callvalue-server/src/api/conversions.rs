//! `GET /api/v1/conversions`: run the valuation pipeline for a lookback
//! window and return or write the result.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use callvalue_core::{CallWindow, Lookback, OffsetStyle, RunStats, Tier, ValuedConversion};
use callvalue_sink::{render_csv, SinkError};
use callvalue_valuation::{run_pipeline, ValuationRun};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Raw query parameters. Parsed by hand so bad values get an [`ApiError`]
/// body instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ConversionsQuery {
    pub hours: Option<String>,
    pub days: Option<String>,
    pub format: Option<String>,
    pub dry_run: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Format {
    Csv,
    Sheet,
    Json,
}

#[derive(Debug, PartialEq, Eq)]
struct ConversionsRequest {
    lookback: Lookback,
    format: Format,
    dry_run: bool,
}

#[derive(Debug, Serialize)]
struct WindowItem {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ConversionItem {
    gclid: String,
    conversion_time: String,
    value: Decimal,
    currency: &'static str,
    tier: Tier,
    product: String,
    product_price: Decimal,
    campaign: Option<String>,
    source: Option<String>,
    duration_secs: Option<i64>,
    lead_score: f64,
    call_id: String,
    phone: Option<String>,
}

impl From<ValuedConversion> for ConversionItem {
    fn from(c: ValuedConversion) -> Self {
        Self {
            conversion_time: c.formatted_time(OffsetStyle::Colon),
            gclid: c.gclid,
            value: c.value,
            currency: c.currency,
            tier: c.tier,
            product: c.product,
            product_price: c.product_price,
            campaign: c.campaign,
            source: c.source,
            duration_secs: c.duration_secs,
            lead_score: c.lead_score,
            call_id: c.call_id,
            phone: c.phone,
        }
    }
}

#[derive(Debug, Serialize)]
struct ConversionsData {
    window: WindowItem,
    stats: RunStats,
    conversions: Vec<ConversionItem>,
}

#[derive(Debug, Serialize)]
struct SummaryData {
    format: Format,
    dry_run: bool,
    window: WindowItem,
    stats: RunStats,
    rows: usize,
    rows_written: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_range: Option<String>,
}

pub(super) async fn get_conversions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ConversionsQuery>,
) -> Result<Response, ApiError> {
    let request = parse_request(&query)
        .map_err(|message| ApiError::new(req_id.0.clone(), "bad_request", message))?;

    // Resolve the sink before fetching so a missing sheet config fails fast.
    let sheets = match (request.format, request.dry_run) {
        (Format::Sheet, false) => Some(state.sheets.clone().ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_configured",
                "spreadsheet destination is not configured",
            )
        })?),
        _ => None,
    };

    let window = CallWindow::ending_at(Utc::now(), request.lookback);
    tracing::info!(
        lookback = %request.lookback,
        format = ?request.format,
        dry_run = request.dry_run,
        "conversion run requested"
    );

    let ValuationRun { conversions, stats } =
        run_pipeline(&state.callrail, &window, &state.valuation)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "valuation run failed");
                ApiError::new(req_id.0.clone(), "upstream_error", e.to_string())
            })?;

    let window_item = WindowItem {
        start: window.start,
        end: window.end,
    };
    let meta = ResponseMeta::new(req_id.0.clone());

    match request.format {
        Format::Json => Ok(Json(ApiResponse {
            data: ConversionsData {
                window: window_item,
                stats,
                conversions: conversions.into_iter().map(ConversionItem::from).collect(),
            },
            meta,
        })
        .into_response()),

        Format::Csv if !request.dry_run => {
            let csv = render_csv(&conversions, &state.valuation.conversion_name);
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"conversions.csv\"",
                    ),
                ],
                csv,
            )
                .into_response())
        }

        Format::Csv | Format::Sheet => {
            let mut summary = SummaryData {
                format: request.format,
                dry_run: request.dry_run,
                window: window_item,
                rows: conversions.len(),
                rows_written: 0,
                updated_range: None,
                stats,
            };

            if let Some(sheets) = sheets {
                let outcome = sheets
                    .append_conversions(&conversions, &state.valuation.conversion_name, Utc::now())
                    .await
                    .map_err(|e| map_sink_error(req_id.0.clone(), &e))?;
                summary.rows_written = outcome.rows_appended;
                summary.updated_range = outcome.updated_range;
            }

            Ok(Json(ApiResponse {
                data: summary,
                meta,
            })
            .into_response())
        }
    }
}

fn map_sink_error(request_id: String, error: &SinkError) -> ApiError {
    tracing::error!(error = %error, "sheet append failed");
    let code = match error {
        SinkError::NotConfigured(_) | SinkError::InvalidBaseUrl { .. } => "not_configured",
        SinkError::Http(_) | SinkError::UnexpectedStatus { .. } => "upstream_error",
    };
    ApiError::new(request_id, code, error.to_string())
}

fn parse_request(query: &ConversionsQuery) -> Result<ConversionsRequest, String> {
    let hours = parse_int("hours", query.hours.as_deref())?;
    let days = parse_int("days", query.days.as_deref())?;
    let lookback = Lookback::from_parts(hours, days).map_err(|e| e.to_string())?;

    let format = match query.format.as_deref().map(str::trim) {
        None | Some("" | "csv") => Format::Csv,
        Some("sheet") => Format::Sheet,
        Some("json") => Format::Json,
        Some(other) => {
            return Err(format!(
                "unknown format \"{other}\"; expected csv, sheet, or json"
            ))
        }
    };

    let dry_run = match query.dry_run.as_deref().map(str::trim) {
        None | Some("" | "0" | "false" | "no") => false,
        Some("1" | "true" | "yes") => true,
        Some(other) => return Err(format!("invalid dry_run \"{other}\"")),
    };

    Ok(ConversionsRequest {
        lookback,
        format,
        dry_run,
    })
}

fn parse_int(name: &str, raw: Option<&str>) -> Result<Option<i64>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("{name} must be an integer, got \"{value}\"")),
    }
}

#[cfg(test)]
#[path = "conversions_test.rs"]
mod tests;
