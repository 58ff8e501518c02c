use callvalue_callrail::{CallRailClient, CallRecord};
use callvalue_core::{
    conversion_time_from_start, CallWindow, RunStats, ValuationConfig, ValuedConversion,
    CONVERSION_CURRENCY,
};

use crate::aggregate::{count_callers, group_calls, value_group};
use crate::error::PipelineError;
use crate::identifier::extract_gclid;

/// Result of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ValuationRun {
    pub conversions: Vec<ValuedConversion>,
    pub stats: RunStats,
}

/// Fetch every call in `window` and value it.
///
/// The fetch is all-or-nothing, so an error here means no conversions were
/// produced.
///
/// # Errors
///
/// Returns [`PipelineError::Fetch`] if any page of the call listing fails.
pub async fn run_pipeline(
    client: &CallRailClient,
    window: &CallWindow,
    config: &ValuationConfig,
) -> Result<ValuationRun, PipelineError> {
    let fetched = client.fetch_calls(window).await?;

    let mut run = value_calls(fetched.calls, config);
    run.stats.pages_fetched = fetched.pages_fetched;
    run.stats.truncated = fetched.truncated;

    tracing::info!(
        start = %window.start,
        end = %window.end,
        total_calls = run.stats.total_calls,
        with_gclid = run.stats.with_gclid,
        with_value = run.stats.with_value,
        zero_value = run.stats.zero_value,
        unique_callers = run.stats.unique_callers,
        total_value = %run.stats.total_value,
        pages = run.stats.pages_fetched,
        truncated = run.stats.truncated,
        "valuation run complete"
    );

    Ok(run)
}

/// Turn fetched calls into valued conversions.
///
/// Calls without a click identifier are dropped. The rest are grouped by
/// caller and each group is valued as a whole. Output follows group order,
/// then call order within a group, and depends only on `calls` and `config`.
#[must_use]
pub fn value_calls(calls: Vec<CallRecord>, config: &ValuationConfig) -> ValuationRun {
    let mut stats = RunStats {
        total_calls: calls.len(),
        ..RunStats::default()
    };

    let pairs: Vec<(CallRecord, String)> = calls
        .into_iter()
        .filter_map(|call| extract_gclid(&call).map(|gclid| (call, gclid)))
        .collect();

    stats.with_gclid = pairs.len();
    stats.unique_callers =
        count_callers(pairs.iter().map(|(call, _)| call), config.merge_phoneless_callers);

    let mut conversions = Vec::with_capacity(pairs.len());

    for group in group_calls(pairs, config) {
        let valuation = value_group(&group, &config.catalog);

        if valuation.is_zero() {
            tracing::debug!(
                caller = %group.key,
                calls = group.len(),
                tier = %valuation.tier,
                "caller group is zero-valued"
            );
            stats.zero_value += group.len();
            continue;
        }

        for (call, gclid) in group.calls {
            let conversion_time = conversion_time_from_start(call.start_time.as_deref());
            if conversion_time.is_none() {
                tracing::warn!(call_id = %call.id, "call has no usable start time");
            }

            stats.with_value += 1;
            stats.total_value += valuation.per_call_value;

            conversions.push(ValuedConversion {
                gclid,
                conversion_time,
                value: valuation.per_call_value,
                currency: CONVERSION_CURRENCY,
                tier: valuation.tier,
                product: valuation.product.clone(),
                product_price: valuation.product_price,
                campaign: call.campaign,
                source: call.source,
                duration_secs: call.duration,
                lead_score: valuation.best_score,
                call_id: call.id,
                phone: call.customer_phone_number,
            });
        }
    }

    ValuationRun { conversions, stats }
}
