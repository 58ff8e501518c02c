//! `convert` command: run the valuation pipeline and hand the result to a sink.
//!
//! The run summary goes to stderr so CSV on stdout stays clean.

use std::path::Path;

use callvalue_callrail::CallRailClient;
use callvalue_core::{load_catalog, AppConfig, CallWindow, Lookback, RunStats, ValuationConfig};
use callvalue_sink::{render_csv, SheetsClient};
use callvalue_valuation::run_pipeline;
use chrono::Utc;

use crate::OutputFormat;

/// Fetch, value, and write conversions for the lookback ending now.
///
/// With `dry_run` the result is computed and summarised but nothing is
/// written to a file or the sheet; CSV without `--output` is still printed.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the fetch fails, the
/// sheet sink is not configured or rejects the append, or the output file
/// cannot be written.
pub(crate) async fn run_convert(
    config: &AppConfig,
    lookback: Lookback,
    format: OutputFormat,
    output: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path)?;
    let valuation = ValuationConfig::from_app_config(config, catalog);

    // Resolve the sink before fetching so a missing sheet config fails fast.
    let sheets = if format == OutputFormat::Sheet && !dry_run {
        Some(SheetsClient::from_config(
            config.sheets.as_ref(),
            config.request_timeout_secs,
            &config.user_agent,
        )?)
    } else {
        None
    };

    let client = CallRailClient::from_app_config(config)?;
    let window = CallWindow::ending_at(Utc::now(), lookback);

    tracing::info!(%lookback, ?format, dry_run, "starting conversion run");
    let run = run_pipeline(&client, &window, &valuation).await?;
    print_stats(&run.stats);

    match format {
        OutputFormat::Csv => {
            let csv = render_csv(&run.conversions, &valuation.conversion_name);
            match output {
                Some(path) if dry_run => {
                    eprintln!(
                        "[dry-run] would write {} rows to {}",
                        run.conversions.len(),
                        path.display()
                    );
                }
                Some(path) => {
                    std::fs::write(path, format!("{csv}\n"))?;
                    eprintln!("wrote {} rows to {}", run.conversions.len(), path.display());
                }
                None => println!("{csv}"),
            }
        }
        OutputFormat::Sheet => match sheets {
            Some(sheets) => {
                let outcome = sheets
                    .append_conversions(&run.conversions, &valuation.conversion_name, Utc::now())
                    .await?;
                eprintln!("appended {} rows to sheet", outcome.rows_appended);
            }
            None => {
                eprintln!(
                    "[dry-run] would append {} rows to sheet",
                    run.conversions.len()
                );
            }
        },
    }

    Ok(())
}

fn print_stats(stats: &RunStats) {
    eprintln!("calls:          {}", stats.total_calls);
    eprintln!("with gclid:     {}", stats.with_gclid);
    eprintln!("valued:         {}", stats.with_value);
    eprintln!("zero value:     {}", stats.zero_value);
    eprintln!("unique callers: {}", stats.unique_callers);
    eprintln!("total value:    {:.2}", stats.total_value);
    eprintln!("pages fetched:  {}", stats.pages_fetched);
    if stats.truncated {
        eprintln!("warning: page ceiling reached; some calls were not fetched");
    }
}
