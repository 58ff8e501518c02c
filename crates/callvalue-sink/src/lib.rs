//! Output sinks for valued conversions: a CSV document for manual upload and
//! an append-only Google Sheets range read by a separate importer.

pub mod csv;
pub mod error;
pub mod sheets;

pub use csv::{render_csv, CSV_HEADER};
pub use error::SinkError;
pub use sheets::{sheet_rows, AppendOutcome, SheetsClient};

use callvalue_core::round2;
use rust_decimal::Decimal;

/// Money rendered with exactly two decimals, e.g. `997.50`.
pub(crate) fn format_value(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}
