//! Conversion valuation for tracked phone calls.
//!
//! Pulls calls for a window, keeps those with a click identifier, groups
//! repeat callers, scores and prices each group, and spreads the group value
//! across its calls.

pub mod aggregate;
pub mod error;
pub mod identifier;
pub mod phone;
pub mod pipeline;
pub mod product;
pub mod score;

pub use aggregate::{count_callers, group_calls, value_group, CallerGroup, GroupValuation};
pub use error::PipelineError;
pub use identifier::extract_gclid;
pub use phone::{normalize_phone, UNKNOWN_CALLER};
pub use pipeline::{run_pipeline, value_calls, ValuationRun};
pub use product::detect_product;
pub use score::{score_percent, DEFAULT_SCORE_PERCENT};
