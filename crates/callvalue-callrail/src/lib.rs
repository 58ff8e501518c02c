//! Client for the CallRail call-listing API.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CallRailClient, FetchedCalls};
pub use error::CallRailError;
pub use types::{CallRecord, CallTag, CallsPage, LeadScore, LeadScoreDetail};
