use callvalue_callrail::CallRailError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch calls: {0}")]
    Fetch(#[from] CallRailError),
}
