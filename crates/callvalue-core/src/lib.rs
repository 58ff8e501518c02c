pub mod app_config;
pub mod catalog;
pub mod config;
pub mod conversion;
pub mod money;
pub mod tier;
pub mod window;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, SheetsConfig};
pub use catalog::{load_catalog, ProductCatalog, DEFAULT_PRODUCT_KEY};
pub use config::{load_app_config, load_app_config_from_env};
pub use conversion::{
    conversion_time_from_start, format_conversion_time, OffsetStyle, RunStats, ValuationConfig,
    ValuedConversion, CONVERSION_CURRENCY,
};
pub use money::round2;
pub use tier::{classify, Tier, TIER_TABLE};
pub use window::{CallWindow, Lookback, WindowError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
