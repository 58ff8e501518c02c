//! Product catalog: product-size keys (horsepower ratings) mapped to prices.
//!
//! Loaded once per process from a YAML file shaped like:
//!
//! ```yaml
//! default: "1495.00"
//! products:
//!   "10": "1995.00"
//!   "25": "3495.00"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Key reported when no product signal is found in a call.
pub const DEFAULT_PRODUCT_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    /// Fallback price used for the [`DEFAULT_PRODUCT_KEY`] product.
    pub default: Decimal,
    #[serde(default)]
    pub products: BTreeMap<String, Decimal>,
}

impl ProductCatalog {
    /// Returns `true` if `key` is a concrete (non-default) catalog entry.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.products.contains_key(key)
    }

    /// Price for `key`, falling back to the default price for unknown keys.
    #[must_use]
    pub fn price_of(&self, key: &str) -> Decimal {
        self.products.get(key).copied().unwrap_or(self.default)
    }

    /// Parse and validate a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let catalog: ProductCatalog =
            serde_yaml::from_str(content).map_err(ConfigError::CatalogFileParse)?;
        validate_catalog(&catalog)?;
        Ok(catalog)
    }
}

/// Load and validate the product catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<ProductCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    ProductCatalog::from_yaml_str(&content)
}

fn validate_catalog(catalog: &ProductCatalog) -> Result<(), ConfigError> {
    if catalog.default.is_sign_negative() {
        return Err(ConfigError::Validation(format!(
            "default price must be non-negative, got {}",
            catalog.default
        )));
    }

    for (key, price) in &catalog.products {
        if key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product key must be non-empty".to_string(),
            ));
        }
        if key == DEFAULT_PRODUCT_KEY {
            return Err(ConfigError::Validation(format!(
                "'{DEFAULT_PRODUCT_KEY}' is reserved; set the top-level `default` price instead"
            )));
        }
        if price.is_sign_negative() {
            return Err(ConfigError::Validation(format!(
                "product '{key}' has negative price {price}"
            )));
        }
    }

    Ok(())
}
