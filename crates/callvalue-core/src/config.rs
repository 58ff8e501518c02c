use crate::app_config::{AppConfig, Environment, SheetsConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                invalid(var, format!("expected true/false, got \"{raw}\""))
            }),
        }
    };

    let callrail_api_key = require("CALLRAIL_API_KEY")?;
    let callrail_account_id = require("CALLRAIL_ACCOUNT_ID")?;

    let env = parse_environment(&or_default("CALLVALUE_ENV", "development"));
    let bind_addr = parse_addr("CALLVALUE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CALLVALUE_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "CALLVALUE_CATALOG_PATH",
        "./config/valuation.yaml",
    ));
    let callrail_base_url = or_default("CALLRAIL_BASE_URL", "https://api.callrail.com");

    let page_size = parse_u32("CALLVALUE_PAGE_SIZE", "250")?;
    if page_size == 0 {
        return Err(invalid("CALLVALUE_PAGE_SIZE", "must be at least 1".into()));
    }
    let max_pages = parse_u32("CALLVALUE_MAX_PAGES", "50")?;
    if max_pages == 0 {
        return Err(invalid("CALLVALUE_MAX_PAGES", "must be at least 1".into()));
    }
    let request_timeout_secs = parse_u64("CALLVALUE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CALLVALUE_USER_AGENT", "callvalue/0.1 (conversion-sync)");

    let aggregate_by_caller = parse_bool("CALLVALUE_AGGREGATE_BY_CALLER", true)?;
    let merge_phoneless_callers = parse_bool("CALLVALUE_MERGE_PHONELESS_CALLERS", true)?;
    let conversion_name = or_default("CALLVALUE_CONVERSION_NAME", "Phone Call Lead");

    let sheets = match (
        lookup("GOOGLE_SHEETS_SPREADSHEET_ID").ok(),
        lookup("GOOGLE_SHEETS_ACCESS_TOKEN").ok(),
    ) {
        (Some(spreadsheet_id), Some(access_token)) => Some(SheetsConfig {
            spreadsheet_id,
            access_token,
            range: or_default("GOOGLE_SHEETS_RANGE", "Conversions!A:L"),
            base_url: or_default("GOOGLE_SHEETS_BASE_URL", "https://sheets.googleapis.com"),
        }),
        _ => None,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        callrail_api_key,
        callrail_account_id,
        callrail_base_url,
        page_size,
        max_pages,
        request_timeout_secs,
        user_agent,
        aggregate_by_caller,
        merge_phoneless_callers,
        conversion_name,
        sheets,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
