use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Google Sheets destination for the append sink.
///
/// Present only when both a spreadsheet id and an access token are configured.
#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub access_token: String,
    pub range: String,
    pub base_url: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[redacted]")
            .field("range", &self.range)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub callrail_api_key: String,
    pub callrail_account_id: String,
    pub callrail_base_url: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub aggregate_by_caller: bool,
    pub merge_phoneless_callers: bool,
    pub conversion_name: String,
    pub sheets: Option<SheetsConfig>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("callrail_api_key", &"[redacted]")
            .field("callrail_account_id", &self.callrail_account_id)
            .field("callrail_base_url", &self.callrail_base_url)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("aggregate_by_caller", &self.aggregate_by_caller)
            .field("merge_phoneless_callers", &self.merge_phoneless_callers)
            .field("conversion_name", &self.conversion_name)
            .field("sheets", &self.sheets)
            .finish()
    }
}
