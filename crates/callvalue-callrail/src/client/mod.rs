//! HTTP client for CallRail's paginated call listing.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::CallRailError;
use crate::types::CallsPage;

pub use fetch_all::FetchedCalls;

const DEFAULT_BASE_URL: &str = "https://api.callrail.com";

/// Fields requested on top of CallRail's default call payload.
const EXTRA_FIELDS: &str =
    "gclid,landing_page_url,lead_score,note,transcription,tags,campaign,source";

const DEFAULT_PAGE_SIZE: u32 = 250;
const DEFAULT_MAX_PAGES: u32 = 50;

/// Client for CallRail's `calls.json` listing endpoint.
///
/// Pages are requested strictly one after another. Any non-2xx response is
/// returned as [`CallRailError::UnexpectedStatus`]; nothing is retried.
pub struct CallRailClient {
    pub(super) client: Client,
    api_key: String,
    account_id: String,
    base_url: Url,
    pub(super) page_size: u32,
    pub(super) max_pages: u32,
}

impl CallRailClient {
    /// Creates a client pointed at the production CallRail API.
    ///
    /// # Errors
    ///
    /// Returns [`CallRailError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        account_id: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CallRailError> {
        Self::with_base_url(api_key, account_id, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client from the application config, including page limits.
    ///
    /// # Errors
    ///
    /// Returns [`CallRailError`] if the client cannot be built or the
    /// configured base URL is invalid.
    pub fn from_app_config(config: &callvalue_core::AppConfig) -> Result<Self, CallRailError> {
        Ok(Self::with_base_url(
            &config.callrail_api_key,
            &config.callrail_account_id,
            config.request_timeout_secs,
            &config.user_agent,
            &config.callrail_base_url,
        )?
        .with_page_limits(config.page_size, config.max_pages))
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CallRailError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`CallRailError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        account_id: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, CallRailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CallRailError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            account_id: account_id.to_owned(),
            base_url: parsed,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Overrides the page size and the page-count ceiling. Zero values are
    /// raised to 1.
    #[must_use]
    pub fn with_page_limits(mut self, page_size: u32, max_pages: u32) -> Self {
        self.page_size = page_size.max(1);
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetches one page of calls whose start date lies between the given
    /// calendar dates (`YYYY-MM-DD`, inclusive on the provider side).
    ///
    /// # Errors
    ///
    /// - [`CallRailError::UnexpectedStatus`] for any non-2xx status.
    /// - [`CallRailError::Http`] on network or TLS failure.
    /// - [`CallRailError::Deserialize`] if the body is not a calls page.
    pub async fn fetch_calls_page(
        &self,
        page: u32,
        start_date: &str,
        end_date: &str,
    ) -> Result<CallsPage, CallRailError> {
        let url = self.calls_url(page, start_date, end_date)?;

        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token token=\"{}\"", self.api_key),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallRailError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_url(&url),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<CallsPage>(&body).map_err(|e| CallRailError::Deserialize {
            context: format!("calls page {page}"),
            source: e,
        })
    }

    /// Builds the listing URL for one page.
    ///
    /// # Errors
    ///
    /// Returns [`CallRailError::InvalidBaseUrl`] if the account path cannot
    /// be joined onto the base URL.
    fn calls_url(&self, page: u32, start_date: &str, end_date: &str) -> Result<Url, CallRailError> {
        let path = format!("v3/a/{}/calls.json", self.account_id);
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| CallRailError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot append \"{path}\": {e}"),
            })?;

        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.page_size.to_string())
            .append_pair("start_date", start_date)
            .append_pair("end_date", end_date)
            .append_pair("fields", EXTRA_FIELDS);

        Ok(url)
    }
}

/// URL without its query string, for error messages.
fn redact_url(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.to_string()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
