//! Multi-page call fetch loop for `CallRailClient`.

use callvalue_core::CallWindow;

use crate::error::CallRailError;
use crate::types::CallRecord;

use super::CallRailClient;

/// Every call fetched for one window, plus paging bookkeeping.
#[derive(Debug, Default)]
pub struct FetchedCalls {
    pub calls: Vec<CallRecord>,
    pub pages_fetched: u32,
    /// The page ceiling stopped the loop while the last page was full, so
    /// more calls may exist.
    pub truncated: bool,
}

impl CallRailClient {
    /// Fetches every call in `window`, one page at a time.
    ///
    /// Stops at the first page holding fewer than `page_size` calls, or once
    /// `max_pages` pages have been read. Hitting the ceiling is not an error:
    /// it is logged and reported through [`FetchedCalls::truncated`].
    ///
    /// **All-or-nothing**: if any page fails, calls from earlier pages are
    /// discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_calls_page`].
    pub async fn fetch_calls(&self, window: &CallWindow) -> Result<FetchedCalls, CallRailError> {
        let start_date = window.start_date().format("%Y-%m-%d").to_string();
        let end_date = window.end_date().format("%Y-%m-%d").to_string();

        let mut fetched = FetchedCalls::default();
        let mut page = 1u32;

        loop {
            let response = self.fetch_calls_page(page, &start_date, &end_date).await?;
            let count = response.calls.len();
            fetched.calls.extend(response.calls);
            fetched.pages_fetched = page;

            tracing::debug!(page, count, %start_date, %end_date, "fetched calls page");

            if count < self.page_size as usize {
                break;
            }

            if page >= self.max_pages {
                fetched.truncated = true;
                tracing::warn!(
                    max_pages = self.max_pages,
                    page_size = self.page_size,
                    fetched = fetched.calls.len(),
                    "page ceiling reached with a full last page; remaining calls were not fetched"
                );
                break;
            }

            page += 1;
        }

        Ok(fetched)
    }
}
