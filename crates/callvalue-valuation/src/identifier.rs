use std::sync::LazyLock;

use callvalue_callrail::CallRecord;
use regex::Regex;

static GCLID_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]gclid=([^&]+)").expect("valid gclid regex"));

/// Click identifier for a call.
///
/// Uses the direct `gclid` field when it is non-blank, returned with
/// surrounding whitespace trimmed. Otherwise reads the `gclid` query
/// parameter of the landing page URL, taken as-is up to the next `&`.
#[must_use]
pub fn extract_gclid(call: &CallRecord) -> Option<String> {
    if let Some(direct) = call.gclid.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        return Some(direct.to_owned());
    }

    let url = call.landing_page_url.as_deref()?;
    GCLID_PARAM
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
