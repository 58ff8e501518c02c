use super::*;

fn test_client(base_url: &str) -> CallRailClient {
    CallRailClient::with_base_url("test-key", "ACC123", 5, "callvalue-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn calls_url_includes_paging_and_dates() {
    let client = test_client("https://api.callrail.com");
    let url = client
        .calls_url(2, "2024-03-14", "2024-03-15")
        .expect("url");
    assert_eq!(
        url.as_str(),
        "https://api.callrail.com/v3/a/ACC123/calls.json?page=2&per_page=250&start_date=2024-03-14&end_date=2024-03-15&fields=gclid%2Clanding_page_url%2Clead_score%2Cnote%2Ctranscription%2Ctags%2Ccampaign%2Csource"
    );
}

#[test]
fn calls_url_strips_trailing_slash() {
    let client = test_client("https://api.callrail.com/");
    let url = client.calls_url(1, "2024-03-14", "2024-03-14").expect("url");
    assert!(
        url.as_str()
            .starts_with("https://api.callrail.com/v3/a/ACC123/calls.json?page=1&"),
        "unexpected url: {url}"
    );
}

#[test]
fn calls_url_uses_configured_page_size() {
    let client = test_client("https://api.callrail.com").with_page_limits(100, 3);
    let url = client.calls_url(1, "2024-03-14", "2024-03-14").expect("url");
    assert!(url.as_str().contains("per_page=100"), "unexpected url: {url}");
}

#[test]
fn page_limits_are_at_least_one() {
    let client = test_client("https://api.callrail.com").with_page_limits(0, 0);
    assert_eq!(client.page_size, 1);
    assert_eq!(client.max_pages, 1);
}

#[test]
fn with_base_url_rejects_garbage() {
    let result =
        CallRailClient::with_base_url("k", "ACC123", 5, "callvalue-test/0.1", "not a url");
    assert!(
        matches!(result, Err(CallRailError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}

#[test]
fn redact_url_drops_query() {
    let url = Url::parse("https://api.callrail.com/v3/a/ACC123/calls.json?page=1").unwrap();
    assert_eq!(redact_url(&url), "https://api.callrail.com/v3/a/ACC123/calls.json");
}
