//! Integration tests for `SheetsClient::append_conversions` against wiremock.

use callvalue_core::{conversion_time_from_start, SheetsConfig, Tier, ValuedConversion};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use callvalue_sink::{SheetsClient, SinkError};

const APPEND_PATH: &str = "/v4/spreadsheets/sheet-123/values/Conversions!A:L:append";

fn client(base_url: &str) -> SheetsClient {
    let config = SheetsConfig {
        spreadsheet_id: "sheet-123".to_owned(),
        access_token: "ya29.token".to_owned(),
        range: "Conversions!A:L".to_owned(),
        base_url: base_url.to_owned(),
    };
    SheetsClient::from_config(Some(&config), 5, "callvalue-test/0.1")
        .expect("failed to build test SheetsClient")
}

fn conversion(gclid: &str, call_id: &str) -> ValuedConversion {
    ValuedConversion {
        gclid: gclid.to_owned(),
        conversion_time: conversion_time_from_start(Some("2024-03-15T14:30:00-04:00")),
        value: Decimal::new(112_125, 2),
        currency: "USD",
        tier: Tier::Good,
        product: "default".to_owned(),
        product_price: Decimal::new(1495, 0),
        campaign: None,
        source: Some("Google Ads".to_owned()),
        duration_secs: None,
        lead_score: 70.0,
        call_id: call_id.to_owned(),
        phone: None,
    }
}

#[tokio::test]
async fn appends_all_rows_in_one_request() {
    let server = MockServer::start().await;
    let synced = Utc.with_ymd_and_hms(2024, 3, 16, 2, 0, 0).unwrap();

    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .and(query_param("valueInputOption", "RAW"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(header("authorization", "Bearer ya29.token"))
        .and(body_json(json!({
            "values": [
                ["g1", "Phone Call Lead", "2024-03-15 11:30:00-07:00", "1121.25", "USD",
                 "good", "default", "", "Google Ads", "CAL1", "", "2024-03-16T02:00:00Z"],
                ["g2", "Phone Call Lead", "2024-03-15 11:30:00-07:00", "1121.25", "USD",
                 "good", "default", "", "Google Ads", "CAL2", "", "2024-03-16T02:00:00Z"]
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "sheet-123",
            "updates": {"updatedRange": "Conversions!A10:L11", "updatedRows": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server.uri())
        .append_conversions(
            &[conversion("g1", "CAL1"), conversion("g2", "CAL2")],
            "Phone Call Lead",
            synced,
        )
        .await
        .expect("append");

    assert_eq!(outcome.rows_appended, 2);
    assert_eq!(outcome.updated_range.as_deref(), Some("Conversions!A10:L11"));
}

#[tokio::test]
async fn empty_input_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client(&server.uri())
        .append_conversions(&[], "Phone Call Lead", Utc::now())
        .await
        .expect("append");

    assert_eq!(outcome.rows_appended, 0);
}

#[tokio::test]
async fn rejected_write_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .append_conversions(&[conversion("g1", "CAL1")], "Phone Call Lead", Utc::now())
        .await
        .unwrap_err();

    assert!(
        matches!(err, SinkError::UnexpectedStatus { status: 403, ref url } if !url.contains("valueInputOption")),
        "expected UnexpectedStatus(403), got: {err:?}"
    );
}

#[tokio::test]
async fn unreadable_success_body_still_counts_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let outcome = client(&server.uri())
        .append_conversions(&[conversion("g1", "CAL1")], "Phone Call Lead", Utc::now())
        .await
        .expect("append");

    assert_eq!(outcome.rows_appended, 1);
    assert!(outcome.updated_range.is_none());
}
