// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use spendscope::config::RemoteSettings;
use spendscope::error::SourceError;
use spendscope::models::{Category, RecordKind};
use spendscope::source::{
    RecordSource, RemoteSource, confirm_deleted, decode_rows, fetch_query, status_error,
};
use spendscope::window::{Window, YearMonth};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn decodes_rows_with_string_and_numeric_amounts() {
    let body = r#"[
        {"id": "a1", "type": "expense", "amount": "12.75", "category": "Food",
         "occurred_at": "2024-06-05", "created_at": "2024-06-05T08:30:00+00:00",
         "note": "lunch", "user_id": "u1"},
        {"id": 7, "type": "income", "amount": 100, "category": null,
         "occurred_at": "2024-06-10T23:15:00", "created_at": "2024-06-10 23:15:00",
         "note": null}
    ]"#;
    let rows = decode_rows(body).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].id, "a1");
    assert_eq!(rows[0].kind, RecordKind::Expense);
    assert_eq!(rows[0].amount, "12.75".parse::<Decimal>().unwrap());
    assert_eq!(rows[0].category, Some(Category::Food));
    assert_eq!(
        rows[0].created_at,
        Utc.with_ymd_and_hms(2024, 6, 5, 8, 30, 0).unwrap()
    );

    assert_eq!(rows[1].id, "7");
    assert_eq!(rows[1].amount, Decimal::new(100, 0));
    assert_eq!(rows[1].category, None);
    assert_eq!(rows[1].occurred_at, date(2024, 6, 10));
    assert_eq!(
        rows[1].created_at,
        Utc.with_ymd_and_hms(2024, 6, 10, 23, 15, 0).unwrap()
    );
}

#[test]
fn unknown_category_label_falls_back_to_other() {
    let body = r#"[{"id": "x", "type": "expense", "amount": "5", "category": "Pets",
        "occurred_at": "2024-06-01", "created_at": "2024-06-01T00:00:00Z", "note": null}]"#;
    let rows = decode_rows(body).unwrap();
    assert_eq!(rows[0].category, Some(Category::Other));
}

#[test]
fn malformed_rows_are_skipped() {
    let body = r#"[
        {"id": "ok", "type": "expense", "amount": "1", "category": "",
         "occurred_at": "2024-06-01", "created_at": "2024-06-01T00:00:00Z", "note": null},
        {"id": "bad-type", "type": "transfer", "amount": "1", "category": null,
         "occurred_at": "2024-06-01", "created_at": "2024-06-01T00:00:00Z", "note": null},
        {"id": "bad-date", "type": "expense", "amount": "1", "category": null,
         "occurred_at": "06/01/2024", "created_at": "2024-06-01T00:00:00Z", "note": null},
        {"id": "negative", "type": "expense", "amount": "-4", "category": null,
         "occurred_at": "2024-06-01", "created_at": "2024-06-01T00:00:00Z", "note": null},
        {"id": "no-amount", "type": "expense", "category": null,
         "occurred_at": "2024-06-01", "created_at": "2024-06-01T00:00:00Z", "note": null}
    ]"#;
    let rows = decode_rows(body).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["ok"]);
    assert_eq!(rows[0].category, None);
}

#[test]
fn non_array_body_is_malformed() {
    assert!(matches!(
        decode_rows(r#"{"message": "boom"}"#),
        Err(SourceError::Malformed(_))
    ));
    assert!(decode_rows("[]").unwrap().is_empty());
}

#[test]
fn fetch_query_bounds_window_and_user() {
    let june = Window::month(YearMonth::new(2024, 6).unwrap());
    let q = fetch_query(&june, "user-1");
    assert!(q.contains(&("user_id", "eq.user-1".to_string())));
    assert!(q.contains(&("occurred_at", "gte.2024-06-01".to_string())));
    assert!(q.contains(&("occurred_at", "lt.2024-07-01".to_string())));
    assert!(q.contains(&("order", "occurred_at.desc,created_at.desc".to_string())));
}

#[test]
fn new_requires_url_and_key() {
    let mut settings = RemoteSettings::default();
    assert!(RemoteSource::new(&settings).is_err());
    settings.api_url = Some("https://example.invalid".into());
    assert!(RemoteSource::new(&settings).is_err());
    settings.api_key = Some("anon".into());
    assert!(RemoteSource::new(&settings).is_ok());
}

#[test]
fn missing_session_is_not_authenticated() {
    let settings = RemoteSettings {
        api_url: Some("https://example.invalid".into()),
        api_key: Some("anon".into()),
        access_token: None,
        user_id: Some("u1".into()),
    };
    let source = RemoteSource::new(&settings).unwrap();
    let june = Window::month(YearMonth::new(2024, 6).unwrap());
    assert!(matches!(source.fetch(&june), Err(SourceError::NotAuthenticated)));
    assert!(matches!(source.delete("a1"), Err(SourceError::NotAuthenticated)));
}

#[test]
fn auth_failures_map_to_not_authenticated() {
    for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
        assert!(matches!(
            status_error(status, r#"{"message": "JWT expired"}"#),
            SourceError::NotAuthenticated
        ));
    }
}

#[test]
fn rejected_requests_carry_the_backend_message() {
    let err = status_error(
        StatusCode::BAD_REQUEST,
        r#"{"code": "23514", "message": "new row violates check constraint"}"#,
    );
    match err {
        SourceError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "new row violates check constraint");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    match status_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream timed out") {
        SourceError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream timed out");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn delete_response_must_name_a_row() {
    assert!(confirm_deleted(r#"[{"id": "a1"}]"#, "a1").is_ok());
    assert!(matches!(confirm_deleted("[]", "a1"), Err(SourceError::NotFound(_))));
    assert!(matches!(
        confirm_deleted("<html>bad gateway</html>", "a1"),
        Err(SourceError::Malformed(_))
    ));
}
