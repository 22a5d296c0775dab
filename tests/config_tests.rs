// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use spendscope::config::{Backend, Settings};
use tempfile::tempdir;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let s = Settings::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.backend, Backend::Local);
    assert_eq!(s.currency_symbol, "₱");
}

#[test]
fn set_and_save_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let mut s = Settings::default();
    s.set("backend", "Remote").unwrap();
    s.set("currency_symbol", "$").unwrap();
    s.set("remote.api_url", "https://demo.example").unwrap();
    s.set("remote.user_id", "u-1").unwrap();
    s.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded, s);
    assert_eq!(loaded.backend, Backend::Remote);
    assert_eq!(loaded.remote.api_url.as_deref(), Some("https://demo.example"));

    let mut cleared = loaded.clone();
    cleared.set("remote.user_id", "  ").unwrap();
    assert_eq!(cleared.remote.user_id, None);
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"backend": "remote"}"#).unwrap();
    let s = Settings::load_from(&path).unwrap();
    assert_eq!(s.backend, Backend::Remote);
    assert_eq!(s.currency_symbol, "₱");
    assert!(s.remote.api_key.is_none());
}

#[test]
fn unknown_keys_and_values_are_rejected() {
    let mut s = Settings::default();
    let err = s.set("theme", "dark").unwrap_err().to_string();
    assert!(err.contains("Unknown setting 'theme'"));
    assert!(s.set("backend", "cloud").is_err());
    assert_eq!(s, Settings::default());
}

#[test]
fn environment_overrides_file_values() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SPENDSCOPE_BACKEND", "remote"),
        ("SPENDSCOPE_CURRENCY", "€"),
        ("SPENDSCOPE_API_KEY", "anon-key"),
        ("SPENDSCOPE_ACCESS_TOKEN", "jwt"),
    ]);
    let mut s = Settings::default();
    s.remote.api_url = Some("https://from-file.example".into());
    s.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

    assert_eq!(s.backend, Backend::Remote);
    assert_eq!(s.currency_symbol, "€");
    assert_eq!(s.remote.api_url.as_deref(), Some("https://from-file.example"));
    assert_eq!(s.remote.api_key.as_deref(), Some("anon-key"));
    assert_eq!(s.remote.access_token.as_deref(), Some("jwt"));
    assert_eq!(s.remote.user_id, None);

    let mut bad = Settings::default();
    assert!(bad
        .apply_env(|k| (k == "SPENDSCOPE_BACKEND").then(|| "nope".to_string()))
        .is_err());
}

#[test]
fn display_rows_mask_secrets() {
    let mut s = Settings::default();
    s.remote.api_key = Some("secret".into());
    s.remote.user_id = Some("u-1".into());
    let rows = s.display_rows();
    let get = |k: &str| rows.iter().find(|r| r[0] == k).unwrap()[1].clone();
    assert_eq!(get("remote.api_key"), "********");
    assert_eq!(get("remote.access_token"), "");
    assert_eq!(get("remote.user_id"), "u-1");
}
