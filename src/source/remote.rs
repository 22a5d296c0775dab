// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use super::RecordSource;
use crate::config::RemoteSettings;
use crate::error::SourceError;
use crate::models::{Category, NewRecord, Record, RecordKind};
use crate::utils::http_client;
use crate::window::Window;

/// Records in a hosted PostgREST table (`/rest/v1/transactions`).
///
/// Row visibility is enforced by the backend; requests carry the session's
/// access token and are scoped to its user id.
pub struct RemoteSource {
    client: Client,
    table_url: String,
    api_key: String,
    access_token: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
struct RemoteRow {
    id: RowId,
    #[serde(rename = "type")]
    kind: String,
    amount: Decimal,
    category: Option<String>,
    occurred_at: String,
    created_at: String,
    note: Option<String>,
}

impl RemoteRow {
    fn into_record(self) -> Result<Record, SourceError> {
        let id = match self.id {
            RowId::Text(s) => s,
            RowId::Number(n) => n.to_string(),
        };
        let kind = self
            .kind
            .parse::<RecordKind>()
            .map_err(|e| SourceError::Malformed(format!("{}: {}", id, e)))?;
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(SourceError::Malformed(format!(
                "{}: negative amount {}",
                id, self.amount
            )));
        }
        let occurred_at = self
            .occurred_at
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| {
                SourceError::Malformed(format!("{}: invalid occurred_at '{}'", id, self.occurred_at))
            })?;
        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            SourceError::Malformed(format!("{}: invalid created_at '{}'", id, self.created_at))
        })?;
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Category::from_label_lossy);
        Ok(Record {
            id,
            kind,
            amount: self.amount,
            category,
            occurred_at,
            created_at,
            note: self.note,
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // timestamps without an offset are taken as UTC
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|n| n.and_utc())
}

/// Decodes a JSON array of rows. Rows that fail to decode are skipped.
pub fn decode_rows(body: &str) -> Result<Vec<Record>, SourceError> {
    let values: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| SourceError::Malformed(format!("response is not a row array: {}", e)))?;
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        match serde_json::from_value::<RemoteRow>(v)
            .map_err(|e| SourceError::Malformed(e.to_string()))
            .and_then(RemoteRow::into_record)
        {
            Ok(r) => out.push(r),
            Err(e) => tracing::warn!(error = %e, "skipping malformed row"),
        }
    }
    Ok(out)
}

/// Query string for rows of `user_id` inside `window`.
///
/// The upper bound is exclusive on the following day so timestamped
/// `occurred_at` values late on the last day still match.
pub fn fetch_query(window: &Window, user_id: &str) -> Vec<(&'static str, String)> {
    let upper = match window.end().succ_opt() {
        Some(after_end) => format!("lt.{}", after_end),
        None => format!("lte.{}", window.end()),
    };
    vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{}", user_id)),
        ("occurred_at", format!("gte.{}", window.start())),
        ("occurred_at", upper),
        ("order", "occurred_at.desc,created_at.desc".to_string()),
    ]
}

impl RemoteSource {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        let api_url = settings
            .api_url
            .as_deref()
            .context("Remote backend needs remote.api_url")?;
        let api_key = settings
            .api_key
            .clone()
            .context("Remote backend needs remote.api_key")?;
        Ok(Self {
            client: http_client()?,
            table_url: format!("{}/rest/v1/transactions", api_url.trim_end_matches('/')),
            api_key,
            access_token: settings.access_token.clone(),
            user_id: settings.user_id.clone(),
        })
    }

    fn session(&self) -> Result<(&str, &str), SourceError> {
        match (self.access_token.as_deref(), self.user_id.as_deref()) {
            (Some(token), Some(user)) if !token.is_empty() && !user.is_empty() => {
                Ok((token, user))
            }
            _ => Err(SourceError::NotAuthenticated),
        }
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, SourceError> {
        let (token, _) = self.session()?;
        Ok(req
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .header("Accept", "application/json"))
    }

    fn send(&self, req: RequestBuilder) -> Result<String, SourceError> {
        let resp = self.authed(req)?.send()?;
        let resp = check(resp)?;
        Ok(resp.text()?)
    }

    fn single(&self, body: &str, id: &str) -> Result<Record, SourceError> {
        let rows: Vec<RemoteRow> = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("{}: {}", id, e)))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?
            .into_record()
    }
}

fn check(resp: Response) -> Result<Response, SourceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    let err = status_error(status, &body);
    tracing::warn!(status = status.as_u16(), error = %err, "backend rejected request");
    Err(err)
}

/// Maps a failed response to an error. The JSON `message` field is preferred
/// over the raw body.
pub fn status_error(status: StatusCode, body: &str) -> SourceError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return SourceError::NotAuthenticated;
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    SourceError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Checks the representation returned by a delete. An empty array means no row matched.
pub fn confirm_deleted(body: &str, id: &str) -> Result<(), SourceError> {
    let removed: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| SourceError::Malformed(format!("{}: {}", id, e)))?;
    if removed.is_empty() {
        return Err(SourceError::NotFound(id.to_string()));
    }
    Ok(())
}

fn row_body(new: &NewRecord) -> Value {
    json!({
        "type": new.kind.as_str(),
        "amount": new.amount,
        "category": new.category.map(|c| c.label()),
        "occurred_at": new.occurred_at.to_string(),
        "note": new.note,
    })
}

impl RecordSource for RemoteSource {
    fn fetch(&self, window: &Window) -> Result<Vec<Record>, SourceError> {
        let (_, user) = self.session()?;
        let req = self.client.get(&self.table_url).query(&fetch_query(window, user));
        let body = self.send(req)?;
        let out = decode_rows(&body)?;
        tracing::debug!(%window, count = out.len(), "fetched remote records");
        Ok(out)
    }

    fn get(&self, id: &str) -> Result<Record, SourceError> {
        let req = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]);
        let body = self.send(req)?;
        self.single(&body, id)
    }

    fn insert(&self, new: &NewRecord) -> Result<Record, SourceError> {
        new.validate()?;
        let (_, user) = self.session()?;
        let mut body = row_body(new);
        body["user_id"] = Value::String(user.to_string());
        let req = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&body);
        let text = self.send(req)?;
        self.single(&text, "new record")
    }

    fn update(&self, record: &Record) -> Result<Record, SourceError> {
        let new = record.to_new();
        new.validate()?;
        let req = self
            .client
            .patch(&self.table_url)
            .query(&[("id", format!("eq.{}", record.id))])
            .header("Prefer", "return=representation")
            .json(&row_body(&new));
        let text = self.send(req)?;
        self.single(&text, &record.id)
    }

    fn delete(&self, id: &str) -> Result<(), SourceError> {
        let req = self
            .client
            .delete(&self.table_url)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        let text = self.send(req)?;
        confirm_deleted(&text, id)
    }
}
