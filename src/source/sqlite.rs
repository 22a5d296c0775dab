// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::RecordSource;
use crate::db;
use crate::error::SourceError;
use crate::models::{Category, NewRecord, Record, RecordKind};
use crate::window::Window;

const COLUMNS: &str = "id, type, amount, category, occurred_at, created_at, note";

/// Records kept in the local `transactions` table.
pub struct SqliteSource {
    conn: Connection,
}

struct StoredRow {
    id: String,
    kind: String,
    amount: String,
    category: Option<String>,
    occurred_at: NaiveDate,
    created_at: DateTime<Utc>,
    note: Option<String>,
}

impl StoredRow {
    fn read(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            kind: r.get(1)?,
            amount: r.get(2)?,
            category: r.get(3)?,
            occurred_at: r.get(4)?,
            created_at: r.get(5)?,
            note: r.get(6)?,
        })
    }

    fn into_record(self) -> Result<Record, SourceError> {
        let kind = self
            .kind
            .parse::<RecordKind>()
            .map_err(|e| SourceError::Malformed(format!("{}: {}", self.id, e)))?;
        let amount = self.amount.parse::<Decimal>().map_err(|_| {
            SourceError::Malformed(format!("{}: invalid amount '{}'", self.id, self.amount))
        })?;
        let category = match self.category.as_deref() {
            None | Some("") => None,
            Some(label) => Some(
                label
                    .parse::<Category>()
                    .map_err(|e| SourceError::Malformed(format!("{}: {}", self.id, e)))?,
            ),
        };
        Ok(Record {
            id: self.id,
            kind,
            amount,
            category,
            occurred_at: self.occurred_at,
            created_at: self.created_at,
            note: self.note,
        })
    }
}

impl SqliteSource {
    /// Wraps an open connection, creating the schema when missing.
    pub fn new(conn: Connection) -> Result<Self, SourceError> {
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, SourceError> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self {
            conn: db::open_or_init()?,
        })
    }
}

impl RecordSource for SqliteSource {
    fn fetch(&self, window: &Window) -> Result<Vec<Record>, SourceError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE occurred_at >= ?1 AND occurred_at <= ?2
             ORDER BY occurred_at DESC, created_at DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![window.start(), window.end()], StoredRow::read)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_record()?);
        }
        tracing::debug!(%window, count = out.len(), "fetched local records");
        Ok(out)
    }

    fn get(&self, id: &str) -> Result<Record, SourceError> {
        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id=?1");
        self.conn
            .query_row(&sql, params![id], StoredRow::read)
            .optional()?
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?
            .into_record()
    }

    fn insert(&self, new: &NewRecord) -> Result<Record, SourceError> {
        new.validate()?;
        let record = Record {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            amount: new.amount,
            category: new.category,
            occurred_at: new.occurred_at,
            created_at: Utc::now(),
            note: new.note.clone(),
        };
        self.conn.execute(
            "INSERT INTO transactions(id, type, amount, category, occurred_at, created_at, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.kind.as_str(),
                record.amount.to_string(),
                record.category.map(|c| c.label()),
                record.occurred_at,
                record.created_at,
                record.note
            ],
        )?;
        tracing::debug!(id = %record.id, "inserted local record");
        Ok(record)
    }

    fn update(&self, record: &Record) -> Result<Record, SourceError> {
        record.to_new().validate()?;
        let changed = self.conn.execute(
            "UPDATE transactions SET type=?2, amount=?3, category=?4, occurred_at=?5, note=?6
             WHERE id=?1",
            params![
                record.id,
                record.kind.as_str(),
                record.amount.to_string(),
                record.category.map(|c| c.label()),
                record.occurred_at,
                record.note
            ],
        )?;
        if changed == 0 {
            return Err(SourceError::NotFound(record.id.clone()));
        }
        self.get(&record.id)
    }

    fn delete(&self, id: &str) -> Result<(), SourceError> {
        let removed = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if removed == 0 {
            return Err(SourceError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
