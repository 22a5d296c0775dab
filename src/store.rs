// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::SourceError;
use crate::models::{NewRecord, Record, RecordPatch};
use crate::source::RecordSource;
use crate::window::{Window, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Records of one window plus the outcome of the last operation.
///
/// Loading drops the cached records before fetching, so a failed load never
/// leaves records from an earlier window behind.
pub struct TransactionStore<S: RecordSource> {
    source: S,
    records: Vec<Record>,
    window: Option<Window>,
    status: LoadStatus,
    error: Option<String>,
}

impl<S: RecordSource> TransactionStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            records: Vec::new(),
            window: None,
            status: LoadStatus::Idle,
            error: None,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fail(&mut self, err: SourceError) -> SourceError {
        tracing::warn!(error = %err, "store operation failed");
        self.error = Some(err.to_string());
        err
    }

    pub fn load(&mut self, window: Window) -> Result<(), SourceError> {
        self.status = LoadStatus::Loading;
        self.error = None;
        self.records.clear();
        self.window = None;
        match self.source.fetch(&window) {
            Ok(mut records) => {
                records.sort_by(|a, b| {
                    b.occurred_at
                        .cmp(&a.occurred_at)
                        .then(b.created_at.cmp(&a.created_at))
                });
                tracing::info!(%window, count = records.len(), "loaded records");
                self.records = records;
                self.window = Some(window);
                self.status = LoadStatus::Ready;
                Ok(())
            }
            Err(e) => {
                self.status = LoadStatus::Failed;
                Err(self.fail(e))
            }
        }
    }

    pub fn load_month(&mut self, month: YearMonth) -> Result<(), SourceError> {
        self.load(Window::month(month))
    }

    /// Creates a record. It joins the cache when it falls in the loaded
    /// window, or when nothing has been loaded yet.
    pub fn add(&mut self, new: NewRecord) -> Result<Record, SourceError> {
        self.error = None;
        let created = new
            .validate()
            .and_then(|_| self.source.insert(&new))
            .map_err(|e| self.fail(e))?;
        let cache = match self.status {
            LoadStatus::Idle => true,
            LoadStatus::Ready => self.window.is_some_and(|w| w.contains(created.occurred_at)),
            LoadStatus::Loading | LoadStatus::Failed => false,
        };
        if cache {
            self.records.insert(0, created.clone());
        }
        Ok(created)
    }

    pub fn update(&mut self, id: &str, patch: &RecordPatch) -> Result<Record, SourceError> {
        self.error = None;
        let current = match self.records.iter().find(|r| r.id == id) {
            Some(r) => Ok(r.clone()),
            None => self.source.get(id),
        };
        let updated = current
            .and_then(|r| patch.apply(&r))
            .and_then(|r| self.source.update(&r))
            .map_err(|e| self.fail(e))?;
        let keep = self.window.is_none_or(|w| w.contains(updated.occurred_at));
        match self.records.iter().position(|r| r.id == id) {
            Some(i) if keep => self.records[i] = updated.clone(),
            Some(i) => {
                self.records.remove(i);
            }
            None => {}
        }
        Ok(updated)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), SourceError> {
        self.error = None;
        self.source.delete(id).map_err(|e| self.fail(e))?;
        self.records.retain(|r| r.id != id);
        Ok(())
    }
}
