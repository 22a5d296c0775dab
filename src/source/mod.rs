// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where records live. The store talks to a [`RecordSource`]; the local
//! SQLite file and the hosted REST table both implement it.

mod remote;
mod sqlite;

pub use remote::{RemoteSource, confirm_deleted, decode_rows, fetch_query, status_error};
pub use sqlite::SqliteSource;

use anyhow::Result;

use crate::config::{Backend, Settings};
use crate::error::SourceError;
use crate::models::{NewRecord, Record};
use crate::window::Window;

pub trait RecordSource {
    /// Records whose `occurred_at` falls inside `window`, newest first.
    fn fetch(&self, window: &Window) -> Result<Vec<Record>, SourceError>;

    fn get(&self, id: &str) -> Result<Record, SourceError>;

    fn insert(&self, new: &NewRecord) -> Result<Record, SourceError>;

    /// Persists every editable field of `record` and returns the stored row.
    fn update(&self, record: &Record) -> Result<Record, SourceError>;

    fn delete(&self, id: &str) -> Result<(), SourceError>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn fetch(&self, window: &Window) -> Result<Vec<Record>, SourceError> {
        (**self).fetch(window)
    }

    fn get(&self, id: &str) -> Result<Record, SourceError> {
        (**self).get(id)
    }

    fn insert(&self, new: &NewRecord) -> Result<Record, SourceError> {
        (**self).insert(new)
    }

    fn update(&self, record: &Record) -> Result<Record, SourceError> {
        (**self).update(record)
    }

    fn delete(&self, id: &str) -> Result<(), SourceError> {
        (**self).delete(id)
    }
}

/// Opens the backend selected in `settings`.
pub fn open(settings: &Settings) -> Result<Box<dyn RecordSource>> {
    match settings.backend {
        Backend::Local => {
            tracing::debug!("using local sqlite backend");
            Ok(Box::new(SqliteSource::open_default()?))
        }
        Backend::Remote => {
            tracing::debug!("using remote backend");
            Ok(Box::new(RemoteSource::new(&settings.remote)?))
        }
    }
}
