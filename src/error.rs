// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised while reading or writing records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Transaction '{0}' not found")]
    NotFound(String),
    #[error("Malformed record: {0}")]
    Malformed(String),
    #[error("Invalid record: {0}")]
    Invalid(String),
}
