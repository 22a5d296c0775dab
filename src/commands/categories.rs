// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, RecordKind};
use crate::utils::{parse_kind, pretty_table};
use anyhow::Result;

/// Category labels per kind, optionally limited to one kind.
pub fn rows(kind: Option<RecordKind>) -> Vec<Vec<String>> {
    let kinds = match kind {
        Some(k) => vec![k],
        None => vec![RecordKind::Expense, RecordKind::Income],
    };
    kinds
        .into_iter()
        .flat_map(|k| {
            Category::for_kind(k)
                .iter()
                .map(move |c| vec![k.to_string(), c.to_string()])
        })
        .collect()
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let kind = m.get_one::<String>("type").map(|s| parse_kind(s)).transpose()?;
    println!("{}", pretty_table(&["Type", "Category"], rows(kind)));
    Ok(())
}
