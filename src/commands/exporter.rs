// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::window_from;
use crate::source::RecordSource;
use crate::store::TransactionStore;
use crate::utils::{fmt_amount, required_arg};
use anyhow::{Result, bail};
use chrono::NaiveDate;

pub fn handle<S: RecordSource>(
    store: &mut TransactionStore<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub, today),
        _ => Ok(()),
    }
}

fn export_transactions<S: RecordSource>(
    store: &mut TransactionStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let fmt = required_arg(sub, "format")?.to_lowercase();
    let out = required_arg(sub, "out")?;

    let window = window_from(sub, today)?;
    store.load(window)?;
    // oldest first in files
    let mut records = store.records().to_vec();
    records.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "occurred_at",
                "type",
                "amount",
                "category",
                "note",
                "created_at",
            ])?;
            for r in &records {
                wtr.write_record([
                    r.id.clone(),
                    r.occurred_at.to_string(),
                    r.kind.to_string(),
                    fmt_amount(&r.amount),
                    r.category.map(|c| c.to_string()).unwrap_or_default(),
                    r.note.clone().unwrap_or_default(),
                    r.created_at.to_rfc3339(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", records.len(), out);
    Ok(())
}
