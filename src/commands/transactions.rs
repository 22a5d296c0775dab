// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::RecordFilter;
use crate::commands::window_from;
use crate::models::{NewRecord, Record, RecordPatch};
use crate::source::RecordSource;
use crate::store::TransactionStore;
use crate::utils::{
    fmt_amount, maybe_print_json, parse_category, parse_date, parse_decimal, parse_kind,
    pretty_table, required_arg,
};
use anyhow::{Result, bail};
use chrono::NaiveDate;

pub fn handle<S: RecordSource>(
    store: &mut TransactionStore<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, today)?,
        Some(("list", sub)) => list(store, sub, today)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: RecordSource>(
    store: &mut TransactionStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let new = NewRecord {
        kind: parse_kind(required_arg(sub, "type")?)?,
        amount: parse_decimal(required_arg(sub, "amount")?)?,
        category: sub
            .get_one::<String>("category")
            .map(|s| parse_category(s))
            .transpose()?,
        occurred_at: match sub.get_one::<String>("date") {
            Some(d) => parse_date(d)?,
            None => today,
        },
        note: sub.get_one::<String>("note").map(|s| s.to_string()),
    };
    let created = store.add(new)?;
    println!(
        "Recorded {} {} on {} ({})",
        created.kind,
        fmt_amount(&created.amount),
        created.occurred_at,
        created.id
    );
    Ok(())
}

fn edit<S: RecordSource>(store: &mut TransactionStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?;
    let mut patch = RecordPatch {
        kind: sub.get_one::<String>("type").map(|s| parse_kind(s)).transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        occurred_at: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
        ..RecordPatch::default()
    };
    if let Some(cat) = sub.get_one::<String>("category") {
        patch.category = Some(Some(parse_category(cat)?));
    } else if sub.get_flag("clear-category") {
        patch.category = Some(None);
    }
    if let Some(note) = sub.get_one::<String>("note") {
        patch.note = Some(Some(note.to_string()));
    } else if sub.get_flag("clear-note") {
        patch.note = Some(None);
    }
    if patch.is_empty() {
        bail!("Nothing to change for '{}'", id);
    }
    let updated = store.update(id, &patch)?;
    println!("Updated {}", updated.id);
    Ok(())
}

fn remove<S: RecordSource>(store: &mut TransactionStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_arg(sub, "id")?;
    store.remove(id)?;
    println!("Removed {}", id);
    Ok(())
}

fn list<S: RecordSource>(
    store: &mut TransactionStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub, today)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.occurred_at.to_string(),
                    r.kind.to_string(),
                    fmt_amount(&r.amount),
                    r.category.map(|c| c.to_string()).unwrap_or_default(),
                    r.note.clone().unwrap_or_default(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Amount", "Category", "Note", "ID"], rows)
        );
    }
    Ok(())
}

/// Loads the window named on `sub` and applies the list filters.
pub fn query_rows<S: RecordSource>(
    store: &mut TransactionStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<Record>> {
    let window = window_from(sub, today)?;
    store.load(window)?;
    let filter = RecordFilter {
        kind: sub.get_one::<String>("type").map(|s| parse_kind(s)).transpose()?,
        category: sub
            .get_one::<String>("category")
            .map(|s| parse_category(s))
            .transpose()?,
        search: sub.get_one::<String>("search").cloned(),
    };
    let mut data: Vec<Record> = filter.apply(store.records()).into_iter().cloned().collect();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
