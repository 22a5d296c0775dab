// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{Dashboard, TREND_MONTHS};
use crate::commands::reports::trend_table;
use crate::config::Settings;
use crate::source::RecordSource;
use crate::store::TransactionStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::window::Window;
use anyhow::Result;
use chrono::NaiveDate;

/// One load covering the trend months; every panel is computed from it.
pub fn build<S: RecordSource>(store: &mut TransactionStore<S>, today: NaiveDate) -> Result<Dashboard> {
    store.load(Window::trailing_months(today, TREND_MONTHS as u32))?;
    Ok(Dashboard::build(store.records(), today))
}

pub fn handle<S: RecordSource>(
    store: &mut TransactionStore<S>,
    settings: &Settings,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let dash = build(store, today)?;
    if maybe_print_json(m.get_flag("json"), false, &dash)? {
        return Ok(());
    }
    let symbol = &settings.currency_symbol;

    let kpis = dash
        .kpis
        .cards(symbol)
        .into_iter()
        .map(|c| vec![c.label.to_string(), c.value])
        .collect();
    println!("Snapshot for {}", dash.month);
    println!("{}", pretty_table(&["Metric", "Value"], kpis));

    if dash.categories.is_empty() {
        println!("No expenses recorded this month.");
    } else {
        let cats = dash
            .categories
            .iter()
            .map(|c| vec![c.category.to_string(), fmt_money(&c.total, symbol)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], cats));
    }

    println!("{}", trend_table(&dash.trend));

    let recent: Vec<Vec<String>> = dash
        .recent
        .iter()
        .map(|r| {
            let title = r
                .note
                .clone()
                .or_else(|| r.category.map(|c| c.to_string()))
                .unwrap_or_default();
            vec![
                r.created_at.date_naive().to_string(),
                title,
                r.category.map(|c| c.to_string()).unwrap_or_default(),
                fmt_money(&r.amount, symbol),
            ]
        })
        .collect();
    if !recent.is_empty() {
        println!(
            "{}",
            pretty_table(&["Recorded", "Title", "Category", "Amount"], recent)
        );
    }
    Ok(())
}
