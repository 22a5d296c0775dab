// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{
    CategoryTotal, KpiSnapshot, MonthBucket, TREND_MONTHS, category_totals, kpi_snapshot,
    sorted_by_total_desc, trend_series,
};
use crate::commands::window_from;
use crate::config::Settings;
use crate::source::RecordSource;
use crate::store::TransactionStore;
use crate::utils::{
    fmt_amount, maybe_print_json, parse_category, parse_kind, pretty_table, required_arg,
};
use crate::window::Window;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle<S: RecordSource>(
    store: &mut TransactionStore<S>,
    settings: &Settings,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("categories", sub)) => categories(store, settings, sub, today)?,
        Some(("trend", sub)) => trend(store, sub, today)?,
        Some(("kpi", sub)) => kpi(store, settings, sub, today)?,
        _ => {}
    }
    Ok(())
}

/// Category totals for the window on `sub`, largest first.
pub fn category_report<S: RecordSource>(
    store: &mut TransactionStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<CategoryTotal>> {
    let kind = parse_kind(required_arg(sub, "type")?)?;
    let fallback = parse_category(required_arg(sub, "fallback")?)?;
    let window = window_from(sub, today)?;
    store.load(window)?;
    let totals = category_totals(store.records(), kind, Some(&window), fallback);
    Ok(sorted_by_total_desc(totals))
}

fn categories<S: RecordSource>(
    store: &mut TransactionStore<S>,
    settings: &Settings,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let totals = category_report(store, sub, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        return Ok(());
    }
    if totals.is_empty() {
        println!("No transactions in this range to chart.");
        return Ok(());
    }
    let data: Vec<Vec<String>> = totals
        .iter()
        .map(|t| vec![t.category.to_string(), fmt_amount(&t.total)])
        .collect();
    let hdr = format!("Total ({})", settings.currency_symbol);
    println!("{}", pretty_table(&["Category", &hdr], data));
    Ok(())
}

/// Loads the six trend months ending at `today` and buckets them.
pub fn trend_report<S: RecordSource>(
    store: &mut TransactionStore<S>,
    today: NaiveDate,
) -> Result<[MonthBucket; TREND_MONTHS]> {
    store.load(Window::trailing_months(today, TREND_MONTHS as u32))?;
    Ok(trend_series(store.records(), today))
}

fn trend<S: RecordSource>(
    store: &mut TransactionStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let buckets = trend_report(store, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        return Ok(());
    }
    println!("{}", trend_table(&buckets));
    Ok(())
}

pub(crate) fn trend_table(buckets: &[MonthBucket]) -> comfy_table::Table {
    let data: Vec<Vec<String>> = buckets
        .iter()
        .map(|b| {
            vec![
                format!("{} {}", b.label, b.month.year()),
                fmt_amount(&b.income),
                fmt_amount(&b.expense),
            ]
        })
        .collect();
    pretty_table(&["Month", "Income", "Expense"], data)
}

#[derive(Debug, Serialize)]
pub struct KpiReport {
    pub window: Window,
    pub days_elapsed: u32,
    pub kpis: KpiSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Box<KpiReport>>,
}

fn snapshot_for<S: RecordSource>(
    store: &mut TransactionStore<S>,
    window: Window,
    days_override: Option<u32>,
    today: NaiveDate,
) -> Result<KpiReport> {
    store.load(window)?;
    let days_elapsed = days_override.unwrap_or_else(|| window.days_elapsed(today));
    Ok(KpiReport {
        window,
        days_elapsed,
        kpis: kpi_snapshot(store.records(), Some(&window), days_elapsed),
        previous: None,
    })
}

/// KPI snapshot for the window on `sub`, plus the preceding period with `--compare`.
pub fn kpi_report<S: RecordSource>(
    store: &mut TransactionStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<KpiReport> {
    let window = window_from(sub, today)?;
    let days = sub.get_one::<u32>("days").copied();
    let mut report = snapshot_for(store, window, days, today)?;
    if sub.get_flag("compare") {
        let earlier = window
            .previous()
            .with_context(|| format!("No earlier period to compare with {}", window))?;
        let prev = snapshot_for(store, earlier, days, today)?;
        report.previous = Some(Box::new(prev));
    }
    Ok(report)
}

fn kpi<S: RecordSource>(
    store: &mut TransactionStore<S>,
    settings: &Settings,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let report = kpi_report(store, sub, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let symbol = &settings.currency_symbol;
    let current = report.kpis.cards(symbol);
    match &report.previous {
        None => {
            let data = current
                .into_iter()
                .map(|c| vec![c.label.to_string(), c.value])
                .collect();
            println!("{}", report.window);
            println!("{}", pretty_table(&["Metric", "Value"], data));
        }
        Some(prev) => {
            let data = current
                .into_iter()
                .zip(prev.kpis.cards(symbol))
                .map(|(c, p)| vec![c.label.to_string(), c.value, p.value])
                .collect();
            let now_hdr = report.window.to_string();
            let prev_hdr = prev.window.to_string();
            println!(
                "{}",
                pretty_table(&["Metric", now_hdr.as_str(), prev_hdr.as_str()], data)
            );
        }
    }
    Ok(())
}
