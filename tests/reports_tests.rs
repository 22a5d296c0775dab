// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendscope::models::{Category, NewRecord, RecordKind};
use spendscope::source::{RecordSource, SqliteSource};
use spendscope::store::TransactionStore;
use spendscope::{cli, commands::categories, commands::dashboard, commands::reports};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn store() -> TransactionStore<SqliteSource> {
    let source = SqliteSource::in_memory().unwrap();
    let rows = [
        (RecordKind::Expense, "100", Some(Category::Food), date(2024, 6, 5)),
        (RecordKind::Expense, "30", Some(Category::Transport), date(2024, 6, 8)),
        (RecordKind::Expense, "20", None, date(2024, 6, 9)),
        (RecordKind::Income, "500", None, date(2024, 6, 10)),
        (RecordKind::Expense, "60", Some(Category::Food), date(2024, 5, 20)),
        (RecordKind::Income, "250", Some(Category::Freelance), date(2024, 3, 2)),
    ];
    for (kind, amount, category, occurred_at) in rows {
        source
            .insert(&NewRecord {
                kind,
                amount: dec(amount),
                category,
                occurred_at,
                note: None,
            })
            .unwrap();
    }
    TransactionStore::new(source)
}

fn report_matches(args: &[&str]) -> clap::ArgMatches {
    let argv = ["spendscope", "report"].iter().chain(args).copied();
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, report_m) = matches.subcommand().unwrap();
    let (_, sub) = report_m.subcommand().unwrap();
    sub.clone()
}

#[test]
fn category_report_sorts_largest_first() {
    let mut store = store();
    let sub = report_matches(&["categories", "--month", "2024-06"]);
    let totals = reports::category_report(&mut store, &sub, date(2024, 6, 15)).unwrap();
    let got: Vec<(Category, Decimal)> = totals.iter().map(|t| (t.category, t.total)).collect();
    assert_eq!(
        got,
        vec![
            (Category::Food, dec("100")),
            (Category::Transport, dec("30")),
            (Category::Other, dec("20")),
        ]
    );
}

#[test]
fn income_category_report_groups_uncategorized() {
    let mut store = store();
    let sub = report_matches(&["categories", "--type", "income", "--preset", "year-to-date"]);
    let totals = reports::category_report(&mut store, &sub, date(2024, 6, 15)).unwrap();
    assert_eq!(totals[0].category, Category::Other);
    assert_eq!(totals[0].total, dec("500"));
    assert_eq!(totals[1].category, Category::Freelance);
}

#[test]
fn kpi_report_with_previous_period() {
    let mut store = store();
    let sub = report_matches(&["kpi", "--month", "2024-06", "--compare"]);
    let report = reports::kpi_report(&mut store, &sub, date(2024, 6, 15)).unwrap();
    assert_eq!(report.days_elapsed, 15);
    assert_eq!(report.kpis.total_spent, dec("150"));
    assert_eq!(report.kpis.net_balance, dec("350"));
    assert_eq!(report.kpis.average_daily_spend, dec("10"));

    let prev = report.previous.as_ref().unwrap();
    assert_eq!(prev.window.start(), date(2024, 5, 2));
    assert_eq!(prev.window.end(), date(2024, 5, 31));
    assert_eq!(prev.kpis.total_spent, dec("60"));
    assert_eq!(prev.days_elapsed, 30);
}

#[test]
fn kpi_compare_fails_cleanly_at_the_earliest_date() {
    let mut store = store();
    let from = format!("--from={}", NaiveDate::MIN);
    let to = format!("--to={}", NaiveDate::MIN.succ_opt().unwrap());
    let sub = report_matches(&["kpi", from.as_str(), to.as_str(), "--compare"]);
    let err = reports::kpi_report(&mut store, &sub, date(2024, 6, 15)).unwrap_err();
    assert!(err.to_string().contains("No earlier period"));
}

#[test]
fn kpi_days_override() {
    let mut store = store();
    let sub = report_matches(&["kpi", "--month", "2024-06", "--days", "0"]);
    let report = reports::kpi_report(&mut store, &sub, date(2024, 6, 15)).unwrap();
    assert_eq!(report.kpis.average_daily_spend, Decimal::ZERO);
    assert!(report.previous.is_none());
}

#[test]
fn trend_report_covers_six_months() {
    let mut store = store();
    let buckets = reports::trend_report(&mut store, date(2024, 6, 15)).unwrap();
    let labels: Vec<&str> = buckets.iter().map(|b| b.label).collect();
    assert_eq!(labels, vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun"]);
    assert_eq!(buckets[2].income, dec("250"));
    assert_eq!(buckets[4].expense, dec("60"));
    assert_eq!((buckets[5].income, buckets[5].expense), (dec("500"), dec("150")));
}

#[test]
fn dashboard_uses_one_load_for_every_panel() {
    let mut store = store();
    let dash = dashboard::build(&mut store, date(2024, 6, 15)).unwrap();
    assert_eq!(dash.kpis.total_spent, dec("150"));
    assert_eq!(dash.kpis.transaction_count, 4);
    assert_eq!(dash.categories.len(), 3);
    assert_eq!(dash.trend[2].income, dec("250"));
    assert_eq!(dash.recent.len(), 4);
    assert_eq!(store.records().len(), 6);
}

#[test]
fn category_listing_per_kind() {
    let expense = categories::rows(Some(RecordKind::Expense));
    assert_eq!(expense.len(), 6);
    assert_eq!(expense[0], vec!["expense", "Food"]);
    let all = categories::rows(None);
    assert_eq!(all.len(), 11);
}
