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
use spendscope::{cli, commands, commands::transactions};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> TransactionStore<SqliteSource> {
    let source = SqliteSource::in_memory().unwrap();
    let rows = [
        (RecordKind::Expense, "10", Some(Category::Food), 1, Some("Lunch")),
        (RecordKind::Expense, "25.50", Some(Category::Transport), 2, None),
        (RecordKind::Income, "300", Some(Category::Salary), 3, Some("payday")),
        (RecordKind::Expense, "8", None, 4, Some("team lunch")),
    ];
    for (kind, amount, category, day, note) in rows {
        source
            .insert(&NewRecord {
                kind,
                amount: amount.parse().unwrap(),
                category,
                occurred_at: date(2025, 1, day),
                note: note.map(str::to_string),
            })
            .unwrap();
    }
    source
        .insert(&NewRecord {
            kind: RecordKind::Expense,
            amount: Decimal::new(99, 0),
            category: None,
            occurred_at: date(2024, 12, 31),
            note: None,
        })
        .unwrap();
    TransactionStore::new(source)
}

fn list_dates(store: &mut TransactionStore<SqliteSource>, args: &[&str]) -> Vec<NaiveDate> {
    let argv = ["spendscope", "tx", "list"].iter().chain(args).copied();
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    transactions::query_rows(store, list_m, date(2025, 1, 20))
        .unwrap()
        .iter()
        .map(|r| r.occurred_at)
        .collect()
}

#[test]
fn list_defaults_to_current_month_newest_first() {
    let mut store = setup();
    let dates = list_dates(&mut store, &[]);
    assert_eq!(
        dates,
        vec![date(2025, 1, 4), date(2025, 1, 3), date(2025, 1, 2), date(2025, 1, 1)]
    );
}

#[test]
fn list_limit_respected() {
    let mut store = setup();
    let dates = list_dates(&mut store, &["--limit", "2"]);
    assert_eq!(dates, vec![date(2025, 1, 4), date(2025, 1, 3)]);
}

#[test]
fn list_filters_by_type_category_and_search() {
    let mut store = setup();
    assert_eq!(list_dates(&mut store, &["--type", "income"]), vec![date(2025, 1, 3)]);
    assert_eq!(
        list_dates(&mut store, &["--category", "transport"]),
        vec![date(2025, 1, 2)]
    );
    assert_eq!(
        list_dates(&mut store, &["--search", "LUNCH"]),
        vec![date(2025, 1, 4), date(2025, 1, 1)]
    );
}

#[test]
fn list_accepts_explicit_range_and_month() {
    let mut store = setup();
    assert_eq!(
        list_dates(&mut store, &["--from", "2024-12-31", "--to", "2025-01-01"]),
        vec![date(2025, 1, 1), date(2024, 12, 31)]
    );
    assert_eq!(list_dates(&mut store, &["--month", "2024-12"]), vec![date(2024, 12, 31)]);
}

#[test]
fn list_rejects_half_open_range() {
    let mut store = setup();
    let matches = cli::build_cli().get_matches_from(["spendscope", "tx", "list", "--from", "2025-01-01"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let err = transactions::query_rows(&mut store, list_m, date(2025, 1, 20)).unwrap_err();
    assert!(err.to_string().contains("No valid date range"));
}

#[test]
fn add_edit_and_remove_through_cli() {
    let mut store = setup();
    let run = |store: &mut TransactionStore<SqliteSource>, argv: &[&str]| {
        let matches = cli::build_cli().get_matches_from(argv.iter().copied());
        let today = commands::today(&matches).unwrap();
        let (_, tx_m) = matches.subcommand().unwrap();
        transactions::handle(store, tx_m, today)
    };

    run(
        &mut store,
        &[
            "spendscope", "tx", "add", "--type", "expense", "--amount", "12.34", "--category",
            "utilities", "--as-of", "2025-01-15",
        ],
    )
    .unwrap();
    let added = store.records()[0].clone();
    assert_eq!(added.occurred_at, date(2025, 1, 15));
    assert_eq!(added.category, Some(Category::Utilities));

    let err = run(
        &mut store,
        &["spendscope", "tx", "add", "--type", "income", "--amount", "5", "--category", "Food"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("not valid for income"));

    run(
        &mut store,
        &["spendscope", "tx", "edit", added.id.as_str(), "--amount", "15", "--clear-category"],
    )
    .unwrap();
    let edited = store.source().get(&added.id).unwrap();
    assert_eq!(edited.amount, Decimal::new(15, 0));
    assert_eq!(edited.category, None);

    assert!(run(&mut store, &["spendscope", "tx", "edit", added.id.as_str()]).is_err());

    run(&mut store, &["spendscope", "tx", "rm", added.id.as_str()]).unwrap();
    assert!(store.source().get(&added.id).is_err());
    assert!(run(&mut store, &["spendscope", "tx", "rm", added.id.as_str()]).is_err());
}
