// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, Record, RecordKind};
use crate::utils::fmt_money;
use crate::window::{Window, YearMonth};

pub const TREND_MONTHS: usize = 6;

pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

fn in_window(record: &Record, window: Option<&Window>) -> bool {
    window.is_none_or(|w| w.contains(record.occurred_at))
}

/// Uncategorized records land under `fallback`. Groups keep first-occurrence order.
pub fn category_totals(
    records: &[Record],
    kind: RecordKind,
    window: Option<&Window>,
    fallback: Category,
) -> Vec<CategoryTotal> {
    let mut out: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<Category, usize> = HashMap::new();
    for r in records
        .iter()
        .filter(|r| r.kind == kind && in_window(r, window))
    {
        let cat = r.category.unwrap_or(fallback);
        match index.get(&cat).copied() {
            Some(i) => out[i].total += r.amount,
            None => {
                index.insert(cat, out.len());
                out.push(CategoryTotal {
                    category: cat,
                    total: r.amount,
                });
            }
        }
    }
    out
}

pub fn sorted_by_total_desc(mut totals: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub label: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Oldest month first, ending with the month of `today`.
pub fn trend_series(records: &[Record], today: NaiveDate) -> [MonthBucket; TREND_MONTHS] {
    let current = YearMonth::of(today);
    let first = current.shift(-(TREND_MONTHS as i32 - 1));
    let mut buckets: [MonthBucket; TREND_MONTHS] = std::array::from_fn(|i| {
        let month = first.shift(i as i32);
        MonthBucket {
            month,
            label: month.short_label(),
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        }
    });
    for r in records {
        let offset = YearMonth::of(r.occurred_at).months_since(first);
        if !(0..TREND_MONTHS as i32).contains(&offset) {
            continue;
        }
        let bucket = &mut buckets[offset as usize];
        match r.kind {
            RecordKind::Income => bucket.income += r.amount,
            RecordKind::Expense => bucket.expense += r.amount,
        }
    }
    buckets
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_spent: Decimal,
    pub total_income: Decimal,
    pub net_balance: Decimal,
    pub average_daily_spend: Decimal,
    pub transaction_count: usize,
    /// Reserved for offline sync; always zero.
    pub unsynced_queue: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

pub fn kpi_snapshot(records: &[Record], window: Option<&Window>, days_elapsed: u32) -> KpiSnapshot {
    let mut total_spent = Decimal::ZERO;
    let mut total_income = Decimal::ZERO;
    let mut transaction_count = 0;
    for r in records.iter().filter(|r| in_window(r, window)) {
        match r.kind {
            RecordKind::Income => total_income += r.amount,
            RecordKind::Expense => total_spent += r.amount,
        }
        transaction_count += 1;
    }
    let average_daily_spend = if days_elapsed == 0 {
        Decimal::ZERO
    } else {
        total_spent / Decimal::from(days_elapsed)
    };
    KpiSnapshot {
        total_spent,
        total_income,
        net_balance: total_income - total_spent,
        average_daily_spend,
        transaction_count,
        unsynced_queue: 0,
    }
}

impl KpiSnapshot {
    pub fn cards(&self, symbol: &str) -> Vec<KpiCard> {
        vec![
            KpiCard {
                label: "Total Spent",
                value: fmt_money(&self.total_spent, symbol),
            },
            KpiCard {
                label: "Total Income",
                value: fmt_money(&self.total_income, symbol),
            },
            KpiCard {
                label: "Net Balance",
                value: fmt_money(&self.net_balance, symbol),
            },
            KpiCard {
                label: "Average Daily Spend",
                value: fmt_money(&self.average_daily_spend, symbol),
            },
            KpiCard {
                label: "Transactions",
                value: self.transaction_count.to_string(),
            },
            KpiCard {
                label: "Unsynced Queue",
                value: self.unsynced_queue.to_string(),
            },
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub kind: Option<RecordKind>,
    pub category: Option<Category>,
    /// Case-insensitive substring of the note.
    pub search: Option<String>,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        if self.kind.is_some_and(|k| k != record.kind) {
            return false;
        }
        if self.category.is_some() && self.category != record.category {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => record
                .note
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&term.to_lowercase())),
        }
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

pub fn recent_activity(records: &[Record], limit: usize) -> Vec<&Record> {
    let mut out: Vec<&Record> = records.iter().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out.truncate(limit);
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub month: YearMonth,
    pub kpis: KpiSnapshot,
    pub categories: Vec<CategoryTotal>,
    pub trend: [MonthBucket; TREND_MONTHS],
    pub recent: Vec<Record>,
}

impl Dashboard {
    /// KPIs and the category breakdown cover `today`'s month; the trend
    /// covers the six months ending with it.
    pub fn build(records: &[Record], today: NaiveDate) -> Self {
        let month = YearMonth::of(today);
        let window = Window::month(month);
        let in_month: Vec<Record> = records
            .iter()
            .filter(|r| window.contains(r.occurred_at))
            .cloned()
            .collect();
        Dashboard {
            month,
            kpis: kpi_snapshot(&in_month, None, window.days_elapsed(today)),
            categories: category_totals(&in_month, RecordKind::Expense, None, Category::Other),
            trend: trend_series(records, today),
            recent: recent_activity(&in_month, RECENT_ACTIVITY_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}
