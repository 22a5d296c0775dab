// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Whether a record adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(RecordKind::Income),
            "expense" => Ok(RecordKind::Expense),
            other => Err(format!("Unknown record type '{}', expected income|expense", other)),
        }
    }
}

/// Closed set of recognized category labels.
///
/// Expense and income labels are disjoint apart from [`Category::Other`],
/// which is the fallback for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Healthcare,
    Salary,
    Freelance,
    Investments,
    Gift,
    Other,
}

pub const EXPENSE_CATEGORIES: [Category; 6] = [
    Category::Food,
    Category::Transport,
    Category::Utilities,
    Category::Entertainment,
    Category::Healthcare,
    Category::Other,
];

pub const INCOME_CATEGORIES: [Category; 5] = [
    Category::Salary,
    Category::Freelance,
    Category::Investments,
    Category::Gift,
    Category::Other,
];

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investments => "Investments",
            Category::Gift => "Gift",
            Category::Other => "Other",
        }
    }

    /// Labels a record of `kind` may carry.
    pub fn for_kind(kind: RecordKind) -> &'static [Category] {
        match kind {
            RecordKind::Expense => &EXPENSE_CATEGORIES,
            RecordKind::Income => &INCOME_CATEGORIES,
        }
    }

    pub fn allows(&self, kind: RecordKind) -> bool {
        Category::for_kind(kind).contains(self)
    }

    /// Parses a stored label, mapping anything unrecognized to `Other`.
    pub fn from_label_lossy(label: &str) -> Category {
        label.parse().unwrap_or_else(|_| {
            tracing::warn!(label, "unrecognized category label, using Other");
            Category::Other
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EXPENSE_CATEGORIES
            .iter()
            .chain(INCOME_CATEGORIES.iter())
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| format!("Unknown category '{}'", wanted))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

/// A single income or expense event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub amount: Decimal,
    pub category: Option<Category>,
    pub occurred_at: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl Record {
    pub fn to_new(&self) -> NewRecord {
        NewRecord {
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            occurred_at: self.occurred_at,
            note: self.note.clone(),
        }
    }
}

/// Everything needed to create a record except the generated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub amount: Decimal,
    pub category: Option<Category>,
    pub occurred_at: NaiveDate,
    pub note: Option<String>,
}

impl NewRecord {
    pub fn validate(&self) -> Result<(), SourceError> {
        validate_fields(self.kind, self.amount, self.category)
    }
}

/// Partial edit applied to an existing record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub kind: Option<RecordKind>,
    pub amount: Option<Decimal>,
    pub category: Option<Option<Category>>,
    pub occurred_at: Option<NaiveDate>,
    pub note: Option<Option<String>>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == RecordPatch::default()
    }

    /// Returns `record` with every set field replaced. The result is validated.
    pub fn apply(&self, record: &Record) -> Result<Record, SourceError> {
        let mut out = record.clone();
        if let Some(kind) = self.kind {
            out.kind = kind;
        }
        if let Some(amount) = self.amount {
            out.amount = amount;
        }
        if let Some(category) = self.category {
            out.category = category;
        }
        if let Some(date) = self.occurred_at {
            out.occurred_at = date;
        }
        if let Some(note) = &self.note {
            out.note = note.clone();
        }
        validate_fields(out.kind, out.amount, out.category)?;
        Ok(out)
    }
}

fn validate_fields(
    kind: RecordKind,
    amount: Decimal,
    category: Option<Category>,
) -> Result<(), SourceError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SourceError::Invalid(format!(
            "amount {} must not be negative",
            amount
        )));
    }
    if amount.normalize().scale() > 2 {
        return Err(SourceError::Invalid(format!(
            "amount {} has more than two decimal places",
            amount
        )));
    }
    if let Some(cat) = category {
        if !cat.allows(kind) {
            return Err(SourceError::Invalid(format!(
                "category '{}' is not valid for {} records",
                cat, kind
            )));
        }
    }
    Ok(())
}
