// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month key (YYYY-MM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.shift(1)
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn shift(&self, months: i32) -> Self {
        let idx = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: idx.div_euclid(12),
            month: idx.rem_euclid(12) as u32 + 1,
        }
    }

    /// Number of months from `earlier` to `self`.
    pub fn months_since(&self, earlier: YearMonth) -> i32 {
        (self.year - earlier.year) * 12 + self.month as i32 - earlier.month as i32
    }

    /// Three-letter English abbreviation, e.g. "Jun".
    pub fn short_label(&self) -> &'static str {
        MONTH_ABBR[(self.month - 1) as usize]
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| format!("Invalid month '{}', expected YYYY-MM", s))?;
        Ok(Self::of(date))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// An inclusive date interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn month(month: YearMonth) -> Self {
        Self {
            start: month.first_day(),
            end: month.last_day(),
        }
    }

    pub fn trailing_months(today: NaiveDate, months: u32) -> Self {
        let current = YearMonth::of(today);
        let first = current.shift(-(months.max(1) as i32 - 1));
        Self {
            start: first.first_day(),
            end: current.last_day(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    /// Days passed as of `today`, counting today. Zero before the start.
    pub fn days_elapsed(&self, today: NaiveDate) -> u32 {
        if today < self.start {
            0
        } else if today > self.end {
            self.days()
        } else {
            ((today - self.start).num_days() + 1) as u32
        }
    }

    /// The window of equal length that ends the day before this one starts,
    /// or `None` when it would fall before the earliest representable date.
    pub fn previous(&self) -> Option<Self> {
        let end = self.start.pred_opt()?;
        let start = self
            .start
            .checked_sub_signed(Duration::days(self.days() as i64))?;
        Some(Self { start, end })
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Last7Days,
    ThisQuarter,
    YearToDate,
    MonthToDate,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Last7Days,
        Preset::ThisQuarter,
        Preset::YearToDate,
        Preset::MonthToDate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Last7Days => "last-7-days",
            Preset::ThisQuarter => "this-quarter",
            Preset::YearToDate => "year-to-date",
            Preset::MonthToDate => "month-to-date",
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> Window {
        let start = match self {
            Preset::Last7Days => today
                .checked_sub_signed(Duration::days(6))
                .unwrap_or(NaiveDate::MIN),
            Preset::ThisQuarter => {
                let quarter_month = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), quarter_month, 1).unwrap_or(today)
            }
            Preset::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            Preset::MonthToDate => YearMonth::of(today).first_day(),
        };
        Window { start, end: today }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Preset::ALL
            .iter()
            .find(|p| p.name() == wanted)
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
                format!("Unknown preset '{}', expected one of {}", s, names.join("|"))
            })
    }
}

/// What the user picked; resolved against a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSpec {
    Preset(Preset),
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Month(YearMonth),
}

impl WindowSpec {
    // unparseable dates count as missing
    pub fn from_text(start: Option<&str>, end: Option<&str>) -> Self {
        let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok();
        WindowSpec::Range {
            start: start.and_then(parse),
            end: end.and_then(parse),
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> Option<Window> {
        match self {
            WindowSpec::Preset(p) => Some(p.resolve(today)),
            WindowSpec::Range {
                start: Some(start),
                end: Some(end),
            } => Window::new(*start, *end),
            WindowSpec::Range { .. } => None,
            WindowSpec::Month(m) => Some(Window::month(*m)),
        }
    }
}
