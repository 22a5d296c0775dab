// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod config;
pub mod dashboard;
pub mod exporter;
pub mod reports;
pub mod transactions;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};

use crate::utils::{parse_date, parse_month};
use crate::window::{Preset, Window, WindowSpec, YearMonth};

/// `--as-of` from `m` or any nested subcommand, otherwise the local calendar date.
pub fn today(m: &clap::ArgMatches) -> Result<NaiveDate> {
    let mut as_of = m.get_one::<String>("as-of");
    let mut cur = m;
    while let Some((_, sub)) = cur.subcommand() {
        as_of = as_of.or_else(|| sub.get_one::<String>("as-of"));
        cur = sub;
    }
    match as_of {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// Resolves the window options on `m`; no options means the month of `today`.
pub fn window_from(m: &clap::ArgMatches, today: NaiveDate) -> Result<Window> {
    let selector = if let Some(month) = m.get_one::<String>("month") {
        WindowSpec::Month(parse_month(month)?)
    } else if let Some(preset) = m.get_one::<String>("preset") {
        WindowSpec::Preset(preset.parse::<Preset>().map_err(anyhow::Error::msg)?)
    } else {
        let from = m.get_one::<String>("from");
        let to = m.get_one::<String>("to");
        if from.is_none() && to.is_none() {
            return Ok(Window::month(YearMonth::of(today)));
        }
        WindowSpec::from_text(from.map(String::as_str), to.map(String::as_str))
    };
    match selector.resolve(today) {
        Some(w) => Ok(w),
        None => bail!("No valid date range: give both --from and --to as YYYY-MM-DD with from <= to"),
    }
}
