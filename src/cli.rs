// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

/// `--month`, `--from/--to` and `--preset`; at most one form at a time.
fn window_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .help("Calendar month YYYY-MM (default: current month)")
            .conflicts_with_all(["from", "to", "preset"]),
    )
    .arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD"))
    .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD (inclusive)"))
    .arg(
        Arg::new("preset")
            .long("preset")
            .help("last-7-days | this-quarter | year-to-date | month-to-date")
            .conflicts_with_all(["from", "to"]),
    )
}

fn record_field_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .required(required)
            .help("income | expense"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(required)
            .help("Positive amount, at most two decimals"),
    )
    .arg(Arg::new("category").long("category").help("Category label"))
    .arg(
        Arg::new("date")
            .long("date")
            .help("Date the transaction happened YYYY-MM-DD (default: today)"),
    )
    .arg(Arg::new("note").long("note").help("Free-text note"))
}

pub fn build_cli() -> Command {
    Command::new("spendscope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track income and expenses; report categories, trends, and KPIs")
        .arg(
            Arg::new("as-of")
                .long("as-of")
                .global(true)
                .help("Treat this date (YYYY-MM-DD) as today"),
        )
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(record_field_args(
                    Command::new("add").about("Record a transaction"),
                    true,
                ))
                .subcommand(json_args(window_args(
                    Command::new("list")
                        .about("List transactions in a window")
                        .arg(Arg::new("type").long("type").help("income | expense"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .help("Case-insensitive text to find in notes"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )))
                .subcommand(
                    record_field_args(
                        Command::new("edit")
                            .about("Change fields of a transaction")
                            .arg(Arg::new("id").required(true)),
                        false,
                    )
                    .arg(
                        Arg::new("clear-category")
                            .long("clear-category")
                            .action(ArgAction::SetTrue)
                            .conflicts_with("category"),
                    )
                    .arg(
                        Arg::new("clear-note")
                            .long("clear-note")
                            .action(ArgAction::SetTrue)
                            .conflicts_with("note"),
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views")
                .subcommand(json_args(window_args(
                    Command::new("categories")
                        .about("Totals per category")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("income | expense"),
                        )
                        .arg(
                            Arg::new("fallback")
                                .long("fallback")
                                .default_value("Other")
                                .help("Category for uncategorized transactions"),
                        ),
                )))
                .subcommand(json_args(
                    Command::new("trend").about("Income and expense for the last six months"),
                ))
                .subcommand(json_args(window_args(
                    Command::new("kpi")
                        .about("Snapshot metrics")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(u32))
                                .help("Days elapsed for the daily average"),
                        )
                        .arg(
                            Arg::new("compare")
                                .long("compare")
                                .action(ArgAction::SetTrue)
                                .help("Also show the preceding period of equal length"),
                        ),
                ))),
        )
        .subcommand(
            Command::new("dashboard")
                .about("This month's KPIs, categories, trend, and recent activity")
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("categories")
                .about("Recognized category labels")
                .arg(Arg::new("type").long("type").help("income | expense")),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(window_args(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            )),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
