// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use spendscope::store::TransactionStore;
use spendscope::{cli, commands, config, db, source, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = config::load()?;
    let today = commands::today(&matches)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            db::open_or_init()?;
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("config", sub)) => commands::config::handle(&settings, &config::config_path()?, sub)?,
        Some(("categories", sub)) => commands::categories::handle(sub)?,
        Some((name @ ("tx" | "report" | "dashboard" | "export"), sub)) => {
            let mut store = TransactionStore::new(source::open(&settings)?);
            match name {
                "tx" => commands::transactions::handle(&mut store, sub, today)?,
                "report" => commands::reports::handle(&mut store, &settings, sub, today)?,
                "dashboard" => commands::dashboard::handle(&mut store, &settings, sub, today)?,
                _ => commands::exporter::handle(&mut store, sub, today)?,
            }
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
