// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::config::Settings;
use crate::utils::{pretty_table, required_arg};
use anyhow::Result;

/// `show` prints the effective settings; `set` edits only the file at `path`,
/// so environment overrides are never written back.
pub fn handle(settings: &Settings, path: &Path, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            println!("Config file: {}", path.display());
            println!(
                "{}",
                pretty_table(&["Setting", "Value"], settings.display_rows())
            );
        }
        Some(("set", sub)) => {
            let key = required_arg(sub, "key")?;
            let value = required_arg(sub, "value")?;
            let mut stored = Settings::load_from(path)?;
            stored.set(key, value)?;
            stored.save_to(path)?;
            println!("Set {}", key);
        }
        _ => {}
    }
    Ok(())
}
