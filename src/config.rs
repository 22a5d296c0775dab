// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User settings, stored as JSON in the platform config directory.
//!
//! `SPENDSCOPE_*` environment variables override the file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::db::project_dirs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Remote,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Local => "local",
            Backend::Remote => "remote",
        })
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "remote" => Ok(Backend::Remote),
            other => bail!("Unknown backend '{}', expected local|remote", other),
        }
    }
}

/// Connection details for the hosted backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Session token issued by the auth provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
    #[serde(default)]
    pub remote: RemoteSettings,
}

fn default_currency() -> String {
    "₱".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            currency_symbol: default_currency(),
            remote: RemoteSettings::default(),
        }
    }
}

pub const SETTING_KEYS: [&str; 6] = [
    "backend",
    "currency_symbol",
    "remote.api_url",
    "remote.api_key",
    "remote.access_token",
    "remote.user_id",
];

pub fn config_path() -> Result<PathBuf> {
    let proj = project_dirs()?;
    Ok(proj.config_dir().join("config.json"))
}

/// Settings from the default file with environment overrides applied.
pub fn load() -> Result<Settings> {
    let mut settings = Settings::load_from(&config_path()?)?;
    settings.apply_env(|k| std::env::var(k).ok())?;
    Ok(settings)
}

impl Settings {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Read config at {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Parse config at {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config dir")?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Write config at {}", path.display()))
    }

    /// Applies `SPENDSCOPE_*` overrides looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SPENDSCOPE_BACKEND") {
            self.backend = v.parse()?;
        }
        if let Some(v) = lookup("SPENDSCOPE_CURRENCY") {
            self.currency_symbol = v;
        }
        let remote = &mut self.remote;
        for (var, slot) in [
            ("SPENDSCOPE_API_URL", &mut remote.api_url),
            ("SPENDSCOPE_API_KEY", &mut remote.api_key),
            ("SPENDSCOPE_ACCESS_TOKEN", &mut remote.access_token),
            ("SPENDSCOPE_USER_ID", &mut remote.user_id),
        ] {
            if let Some(v) = lookup(var) {
                *slot = Some(v);
            }
        }
        Ok(())
    }

    /// Sets one of [`SETTING_KEYS`]. An empty value clears optional fields.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let opt = || {
            let v = value.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        match key {
            "backend" => self.backend = value.parse()?,
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "remote.api_url" => self.remote.api_url = opt(),
            "remote.api_key" => self.remote.api_key = opt(),
            "remote.access_token" => self.remote.access_token = opt(),
            "remote.user_id" => self.remote.user_id = opt(),
            other => bail!(
                "Unknown setting '{}', expected one of {}",
                other,
                SETTING_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Key/value pairs for display, with secrets masked.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        let shown = |v: &Option<String>| v.clone().unwrap_or_default();
        let masked = |v: &Option<String>| match v {
            Some(s) if !s.is_empty() => "********".to_string(),
            _ => String::new(),
        };
        vec![
            vec!["backend".into(), self.backend.to_string()],
            vec!["currency_symbol".into(), self.currency_symbol.clone()],
            vec!["remote.api_url".into(), shown(&self.remote.api_url)],
            vec!["remote.api_key".into(), masked(&self.remote.api_key)],
            vec!["remote.access_token".into(), masked(&self.remote.access_token)],
            vec!["remote.user_id".into(), shown(&self.remote.user_id)],
        ]
    }
}
