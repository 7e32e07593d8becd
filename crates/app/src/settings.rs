//! Handles settings for the application.
//!
//! Sources, lowest priority first: `settings.toml` (or `--config <path>`),
//! `SETTLEUP__*` environment variables (e.g. `SETTLEUP__APP__LEVEL=debug`),
//! command-line overrides.
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the `settleup` and `engine` targets.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ledger {
    /// JSON snapshot holding participants, groups and events.
    pub path: PathBuf,
    /// Pretty-print JSON (snapshot and command output).
    pub pretty: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            path: PathBuf::from("settleup.json"),
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub ledger: Ledger,
}

impl Settings {
    pub fn new(config_path: Option<&str>, ledger_path: Option<PathBuf>) -> Result<Self> {
        let mut settings: Settings = config::Config::builder()
            .add_source(
                config::File::with_name(config_path.unwrap_or(DEFAULT_CONFIG_PATH))
                    .required(config_path.is_some()),
            )
            .add_source(config::Environment::with_prefix("SETTLEUP").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(path) = ledger_path {
            settings.ledger.path = path;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_file() {
        let settings = Settings::new(None, Some(PathBuf::from("/tmp/ledger.json"))).unwrap();
        assert_eq!(settings.ledger.path, PathBuf::from("/tmp/ledger.json"));
        assert!(!settings.app.level.is_empty());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        assert!(Settings::new(Some("/definitely/not/here.toml"), None).is_err());
    }
}
