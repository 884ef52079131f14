//! Settings for the `kassa` binary, read from `kassa.toml`.
//!
//! Lookup order: `--config`, `./kassa.toml`, the platform config directory.
//! A missing file means built-in defaults; a malformed one is an error.

use anyhow::Context;
use directories::ProjectDirs;
use kassa_core::query::DEFAULT_STATE;
use kassa_import::rates::DEFAULT_BASE_URL;
use kassa_import::CsvOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "kassa.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_status: String,
    pub categories: Vec<String>,
    pub log_filter: String,
    pub csv: CsvSettings,
    pub rates: RateSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateSettings {
    pub base_url: String,
    pub api_key_env: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_status: DEFAULT_STATE.to_string(),
            categories: Vec::new(),
            log_filter: "kassa=info,kassa_import=info".to_string(),
            csv: CsvSettings::default(),
            rates: RateSettings::default(),
        }
    }
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "EXCHANGE_RATE_API_KEY".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Returns the settings and the file they came from, if any.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_locations().into_iter().find(|p| p.is_file()),
        };
        let Some(path) = path else {
            return Ok((Self::default(), None));
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("failed to parse settings in {}", path.display()))?;
        Ok((settings, Some(path)))
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            delimiter: self.csv.delimiter.as_deref().and_then(|d| d.bytes().next()),
        }
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.rates.api_key_env).ok()
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(FILE_NAME)];
    if let Some(dirs) = ProjectDirs::from("com", "kassa", "Kassa") {
        locations.push(dirs.config_dir().join(FILE_NAME));
    }
    locations
}
