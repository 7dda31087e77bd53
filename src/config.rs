//! Application configuration.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::biography::WikidataConfig;
use crate::demographics::Demographics;
use crate::error::ConfigError;

/// Parameters for ancestry autocompletion.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Try the biography source before generating relatives.
    pub use_external_data: bool,

    /// Year treated as "now" when deciding whether someone is still alive.
    /// Defaults to the local calendar year.
    pub reference_year: Option<i32>,

    /// Assumed age of a focal person with no birth date (default: 30).
    pub default_age: i32,

    /// Maximum distance in years between a generated sibling and the focal person.
    pub sibling_year_spread: i32,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            use_external_data: true,
            reference_year: None,
            default_age: 30,
            sibling_year_spread: 5,
        }
    }
}

impl AutocompleteConfig {
    pub fn current_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

/// Top-level configuration, read from a JSON file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub autocomplete: AutocompleteConfig,
    pub wikidata: WikidataConfig,
    /// Directory holding a `demographics.json` that overrides the built-in tables.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read `path`, or return defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    pub fn demographics(&self) -> Demographics {
        match &self.data_dir {
            Some(dir) => Demographics::load_from(dir),
            None => Demographics::defaults(),
        }
    }
}
