//! Optional `jackc.toml` project configuration.
//!
//! Compiling a single file needs none of this — it only matters for a
//! directory build where the caller wants defaults instead of repeating
//! `--output`/`--verbose` on every invocation. Modeled directly on
//! `faxt::config::Config`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, Result};

pub const CONFIG_FILE_NAME: &str = "jackc.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub output_dir: Option<String>,

    #[serde(default)]
    pub keep_on_error: bool,
}

impl Config {
    /// Loads `jackc.toml` from the current directory if present, otherwise
    /// returns the defaults.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| DriverError::Config(format!("{}: {e}", path.display())))
    }
}
