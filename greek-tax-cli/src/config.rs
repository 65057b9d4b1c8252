//! Settings file for the `greek-tax` binary.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "greek-tax.db"
//!
//! [logging]
//! level = "info"
//! file = "greek-tax.log"
//! ```
//!
//! Every key is optional. Command-line flags override what the file says.

use std::path::{Path, PathBuf};

use greek_tax_core::db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "greek-tax.toml";

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "GREEK_TAX_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "greek-tax.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// EnvFilter directive; `RUST_LOG` applies when unset.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn from_toml(
        path: &Path,
        text: &str,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &text)
    }

    /// Loads the config file to use, or defaults when there is none.
    ///
    /// Resolution order:
    /// 1. `explicit` (from `--config`); it must exist.
    /// 2. `$GREEK_TAX_CONFIG`; it must exist.
    /// 3. `./greek-tax.toml`, if present.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.database.backend.clone(),
            connection_string: self.database.connection_string.clone(),
        }
    }
}
