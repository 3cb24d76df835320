//! Configuration loading
//!
//! Endura keeps its state under `~/.endura/` by default; a small TOML
//! config file can point the database somewhere else. CLI flags override
//! the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the SQLite database lives
    pub db_path: PathBuf,
}

/// On-disk shape of `~/.endura/config.toml`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    db_path: Option<PathBuf>,
}

impl Config {
    /// Global data directory (`~/.endura`)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".endura")
    }

    fn default_db_path() -> PathBuf {
        Self::data_dir().join("endura.db")
    }

    fn default_config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load configuration, applying precedence: explicit `--db` flag, then
    /// the config file, then the default location. A missing config file
    /// is fine; a malformed one is an error.
    pub fn load(config_path: Option<&Path>, db_override: Option<&Path>) -> Result<Self> {
        if let Some(db) = db_override {
            return Ok(Self {
                db_path: db.to_path_buf(),
            });
        }

        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        let file = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str::<ConfigFile>(&raw)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        Ok(Self {
            db_path: file.db_path.unwrap_or_else(Self::default_db_path),
        })
    }
}
