//! # Configuration
//!
//! Vitrine configuration is loaded with [`confique`], layered in priority
//! order:
//!
//! 1. **Environment variables**: `VITRINE_DATA_FILE`, `VITRINE_REFRESH_INTERVAL_MS`,
//!    `VITRINE_LOG_FILTER`.
//! 2. **Config file**: `vitrine.toml` in the OS config directory (via the
//!    `directories` crate), or an explicit path.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_file` | `<data dir>/catalog.json` | Catalog document used by the CLI |
//! | `refresh_interval_ms` | `1500` | Minimum gap between unforced taxonomy refreshes |
//! | `log_filter` | `warn` | `tracing` filter used when `RUST_LOG` is unset |
//!
//! The product page size is fixed and has no setting.

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CatalogError, Result};

pub const CONFIG_FILE_NAME: &str = "vitrine.toml";
pub const DATA_FILE_NAME: &str = "catalog.json";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VitrineConfig {
    /// Catalog document path. When absent, `catalog.json` in the OS data dir.
    #[config(env = "VITRINE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Minimum interval between two unforced taxonomy refreshes, in ms.
    #[config(env = "VITRINE_REFRESH_INTERVAL_MS", default = 1500)]
    pub refresh_interval_ms: u64,

    #[config(env = "VITRINE_LOG_FILTER", default = "warn")]
    pub log_filter: String,
}

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            refresh_interval_ms: 1500,
            log_filter: "warn".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "vitrine")
}

/// `vitrine.toml` in the OS config directory, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl VitrineConfig {
    /// Loads environment over the default config file over defaults.
    pub fn load() -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = default_config_path() {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Loads environment over `path` over defaults. A missing file is not an
    /// error.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| CatalogError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolved catalog document path.
    pub fn data_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
            .ok_or_else(|| {
                CatalogError::Config(
                    "No data directory on this platform; set data_file or VITRINE_DATA_FILE"
                        .to_string(),
                )
            })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
