// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor host configuration.
//!
//! Stored as RON. Every field has a default, so a partial or missing file is
//! fine.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "autoflow.ron";

fn default_log_filter() -> String {
    "autoflow_editor_app=info,autoflow_editor_graph=info".to_string()
}

fn default_autosave() -> bool {
    true
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_pretty_json() -> bool {
    true
}

fn default_initial_zoom() -> f32 {
    1.0
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Save a snapshot after every graph change
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    /// Where snapshots are written
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Indent JSON output
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
    /// Zoom factor the viewport starts at
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            autosave: default_autosave(),
            snapshot_dir: default_snapshot_dir(),
            pretty_json: default_pretty_json(),
            initial_zoom: default_initial_zoom(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a RON file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::io(path, e)),
        };
        ron::from_str(&content).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration as pretty RON
    pub fn save(&self, path: &Path) -> Result<()> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| AppError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| AppError::io(path, e))?;
        tracing::info!("Saved editor config to {:?}", path);
        Ok(())
    }
}
