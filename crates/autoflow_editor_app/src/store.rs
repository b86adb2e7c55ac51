// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph files and snapshot persistence.

use crate::error::{AppError, Result};
use autoflow_editor_graph::Graph;
use std::path::{Path, PathBuf};

/// Snapshot file written inside the snapshot directory
pub const SNAPSHOT_FILE_NAME: &str = "workflow.json";

/// Something that accepts full graph snapshots
pub trait GraphStore {
    /// Persist a snapshot of `graph`
    fn save(&mut self, graph: &Graph) -> Result<()>;
}

/// Read and validate a graph from a JSON file
pub fn load_graph_file(path: &Path) -> Result<Graph> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let graph: Graph = serde_json::from_str(&content).map_err(|e| AppError::json(path, e))?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Read graph from {:?}",
        path
    );
    Ok(graph)
}

/// Serialize a value as JSON text
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(|e| AppError::Serialize(e.to_string()))
}

/// Writes snapshots to `<dir>/workflow.json`, replacing the file atomically
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    pretty: bool,
    saves: usize,
    last_ok: bool,
}

impl FileStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            dir: dir.into(),
            pretty,
            saves: 0,
            last_ok: false,
        }
    }

    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE_NAME)
    }

    /// Number of snapshots written so far
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Whether the most recent save attempt succeeded. False before the
    /// first attempt.
    pub fn last_ok(&self) -> bool {
        self.last_ok
    }

    fn write_snapshot(&self, graph: &Graph) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| AppError::io(&self.dir, e))?;

        let content = to_json(graph, self.pretty)?;
        let target = self.snapshot_path();
        let temp = self.dir.join(format!("{SNAPSHOT_FILE_NAME}.tmp"));
        std::fs::write(&temp, content).map_err(|e| AppError::io(&temp, e))?;
        std::fs::rename(&temp, &target).map_err(|e| AppError::io(&target, e))?;
        Ok(target)
    }
}

impl GraphStore for FileStore {
    fn save(&mut self, graph: &Graph) -> Result<()> {
        let written = self.write_snapshot(graph);
        self.last_ok = written.is_ok();
        let target = written?;

        self.saves += 1;
        tracing::debug!(saves = self.saves, "Saved snapshot to {:?}", target);
        Ok(())
    }
}
