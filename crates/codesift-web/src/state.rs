//! Shared server state

use std::path::{Path, PathBuf};

use codesift_core::Config;
use codesift_index::{IndexResult, IndexSnapshot, SnapshotHandle, TrigramIndex};
use tokio::sync::Mutex;

/// State shared by every request
pub struct AppState {
    config: Config,
    snapshot: SnapshotHandle,
    /// Serializes reindex requests; searches never wait on it
    reindex_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config, snapshot: IndexSnapshot) -> Self {
        Self {
            config,
            snapshot: SnapshotHandle::new(snapshot),
            reindex_lock: Mutex::new(()),
        }
    }

    /// Open the index described by `config` and wrap it in server state
    pub fn open(config: Config) -> IndexResult<Self> {
        let snapshot = IndexSnapshot::open(&config)?;
        Ok(Self::new(config, snapshot))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> &SnapshotHandle {
        &self.snapshot
    }

    pub fn reindex_lock(&self) -> &Mutex<()> {
        &self.reindex_lock
    }

    /// Rebuild the index from the configured roots and publish it
    ///
    /// Blocking; call from a blocking task.
    pub fn reindex(&self) -> IndexResult<ReindexSummary> {
        let snapshot = IndexSnapshot::rebuild(&self.config)?;
        let summary = ReindexSummary::of(snapshot.index());
        self.snapshot.replace(snapshot);
        Ok(summary)
    }

    /// Map a client-supplied path back to an indexed path
    ///
    /// Relative paths are taken relative to the display prefix. Paths that
    /// are not in the current index resolve to `None`.
    pub fn resolve_indexed_path(&self, path: &Path) -> Option<PathBuf> {
        let full = match &self.config.strip_prefix {
            Some(prefix) if path.is_relative() => prefix.join(path),
            _ => path.to_path_buf(),
        };
        let snapshot = self.snapshot.load();
        snapshot
            .corpus()
            .iter()
            .any(|c| Path::new(c.path()) == full)
            .then_some(full)
    }
}

/// Counts reported after a reindex
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReindexSummary {
    pub files: usize,
    pub trigrams: usize,
}

impl ReindexSummary {
    fn of(index: &TrigramIndex) -> Self {
        Self {
            files: index.files().len(),
            trigrams: index.trigram_count(),
        }
    }
}
