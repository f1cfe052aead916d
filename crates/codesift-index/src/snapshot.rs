//! Swappable index snapshots
//!
//! Searches load the current snapshot once and keep using it, so a reindex
//! that publishes a new snapshot never disturbs a search in flight.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use codesift_core::Corpus;

use crate::traits::CandidateIndex;
use crate::trigram::TrigramIndex;
#[cfg(feature = "redb")]
use crate::{error::IndexResult, redb::IndexStore, walk::IndexBuilder};
#[cfg(feature = "redb")]
use codesift_core::Config;

/// Content index together with the path corpus derived from it
#[derive(Debug)]
pub struct IndexSnapshot {
    index: TrigramIndex,
    corpus: Corpus,
}

impl IndexSnapshot {
    pub fn new(index: TrigramIndex) -> Self {
        Self::with_display_prefix(index, None)
    }

    /// Snapshot whose corpus hides `prefix` from path scoring
    pub fn with_display_prefix(index: TrigramIndex, prefix: Option<&Path>) -> Self {
        let corpus = Corpus::from_paths_under(index.paths(), prefix);
        Self { index, corpus }
    }

    pub fn index(&self) -> &TrigramIndex {
        &self.index
    }

    /// Indexed paths for fuzzy typeahead
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}

#[cfg(feature = "redb")]
impl IndexSnapshot {
    /// Walk the configured roots and store the result at `config.index_path`
    pub fn rebuild(config: &Config) -> IndexResult<Self> {
        let index = IndexBuilder::from_config(config).build()?;
        IndexStore::new(&config.index_path).save(&index)?;
        Ok(Self::with_display_prefix(index, config.strip_prefix.as_deref()))
    }

    /// Reuse the stored index when `config.skip_index` is set, else rebuild
    pub fn open(config: &Config) -> IndexResult<Self> {
        let store = IndexStore::new(&config.index_path);
        if config.skip_index && store.exists() {
            tracing::info!("Using existing index {}", store.path().display());
            let index = store.load()?;
            return Ok(Self::with_display_prefix(index, config.strip_prefix.as_deref()));
        }
        Self::rebuild(config)
    }
}

/// Shared handle to the current snapshot
#[derive(Debug)]
pub struct SnapshotHandle {
    inner: ArcSwap<IndexSnapshot>,
}

impl SnapshotHandle {
    pub fn new(snapshot: IndexSnapshot) -> Self {
        Self {
            inner: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn load(&self) -> Arc<IndexSnapshot> {
        self.inner.load_full()
    }

    /// Publish `snapshot`, returning the one it replaced
    pub fn replace(&self, snapshot: IndexSnapshot) -> Arc<IndexSnapshot> {
        let previous = self.inner.swap(Arc::new(snapshot));
        tracing::info!(
            "Swapped index snapshot ({} -> {} files)",
            previous.index.len(),
            self.inner.load().index.len()
        );
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn snapshot(files: &[&str]) -> IndexSnapshot {
        let mut index = TrigramIndex::new(Vec::new());
        for f in files {
            index.insert(PathBuf::from(f), b"contents");
        }
        IndexSnapshot::new(index)
    }

    #[test]
    fn test_corpus_follows_index() {
        let snap = snapshot(&["src/a.rs", "src/b.rs"]);
        assert_eq!(snap.corpus().len(), 2);
        assert_eq!(snap.corpus().get(1).unwrap().file_name(), "b.rs");
    }

    #[test]
    fn test_display_prefix_is_hidden() {
        let mut index = TrigramIndex::new(Vec::new());
        index.insert(PathBuf::from("/home/alice/repo/src/a.rs"), b"contents");
        let snap = IndexSnapshot::with_display_prefix(index, Some(Path::new("/home/alice/repo")));

        let candidate = snap.corpus().get(0).unwrap();
        assert_eq!(candidate.relative_path(), "src/a.rs");
        assert_eq!(candidate.path(), "/home/alice/repo/src/a.rs");
    }

    #[cfg(feature = "redb")]
    #[test]
    fn test_open_reuses_stored_index() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("a.rs"), "fn a() {}\n").unwrap();

        let mut config = Config {
            roots: vec![root.clone()],
            index_path: dir.path().join("index.redb"),
            ..Config::default()
        };
        assert_eq!(IndexSnapshot::open(&config).unwrap().index().len(), 1);

        std::fs::write(root.join("b.rs"), "fn b() {}\n").unwrap();
        config.skip_index = true;
        assert_eq!(IndexSnapshot::open(&config).unwrap().index().len(), 1);

        config.skip_index = false;
        assert_eq!(IndexSnapshot::open(&config).unwrap().corpus().len(), 2);
    }

    #[test]
    fn test_old_snapshot_survives_swap() {
        let handle = SnapshotHandle::new(snapshot(&["one"]));
        let held = handle.load();

        let previous = handle.replace(snapshot(&["one", "two", "three"]));
        assert_eq!(previous.index().len(), 1);
        assert_eq!(held.index().len(), 1);
        assert_eq!(handle.load().index().len(), 3);
    }
}
