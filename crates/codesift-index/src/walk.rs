//! Index building from directory trees

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use codesift_core::limits::DEFAULT_MAX_FILE_SIZE;
use codesift_core::Config;
use ignore::{DirEntry, WalkBuilder};

use crate::error::{IndexError, IndexResult};
use crate::trigram::TrigramIndex;

/// Bytes inspected when deciding whether a file is binary
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Walks one or more roots and builds a [`TrigramIndex`]
pub struct IndexBuilder {
    roots: Vec<PathBuf>,
    exclude: Vec<PathBuf>,
    max_file_size: u64,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            exclude: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Roots, exclusions and size limit taken from `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .roots(config.roots.iter().cloned())
            .excludes(config.exclude.iter().cloned())
            .max_file_size(config.max_file_size)
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.roots.extend(roots);
        self
    }

    /// Skip every path under `path`
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude.push(path.into());
        self
    }

    pub fn excludes(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.exclude.extend(paths);
        self
    }

    pub fn max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn build(self) -> IndexResult<TrigramIndex> {
        if self.roots.is_empty() {
            return Err(IndexError::NoRoots);
        }
        let mut index = TrigramIndex::new(self.roots.clone());

        for root in &self.roots {
            if !root.exists() {
                return Err(IndexError::RootNotFound(root.clone()));
            }
            tracing::info!("Indexing {}", root.display());

            let exclude = self.exclude.clone();
            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .follow_links(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .filter_entry(move |entry| keep_entry(entry, &exclude))
                .build();

            for entry in walker {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!("Walk error: {}", e);
                        continue;
                    }
                };
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                self.add_file(&mut index, entry.path());
            }
        }

        tracing::info!(
            "Indexed {} files ({} distinct trigrams)",
            index.files().len(),
            index.trigram_count()
        );
        Ok(index)
    }

    fn add_file(&self, index: &mut TrigramIndex, path: &Path) {
        if path.to_str().is_none() {
            tracing::warn!("Skipping non UTF-8 path: {}", path.display());
            return;
        }
        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!("{}: {}", path.display(), e);
                return;
            }
        };
        if size > self.max_file_size {
            tracing::debug!("Skipping {} ({} bytes)", path.display(), size);
            return;
        }

        let mut contents = Vec::with_capacity(size as usize);
        if let Err(e) = fs::File::open(path).and_then(|mut f| f.read_to_end(&mut contents)) {
            tracing::warn!("{}: {}", path.display(), e);
            return;
        }
        if is_binary(&contents) {
            tracing::debug!("Skipping binary file {}", path.display());
            return;
        }
        index.insert(path.to_path_buf(), &contents);
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Skip hidden, editor backup and lock files, and excluded paths
fn keep_entry(entry: &DirEntry, exclude: &[PathBuf]) -> bool {
    if entry.depth() > 0 {
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with(['.', '#', '~']) || name.ends_with('~') {
                return false;
            }
        }
    }
    !exclude.iter().any(|ex| entry.path().starts_with(ex))
}

fn is_binary(contents: &[u8]) -> bool {
    contents[..contents.len().min(BINARY_SNIFF_LEN)].contains(&0)
}
