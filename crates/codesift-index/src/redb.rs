//! ReDB persistence for the trigram index
//!
//! An index is written to a temporary file next to its destination and
//! renamed into place, so readers never observe a partially written index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{IndexError, IndexResult};
use crate::traits::FileId;
use crate::trigram::TrigramIndex;

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

// Table definitions
const META: TableDefinition<&str, &str> = TableDefinition::new("meta");
const FILES: TableDefinition<u32, &str> = TableDefinition::new("files");
const POSTINGS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("postings");

const KEY_SCHEMA_VERSION: &str = "schema_version";
const KEY_ROOTS: &str = "roots";
const KEY_BUILT_AT: &str = "built_at";

/// On-disk location of a persisted index
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persist `index`, replacing any existing file
    pub fn save(&self, index: &TrigramIndex) -> IndexResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("redb.tmp");
        match std::fs::remove_file(&tmp) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        {
            let db = Database::create(&tmp)?;
            let write_txn = db.begin_write()?;
            {
                let roots = serde_json::to_string(index.roots())?;
                let built_at = index.built_at().to_rfc3339();
                let version = SCHEMA_VERSION.to_string();
                let mut meta = write_txn.open_table(META)?;
                meta.insert(KEY_SCHEMA_VERSION, version.as_str())?;
                meta.insert(KEY_ROOTS, roots.as_str())?;
                meta.insert(KEY_BUILT_AT, built_at.as_str())?;

                let mut files = write_txn.open_table(FILES)?;
                for (id, path) in index.files().iter().enumerate() {
                    let text = path.to_str().ok_or_else(|| {
                        IndexError::Corrupt(format!("non UTF-8 path: {}", path.display()))
                    })?;
                    files.insert(id as u32, text)?;
                }

                let mut postings = write_txn.open_table(POSTINGS)?;
                for (trigram, ids) in index.postings() {
                    let encoded = encode_ids(ids);
                    postings.insert(trigram.as_slice(), encoded.as_slice())?;
                }
            }
            write_txn.commit()?;
        }

        std::fs::rename(&tmp, &self.path)?;
        tracing::info!(
            "Saved index with {} files to {}",
            index.files().len(),
            self.path.display()
        );
        Ok(())
    }

    /// Load a previously saved index
    pub fn load(&self) -> IndexResult<TrigramIndex> {
        if !self.exists() {
            return Err(IndexError::NotFound(self.path.clone()));
        }
        let db = Database::open(&self.path)?;
        let read_txn = db.begin_read()?;

        let meta = read_txn.open_table(META)?;
        let read_meta = |key: &str| -> IndexResult<String> {
            meta.get(key)?
                .map(|v| v.value().to_string())
                .ok_or_else(|| IndexError::Corrupt(format!("missing metadata key {}", key)))
        };
        let found: u32 = read_meta(KEY_SCHEMA_VERSION)?
            .parse()
            .map_err(|_| IndexError::Corrupt("bad schema version".to_string()))?;
        if found != SCHEMA_VERSION {
            return Err(IndexError::SchemaMismatch {
                found,
                expected: SCHEMA_VERSION,
            });
        }
        let roots: Vec<PathBuf> = serde_json::from_str(&read_meta(KEY_ROOTS)?)?;
        let built_at = DateTime::parse_from_rfc3339(&read_meta(KEY_BUILT_AT)?)
            .map_err(|e| IndexError::Corrupt(e.to_string()))?
            .with_timezone(&Utc);

        let table = read_txn.open_table(FILES)?;
        let mut files = Vec::new();
        for entry in table.iter()? {
            let (id, path) = entry?;
            if id.value() as usize != files.len() {
                return Err(IndexError::Corrupt(format!("file id gap at {}", id.value())));
            }
            files.push(PathBuf::from(path.value()));
        }

        let table = read_txn.open_table(POSTINGS)?;
        let mut postings = HashMap::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let trigram: [u8; 3] = key
                .value()
                .try_into()
                .map_err(|_| IndexError::Corrupt("bad trigram key".to_string()))?;
            postings.insert(trigram, decode_ids(value.value())?);
        }

        tracing::debug!(
            "Loaded index with {} files, {} trigrams from {}",
            files.len(),
            postings.len(),
            self.path.display()
        );
        Ok(TrigramIndex::from_parts(roots, files, postings, built_at))
    }
}

fn encode_ids(ids: &[FileId]) -> Vec<u8> {
    ids.iter().flat_map(|id| id.to_le_bytes()).collect()
}

fn decode_ids(bytes: &[u8]) -> IndexResult<Vec<FileId>> {
    if bytes.len() % 4 != 0 {
        return Err(IndexError::Corrupt("truncated posting list".to_string()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| FileId::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
