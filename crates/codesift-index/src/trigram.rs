//! In-memory trigram index

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::plan::TrigramQuery;
use crate::traits::{CandidateIndex, FileId};

/// Posting lists keyed by the raw byte trigrams of each file
///
/// Trigrams are case sensitive; case-insensitive patterns are expanded by the
/// planner. Posting lists are kept in ascending file id order.
#[derive(Debug, Clone)]
pub struct TrigramIndex {
    roots: Vec<PathBuf>,
    files: Vec<PathBuf>,
    postings: HashMap<[u8; 3], Vec<FileId>>,
    built_at: DateTime<Utc>,
}

impl TrigramIndex {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            files: Vec::new(),
            postings: HashMap::new(),
            built_at: Utc::now(),
        }
    }

    /// Rebuild an index from stored parts
    pub fn from_parts(
        roots: Vec<PathBuf>,
        files: Vec<PathBuf>,
        postings: HashMap<[u8; 3], Vec<FileId>>,
        built_at: DateTime<Utc>,
    ) -> Self {
        Self {
            roots,
            files,
            postings,
            built_at,
        }
    }

    /// Add one file and its contents, returning its id
    pub fn insert(&mut self, path: PathBuf, contents: &[u8]) -> FileId {
        let id = self.files.len() as FileId;
        self.files.push(path);

        let mut seen: HashSet<[u8; 3]> = HashSet::new();
        for w in contents.windows(3) {
            let t = [w[0], w[1], w[2]];
            if seen.insert(t) {
                self.postings.entry(t).or_default().push(id);
            }
        }
        id
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn postings(&self) -> &HashMap<[u8; 3], Vec<FileId>> {
        &self.postings
    }

    pub fn trigram_count(&self) -> usize {
        self.postings.len()
    }

    fn all_ids(&self) -> Vec<FileId> {
        (0..self.files.len() as FileId).collect()
    }

    fn eval(&self, query: &TrigramQuery) -> Vec<FileId> {
        match query {
            TrigramQuery::All => self.all_ids(),
            TrigramQuery::None => Vec::new(),
            TrigramQuery::Trigram(t) => self.postings.get(t).cloned().unwrap_or_default(),
            TrigramQuery::And(qs) => {
                let mut iter = qs.iter();
                let Some(first) = iter.next() else {
                    return self.all_ids();
                };
                let mut acc = self.eval(first);
                for q in iter {
                    if acc.is_empty() {
                        break;
                    }
                    acc = intersect(&acc, &self.eval(q));
                }
                acc
            }
            TrigramQuery::Or(qs) => qs
                .iter()
                .fold(Vec::new(), |acc, q| union(&acc, &self.eval(q))),
        }
    }
}

impl CandidateIndex for TrigramIndex {
    fn candidates(&self, query: &TrigramQuery) -> Vec<FileId> {
        self.eval(query)
    }

    fn path(&self, id: FileId) -> Option<&Path> {
        self.files.get(id as usize).map(PathBuf::as_path)
    }

    fn len(&self) -> usize {
        self.files.len()
    }

    fn paths(&self) -> Box<dyn Iterator<Item = &Path> + '_> {
        Box::new(self.files.iter().map(PathBuf::as_path))
    }
}

fn intersect(a: &[FileId], b: &[FileId]) -> Vec<FileId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn union(a: &[FileId], b: &[FileId]) -> Vec<FileId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}
