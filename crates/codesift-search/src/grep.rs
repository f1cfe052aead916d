//! Line verification of candidate files

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use codesift_core::limits::MAX_LINE_BYTES;
use codesift_core::Match;
use regex::bytes::Regex;

use crate::error::{SearchError, SearchResult};

/// Most bytes read for one line: the line itself plus `\r\n`
const LINE_READ_LIMIT: u64 = MAX_LINE_BYTES as u64 + 2;

/// Find the first match of `regex` on every line of the file at `path`
///
/// A file that no longer exists is reported as [`SearchError::StaleIndexEntry`]
/// so callers can skip it.
pub fn grep_file(regex: &Regex, path: &Path) -> SearchResult<Vec<Match>> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            SearchError::StaleIndexEntry {
                path: path.to_path_buf(),
            }
        } else {
            SearchError::FileAccess {
                path: path.to_path_buf(),
                operation: "open",
                source,
            }
        }
    })?;
    grep_reader(regex, path, BufReader::new(file))
}

/// [`grep_file`] over an already open reader; `path` is only recorded
pub fn grep_reader<R: BufRead>(
    regex: &Regex,
    path: &Path,
    mut reader: R,
) -> SearchResult<Vec<Match>> {
    let mut matches = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        let n = (&mut reader)
            .take(LINE_READ_LIMIT)
            .read_until(b'\n', &mut buf)
            .map_err(|source| SearchError::FileAccess {
                path: path.to_path_buf(),
                operation: "read",
                source,
            })?;
        if n == 0 {
            break;
        }
        line_number += 1;

        let mut line = buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }
        if line.len() > MAX_LINE_BYTES {
            return Err(SearchError::LineTooLong {
                path: path.to_path_buf(),
                line_number,
                max: MAX_LINE_BYTES,
            });
        }

        if let Some(m) = regex.find(line) {
            matches.push(build_match(path, line_number, line, m.start(), m.end()));
        }
    }

    Ok(matches)
}

/// Render the line as text, keeping `start..end` on the matched text
///
/// Each part is decoded separately so replacement characters never shift
/// the match offsets.
fn build_match(path: &Path, line_number: usize, line: &[u8], start: usize, end: usize) -> Match {
    let prefix = String::from_utf8_lossy(&line[..start]);
    let matched = String::from_utf8_lossy(&line[start..end]);
    let suffix = String::from_utf8_lossy(&line[end..]);

    let start = prefix.len();
    let end = start + matched.len();
    let mut text = String::with_capacity(end + suffix.len());
    text.push_str(&prefix);
    text.push_str(&matched);
    text.push_str(&suffix);

    Match {
        path: path.to_path_buf(),
        line_number,
        line: text,
        start,
        end,
    }
}
