//! Deterministic fuzzy scoring of file paths
//!
//! A path is scored in tiers, first success wins:
//!
//! 1. the byte fast filter over the path rejects obvious non-matches
//! 2. the query occurs in the file name (prefix, word start or substring)
//! 3. the query is a fuzzy subsequence of the file name
//! 4. the query is a fuzzy subsequence of the whole path
//!
//! Scores are signed; any negative value means no match.

use std::path::is_separator;

use codesift_core::Candidate;

use crate::error::{SearchError, SearchResult};

/// Returned when a path does not match
pub const NO_MATCH: i32 = -1;

pub const FILE_NAME_PREFIX_SCORE: i32 = 500;
pub const FILE_NAME_WORD_PREFIX_SCORE: i32 = 400;
pub const FILE_NAME_SUBSTRING_SCORE: i32 = 300;
pub const FILE_NAME_MATCH_SCORE: i32 = 100;
pub const CASE_MATCH_BONUS: i32 = 10;
pub const MAX_LENGTH_PENALTY: usize = 80;

/// Character assumed to precede the start of a string when finding words
const WORD_START_SENTINEL: char = '-';

/// Pre-filter: does `haystack` contain the bytes of `needle` in order?
///
/// ASCII letters compare case-insensitively and every other byte exactly.
/// This is a byte test, so it can accept a partial UTF-8 sequence and it
/// does not fold non-ASCII case. Use it only to reject.
pub fn fast_contains(haystack: &[u8], needle: &[u8]) -> bool {
    let mut rest = needle.iter();
    let Some(mut want) = rest.next() else {
        return true;
    };
    for b in haystack {
        if b.eq_ignore_ascii_case(want) {
            match rest.next() {
                Some(next) => want = next,
                None => return true,
            }
        }
    }
    false
}

/// A word begins after a non-letter (`_example`) or at a lower to upper
/// transition (`newWord`). Runs of capitals (`HTTP`) are one word.
pub fn is_word_start(previous: char, current: char) -> bool {
    if !current.is_alphabetic() {
        return false;
    }
    if !previous.is_alphabetic() {
        return true;
    }
    previous.is_lowercase() && !current.is_lowercase()
}

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Score `query` as an ordered subsequence of `text`
///
/// One point per query character matched at a word start; [`NO_MATCH`] if
/// `text` runs out before the query is consumed.
pub fn fuzzy_score(text: &str, query: &str) -> i32 {
    let mut rest = query.chars();
    let Some(mut want) = rest.next() else {
        return 0;
    };

    let mut score = 0;
    let mut previous = WORD_START_SENTINEL;
    for c in text.chars() {
        if eq_ignore_case(c, want) {
            if is_word_start(previous, c) {
                score += 1;
            }
            match rest.next() {
                Some(next) => want = next,
                None => return score,
            }
        }
        previous = c;
    }
    NO_MATCH
}

/// Text after the last path separator
fn file_name(path: &str) -> &str {
    path.rfind(is_separator).map_or(path, |i| &path[i + 1..])
}

/// Case-insensitive occurrence of the query in the file name
fn substring_tier(file_name: &str, query: &str) -> Option<i32> {
    let index = file_name
        .to_ascii_lowercase()
        .find(&query.to_ascii_lowercase())?;

    let length_penalty = (file_name.len() - query.len()).min(MAX_LENGTH_PENALTY) as i32;
    let case_bonus = if file_name[index..].starts_with(query) {
        CASE_MATCH_BONUS
    } else {
        0
    };

    let base = if index == 0 {
        FILE_NAME_PREFIX_SCORE
    } else {
        let previous = file_name[..index].chars().next_back();
        let first = file_name[index..].chars().next();
        match (previous, first) {
            (Some(p), Some(c)) if is_word_start(p, c) => FILE_NAME_WORD_PREFIX_SCORE,
            _ => FILE_NAME_SUBSTRING_SCORE,
        }
    };
    Some(base + case_bonus - length_penalty)
}

/// Fuzzy subsequence of the file name
fn file_name_fuzzy_tier(file_name: &str, query: &str) -> Option<i32> {
    if !fast_contains(file_name.as_bytes(), query.as_bytes()) {
        return None;
    }
    let score = fuzzy_score(file_name, query);
    (score >= 0).then_some(score + FILE_NAME_MATCH_SCORE)
}

fn file_name_tiers(path: &str, file_name: &str, query: &str) -> Option<i32> {
    if !fast_contains(path.as_bytes(), query.as_bytes()) {
        return None;
    }
    substring_tier(file_name, query).or_else(|| file_name_fuzzy_tier(file_name, query))
}

fn score_parts(path: &str, file_name: &str, query: &str) -> i32 {
    if !fast_contains(path.as_bytes(), query.as_bytes()) {
        return NO_MATCH;
    }
    substring_tier(file_name, query)
        .or_else(|| file_name_fuzzy_tier(file_name, query))
        .unwrap_or_else(|| fuzzy_score(path, query))
}

/// Score how well `query` matches `path`; negative means no match
pub fn score(path: &str, query: &str) -> i32 {
    score_parts(path, file_name(path), query)
}

/// [`score`] for a candidate's relative path, reusing its precomputed file name
pub fn score_candidate(candidate: &Candidate, query: &str) -> i32 {
    score_parts(candidate.relative_path(), candidate.file_name(), query)
}

/// File name tiers only; the whole-path fuzzy fallback is skipped
pub fn file_name_score(candidate: &Candidate, query: &str) -> i32 {
    file_name_tiers(candidate.relative_path(), candidate.file_name(), query).unwrap_or(NO_MATCH)
}

/// [`score`] over raw bytes; input that is not UTF-8 fails this call only
pub fn score_bytes(path: &[u8], query: &[u8]) -> SearchResult<i32> {
    let path = std::str::from_utf8(path)
        .map_err(|e| SearchError::MalformedInput(format!("path is not UTF-8: {}", e)))?;
    let query = std::str::from_utf8(query)
        .map_err(|e| SearchError::MalformedInput(format!("query is not UTF-8: {}", e)))?;
    Ok(score(path, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_order(paths: &[&str], query: &str) {
        let mut previous = i32::MAX;
        for path in paths {
            let s = score(path, query);
            assert!(s < previous, "{} ({}) should score below {}", path, s, previous);
            previous = s;
        }
        assert!(previous >= 0, "{} should match {}", paths[paths.len() - 1], query);
    }

    #[test]
    fn test_fast_contains() {
        for s in ["", "abcd", "----a-b-c-d----", "------", "abcdé"] {
            assert!(!fast_contains(s.as_bytes(), b"abcde"), "{}", s);
        }
        for s in ["abcde", "-a-b-c-d-e-", "ABCDE", "-A-B-C-D-E-"] {
            assert!(fast_contains(s.as_bytes(), b"abcde"), "{}", s);
        }
        assert!(fast_contains(b"anything", b""));
    }

    #[test]
    fn test_fast_contains_byte_false_positive() {
        // nbsp is c2 a0; pound sign then not-equal is c2 a3 e2 89 a0
        let haystack = "\u{a3}\u{2260}";
        let needle = "\u{a0}";
        assert!(fast_contains(haystack.as_bytes(), needle.as_bytes()));
        assert_eq!(score(haystack, needle), NO_MATCH);
    }

    #[test]
    fn test_is_word_start() {
        for s in [
            "SampleWord",
            "sampleWord",
            "sample-word",
            "--sample---word---",
            "--SAMPLE---WORD---",
        ] {
            let mut previous = WORD_START_SENTINEL;
            for c in s.chars() {
                let lower = c.to_ascii_lowercase();
                let expected = lower == 's' || lower == 'w';
                assert_eq!(
                    is_word_start(previous, c),
                    expected,
                    "{}: {} -> {}",
                    s,
                    previous,
                    c
                );
                previous = c;
            }
        }
    }

    #[test]
    fn test_type_order() {
        assert_order(
            &[
                "a/b/c/TypeAheadHandler.java",
                "a/b/c/PlaceType.java",
                "a/b/type/Foo.java",
                "a/b/ctyped/Foo.java",
            ],
            "type",
        );
    }

    #[test]
    fn test_file_name_order() {
        assert_order(
            &[
                "f/i/l/File.java",
                "f/i/l/file.txt",
                "a/b/c/examplefile.txt",
                "a/f/i/le.txt",
            ],
            "File",
        );
    }

    #[test]
    fn test_abbreviations() {
        assert_order(
            &[
                "science/src/thrift/com/twitter/ads/adserver/adserver_new_rpc.thrift",
                "science/tests/resources/com/twitter/ads/dataservice/validation/rules/card/ValidateLeadGenCardRulesIT.testDefaultCard_response_logs.txt",
            ],
            "anr",
        );
    }

    #[test]
    fn test_word_match() {
        assert_order(&["foo/harViewer.js", "foo/reviewer.html"], "viewer");
        assert_order(&["path/apt", "path/api_test"], "apt");
    }

    #[test]
    fn test_shorter_file_names_score_higher() {
        assert_order(
            &[
                "zzzreally/longbutbetter/git",
                "zzzlonger/git.a",
                "zzlong/path/git.py",
                "ashort/git-foo.py",
            ],
            "git",
        );
    }

    #[test]
    fn test_exact_and_wrong_case_prefix() {
        assert_eq!(score("src/hello", "hello"), 510);
        assert_eq!(score("src/Hello", "hello"), 500);
        assert_eq!(score("src/Hello.rs", "hello"), 497);
        assert!(score("src/Hello.rs", "hello") < score("src/hello.rs", "hello"));
    }

    #[test]
    fn test_length_penalty_is_capped() {
        let name = format!("x{}", "y".repeat(200));
        assert_eq!(score(&name, "x"), 510 - MAX_LENGTH_PENALTY as i32);
    }

    #[test]
    fn test_fuzzy_score() {
        assert_eq!(fuzzy_score("a/b/type/Foo.java", "type"), 1);
        assert_eq!(fuzzy_score("a/b/ctyped/Foo.java", "type"), 0);
        assert_eq!(fuzzy_score("adserver_new_rpc", "anr"), 3);
        assert_eq!(fuzzy_score("abc", "abcd"), NO_MATCH);
    }

    #[test]
    fn test_file_name_score_skips_path_tier() {
        let c = Candidate::new("a/b/type/Foo.java");
        assert_eq!(file_name_score(&c, "type"), NO_MATCH);
        assert_eq!(score_candidate(&c, "type"), 1);

        let c = Candidate::new("a/b/c/PlaceType.java");
        assert_eq!(file_name_score(&c, "type"), score_candidate(&c, "type"));
    }

    #[test]
    fn test_score_bytes_rejects_invalid_utf8() {
        assert_eq!(score_bytes(b"src/hello", b"hello").unwrap(), 510);
        assert!(matches!(
            score_bytes(b"src/\xffhello", b"hello"),
            Err(SearchError::MalformedInput(_))
        ));
        assert!(matches!(
            score_bytes(b"src/hello", b"\xfe"),
            Err(SearchError::MalformedInput(_))
        ));
    }
}
