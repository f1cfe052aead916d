//! Output formatting utilities

use codesift_core::Match;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Pretty JSON for `--format json`
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// `path:line: text`, with the match wrapped in `marker` when given
pub fn format_match(m: &Match, marker: Option<&str>) -> String {
    let text = match marker {
        Some(marker) => m.highlighted(marker),
        None => m.line.clone(),
    };
    format!("{}:{}: {}", m.path.display(), m.line_number, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_match() {
        let m = Match {
            path: PathBuf::from("f1"),
            line_number: 2,
            line: "foo bar".to_string(),
            start: 0,
            end: 3,
        };
        assert_eq!(format_match(&m, None), "f1:2: foo bar");
        assert_eq!(format_match(&m, Some("#")), "f1:2: #foo# bar");
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::from("other"), OutputFormat::Text);
    }
}
