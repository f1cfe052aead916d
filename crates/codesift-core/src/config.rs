//! Service configuration
//!
//! One explicit record handed to the indexer, the pipeline and the server.
//! It is loaded from a TOML file and then overridden by command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::limits::DEFAULT_MAX_FILE_SIZE;

/// Default listen address
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Get the default config file path (~/.config/codesift/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codesift")
        .join("config.toml")
}

/// Get the default index location
pub fn default_index_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codesift")
        .join("index.redb")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trees to index
    pub roots: Vec<PathBuf>,
    /// On-disk index file
    pub index_path: PathBuf,
    /// HTTP listen address (host:port)
    pub listen: String,
    /// Prefix removed from paths shown to clients
    pub strip_prefix: Option<PathBuf>,
    /// Paths excluded from indexing (prefix match)
    pub exclude: Vec<PathBuf>,
    /// Reuse the existing on-disk index instead of rebuilding at startup
    pub skip_index: bool,
    /// Editor command template, e.g. `code --goto {path}:{line}`
    pub editor: Option<String>,
    /// Files larger than this are not indexed
    pub max_file_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            index_path: default_index_path(),
            listen: DEFAULT_LISTEN.to_string(),
            strip_prefix: None,
            exclude: Vec::new(),
            skip_index: false,
            editor: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Config {
    /// Load config from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Keys accepted by [`Config::get`] and [`Config::set`]
    pub fn keys() -> &'static [&'static str] {
        &[
            "roots",
            "index_path",
            "listen",
            "strip_prefix",
            "exclude",
            "skip_index",
            "editor",
            "max_file_size",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let joined = |paths: &[PathBuf]| {
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        match key {
            "roots" => Some(joined(&self.roots)),
            "index_path" => Some(self.index_path.display().to_string()),
            "listen" => Some(self.listen.clone()),
            "strip_prefix" => self.strip_prefix.as_ref().map(|p| p.display().to_string()),
            "exclude" => Some(joined(&self.exclude)),
            "skip_index" => Some(self.skip_index.to_string()),
            "editor" => self.editor.clone(),
            "max_file_size" => Some(self.max_file_size.to_string()),
            _ => None,
        }
    }

    /// Set a key from its string form; lists are comma separated
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let split = |v: &str| -> Vec<PathBuf> {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect()
        };
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        match key {
            "roots" => self.roots = split(value),
            "index_path" => self.index_path = PathBuf::from(value),
            "listen" => self.listen = value.to_string(),
            "strip_prefix" => self.strip_prefix = optional(value).map(PathBuf::from),
            "exclude" => self.exclude = split(value),
            "skip_index" => {
                self.skip_index = value
                    .parse()
                    .map_err(|_| Error::MalformedInput(format!("expected true/false: {}", value)))?
            }
            "editor" => self.editor = optional(value),
            "max_file_size" => {
                self.max_file_size = value
                    .parse()
                    .map_err(|_| Error::MalformedInput(format!("expected a size: {}", value)))?
            }
            _ => return Err(Error::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    /// Editor argv for opening `path` at `line`, if an editor is configured
    pub fn editor_command(&self, path: &Path, line: usize) -> Option<Vec<String>> {
        let template = self.editor.as_deref()?;
        let path = path.display().to_string();
        let line = line.to_string();
        let argv: Vec<String> = template
            .split_whitespace()
            .map(|part| part.replace("{path}", &path).replace("{line}", &line))
            .collect();
        (!argv.is_empty()).then_some(argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.listen, DEFAULT_LISTEN);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("roots", "/src/a, /src/b").unwrap();
        config.set("skip_index", "true").unwrap();
        config.set("editor", "vim +{line} {path}").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.roots, vec![PathBuf::from("/src/a"), PathBuf::from("/src/b")]);
        assert!(loaded.skip_index);
        assert_eq!(loaded.get("roots").as_deref(), Some("/src/a,/src/b"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "listen = \"0.0.0.0:9000\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        assert!(matches!(config.set("nope", "x"), Err(Error::UnknownConfigKey(_))));
        assert!(config.set("skip_index", "maybe").is_err());
        assert!(config.get("nope").is_none());
    }

    #[test]
    fn test_editor_command() {
        let mut config = Config::default();
        assert!(config.editor_command(Path::new("a.rs"), 3).is_none());

        config.editor = Some("vim +{line} {path}".to_string());
        assert_eq!(
            config.editor_command(Path::new("src/a.rs"), 3),
            Some(vec!["vim".to_string(), "+3".to_string(), "src/a.rs".to_string()])
        );
    }
}
