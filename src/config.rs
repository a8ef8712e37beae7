//! User settings.
//!
//! Settings come from a JSON file. Keys may be bare (`"suffix"`) or carry
//! the editor namespace (`"smart-log.suffix"`), so an editor settings file
//! can be pointed at directly.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File looked up next to the document when no config path is given
pub const CONFIG_FILE_NAME: &str = ".smart-log.json";

/// Recognized configuration flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFlag {
    /// Free text appended to inserted labels
    Suffix,
    /// `"on"` highlights print calls before asking to delete them
    DeletHighlight,
}

impl ConfigFlag {
    pub fn key(&self) -> &'static str {
        match self {
            ConfigFlag::Suffix => "suffix",
            ConfigFlag::DeletHighlight => "deletHighlight",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings as written, both key forms kept apart
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    suffix: Option<String>,
    #[serde(default, rename = "smart-log.suffix")]
    namespaced_suffix: Option<String>,
    #[serde(default, rename = "deletHighlight")]
    delete_highlight: Option<String>,
    #[serde(default, rename = "smart-log.deletHighlight")]
    namespaced_delete_highlight: Option<String>,
}

/// Resolved settings
///
/// A namespaced key wins over its bare form when a file has both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSettings")]
pub struct Settings {
    pub suffix: Option<String>,
    pub delete_highlight: Option<String>,
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        Self {
            suffix: raw.namespaced_suffix.or(raw.suffix),
            delete_highlight: raw.namespaced_delete_highlight.or(raw.delete_highlight),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `.smart-log.json` from the document's directory, if present
    pub fn discover(document: &Path) -> Result<Self, ConfigError> {
        let candidate = document
            .parent()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file());

        match candidate {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn flag(&self, flag: ConfigFlag) -> Option<&str> {
        match flag {
            ConfigFlag::Suffix => self.suffix.as_deref(),
            ConfigFlag::DeletHighlight => self.delete_highlight.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_keys() {
        let settings = Settings::from_json(r#"{"suffix": " <<", "deletHighlight": "on"}"#).unwrap();
        assert_eq!(settings.flag(ConfigFlag::Suffix), Some(" <<"));
        assert_eq!(settings.flag(ConfigFlag::DeletHighlight), Some("on"));
    }

    #[test]
    fn test_namespaced_keys_and_unknown_keys() {
        let json = r#"{"editor.tabSize": 2, "smart-log.deletHighlight": "off", "smart-log.suffix": "!"}"#;
        let settings = Settings::from_json(json).unwrap();

        assert_eq!(settings.flag(ConfigFlag::Suffix), Some("!"));
        assert_eq!(settings.flag(ConfigFlag::DeletHighlight), Some("off"));
    }

    #[test]
    fn test_namespaced_key_wins_over_bare_key() {
        let json = r#"{"suffix": "bare", "smart-log.suffix": "namespaced", "deletHighlight": "on"}"#;
        let settings = Settings::from_json(json).unwrap();

        assert_eq!(settings.flag(ConfigFlag::Suffix), Some("namespaced"));
        assert_eq!(settings.flag(ConfigFlag::DeletHighlight), Some("on"));
    }

    #[test]
    fn test_discover_next_to_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"deletHighlight": "on"}"#).unwrap();

        let settings = Settings::discover(&dir.path().join("App.vue")).unwrap();
        assert_eq!(settings.delete_highlight.as_deref(), Some("on"));
    }

    #[test]
    fn test_discover_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::discover(&dir.path().join("a.ts")).unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
    }
}
