use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Sentinel the execution service uses to join webout, log and print output
pub const DEFAULT_SENTINEL: &str = "SASJS_LOGS_SEPARATOR_163ee17b6ff24f028928972d80a26784";

/// Lines per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Chunks that may be expanded at once
pub const DEFAULT_MAX_OPEN: usize = 2;

/// How long a navigated-to line stays highlighted
pub const DEFAULT_HIGHLIGHT_MS: u64 = 3000;

pub const DEFAULT_ERROR_MARKER: &str = r"^ERROR(?:\s+[\d-]+)?:\s?(?P<body>.*)$";
pub const DEFAULT_WARNING_MARKER: &str = r"^WARNING(?:\s+[\d-]+)?:\s?(?P<body>.*)$";

/// Configuration problems; all of them are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chunk_size must be a positive integer")]
    ZeroChunkSize,

    #[error("max_open must be a positive integer")]
    ZeroMaxOpen,

    #[error("sentinel must not be empty")]
    EmptySentinel,

    #[error("invalid {kind} marker pattern: {source}")]
    InvalidMarker {
        kind: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("{kind} marker pattern has no `body` capture group")]
    MissingBodyGroup { kind: &'static str },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `[markers]` section: line patterns that identify diagnostics
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MarkerConfig {
    #[serde(default = "default_error_marker")]
    pub error: String,
    #[serde(default = "default_warning_marker")]
    pub warning: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            error: default_error_marker(),
            warning: default_warning_marker(),
        }
    }
}

/// Viewer configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_max_open")]
    pub max_open: usize,
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    #[serde(default)]
    pub markers: MarkerConfig,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_max_open() -> usize {
    DEFAULT_MAX_OPEN
}

fn default_highlight_ms() -> u64 {
    DEFAULT_HIGHLIGHT_MS
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_error_marker() -> String {
    DEFAULT_ERROR_MARKER.to_string()
}

fn default_warning_marker() -> String {
    DEFAULT_WARNING_MARKER.to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_open: DEFAULT_MAX_OPEN,
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            sentinel: default_sentinel(),
            markers: MarkerConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check the numeric and string settings. Marker patterns are checked
    /// when the classifier compiles them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.max_open == 0 {
            return Err(ConfigError::ZeroMaxOpen);
        }
        if self.sentinel.is_empty() {
            return Err(ConfigError::EmptySentinel);
        }
        Ok(())
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.max_open, 2);
        assert_eq!(config.highlight_duration(), Duration::from_millis(3000));
        assert_eq!(config.sentinel, DEFAULT_SENTINEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ViewerConfig::from_toml_str("chunk_size = 20\n").unwrap();
        assert_eq!(config.chunk_size, 20);
        assert_eq!(config.max_open, 2);
        assert_eq!(config.markers, MarkerConfig::default());
    }

    #[test]
    fn test_markers_section() {
        let toml = r#"
max_open = 3

[markers]
error = '^E: (?P<body>.*)$'
"#;
        let config = ViewerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.max_open, 3);
        assert_eq!(config.markers.error, "^E: (?P<body>.*)$");
        assert_eq!(config.markers.warning, DEFAULT_WARNING_MARKER);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = ViewerConfig::from_toml_str("chunk_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroChunkSize));
    }

    #[test]
    fn test_zero_max_open_rejected() {
        let err = ViewerConfig::from_toml_str("max_open = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMaxOpen));
    }

    #[test]
    fn test_empty_sentinel_rejected() {
        let err = ViewerConfig::from_toml_str("sentinel = ''").unwrap_err();
        assert!(matches!(err, ConfigError::EmptySentinel));
    }

    #[test]
    fn test_negative_chunk_size_is_parse_error() {
        let err = ViewerConfig::from_toml_str("chunk_size = -5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::load(Path::new("/nonexistent/runlog.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
