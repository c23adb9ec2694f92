//! Run configuration: where the PDFs are, where the index goes, and how to chunk and embed.
//!
//! Loaded from `folio.toml` (in the app data directory unless a path is given). Every field
//! has a default, so a missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_data;
use crate::chunks::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::ollama::{DEFAULT_BASE_URL, DEFAULT_EMBED_MODEL};

pub const CONFIG_FILENAME: &str = "folio.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for `*.pdf` files. Default: `data`.
    pub source_dir: PathBuf,
    /// Output JSON path. Default: `web/public/index.json`.
    pub out_path: PathBuf,
    /// Embedding model name. Default: `all-minilm`.
    pub model: String,
    /// Ollama server. Default: `http://localhost:11434`.
    pub ollama_url: String,
    /// Characters per chunk. Default: 1200.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks. Default: 200.
    pub chunk_overlap: usize,
    /// Max texts per embedding request. Default: none (one request for everything).
    pub embed_batch_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data"),
            out_path: PathBuf::from("web/public/index.json"),
            model: DEFAULT_EMBED_MODEL.to_string(),
            ollama_url: DEFAULT_BASE_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            embed_batch_size: None,
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing file yields the defaults; an unparsable one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Read(path.to_path_buf(), e)),
        };
        let config: Self = toml::from_str(&s).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be > 0".into()));
        }
        if self.embed_batch_size == Some(0) {
            return Err(ConfigError::Invalid("embed_batch_size must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            tracing::warn!(
                chunk_size = self.chunk_size,
                chunk_overlap = self.chunk_overlap,
                "chunk_overlap >= chunk_size; chunks will advance one character at a time"
            );
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Path of the default config file, if the app data directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    app_data::app_data_dir().map(|d| d.join(CONFIG_FILENAME))
}

/// Load config from `path`, or from the app data directory when `path` is `None`.
/// Returns defaults when no file exists.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => Config::load(p),
        None => match default_config_path() {
            Some(p) => Config::load(&p),
            None => Ok(Config::default()),
        },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("invalid config {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.chunk_size, 1200);
        assert_eq!(c.chunk_overlap, 200);
        assert_eq!(c.model, "all-minilm");
        assert_eq!(c.embed_batch_size, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "source_dir = \"books\"\nchunk_size = 800\nembed_batch_size = 64\n").unwrap();

        let c = Config::load(&path).unwrap();
        assert_eq!(c.source_dir, PathBuf::from("books"));
        assert_eq!(c.chunk_size, 800);
        assert_eq!(c.chunk_overlap, 200);
        assert_eq!(c.embed_batch_size, Some(64));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "chunk_size = \"big\"").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(..))));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let c = Config { chunk_size: 0, ..Config::default() };
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn oversized_overlap_is_allowed() {
        let c = Config { chunk_size: 100, chunk_overlap: 100, ..Config::default() };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_round_trip() {
        let c = Config { embed_batch_size: Some(32), ..Config::default() };
        let back: Config = toml::from_str(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }
}
