// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted user settings (`config.toml`).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cide_adapters::BoardProvider;
use cide_compdb::MappingSource;
use cide_core::Board;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid config {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Where directory-to-package mappings come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mapping {
    Static,
    #[default]
    Generated,
}

impl From<Mapping> for MappingSource {
    fn from(mapping: Mapping) -> Self {
        match mapping {
            Mapping::Static => MappingSource::Static,
            Mapping::Generated => MappingSource::Generated,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default board; `host` selects the host sysroot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    #[serde(default)]
    pub mapping: Mapping,
    /// Use this checkout instead of searching upward from each file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<PathBuf>,
}

impl Config {
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Load from `dir`; a missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(dir);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Write to `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path(dir);
        let text = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::create_dir_all(dir)
            .and_then(|_| std::fs::write(&tmp, text))
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|source| ConfigError::Write { path, source })
    }
}

/// Board from an explicit override, else from the config file.
///
/// The file is re-read on every request so `cide board set` takes effect in
/// a running `cide watch`.
pub struct ConfiguredBoard {
    forced: Option<Board>,
    config_dir: PathBuf,
}

impl ConfiguredBoard {
    pub fn new(forced: Option<Board>, config_dir: impl Into<PathBuf>) -> Self {
        Self { forced, config_dir: config_dir.into() }
    }
}

#[async_trait]
impl BoardProvider for ConfiguredBoard {
    async fn board(&self) -> Option<Board> {
        if let Some(board) = &self.forced {
            return Some(board.clone());
        }
        match Config::load(&self.config_dir) {
            Ok(config) => config.board,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable config");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
