// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compilation database (`compile_commands.json`) records.
//!
//! The on-disk format is the conventional JSON array of
//! `{directory, command, file, output}` objects consumed by clangd and other
//! C/C++ tooling. Files are copied verbatim when published; this module only
//! reads them to validate that every referenced source exists.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of a published compilation database.
pub const COMPDB_FILE_NAME: &str = "compile_commands.json";

/// Errors from decoding a compilation database.
#[derive(Debug, Error)]
pub enum CompdbParseError {
    #[error("malformed compilation database: {0}")]
    Json(#[from] serde_json::Error),
}

/// One translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    /// Working directory of the compiler invocation.
    pub directory: PathBuf,
    #[serde(default)]
    pub command: String,
    /// Argument-vector form, emitted by some generators instead of `command`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    /// Source file, absolute or relative to `directory`.
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl CompileCommand {
    /// The referenced source file, resolved against `directory` when relative.
    pub fn resolved_file(&self) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            self.directory.join(&self.file)
        }
    }
}

/// An ordered list of compile commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilationDatabase {
    pub entries: Vec<CompileCommand>,
}

impl CompilationDatabase {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CompdbParseError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every referenced source file, resolved, in entry order.
    pub fn referenced_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.entries.iter().map(CompileCommand::resolved_file)
    }

    /// Referenced files for which `exists` returns false.
    pub fn missing_files(&self, exists: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
        self.referenced_files().filter(|p| !exists(p)).collect()
    }
}

#[cfg(test)]
#[path = "compdb_tests.rs"]
mod tests;
