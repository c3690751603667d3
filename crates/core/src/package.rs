// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package atoms and the metadata that ties a source directory to one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error parsing a `category/name` atom.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid package atom `{0}`: expected `category/name`")]
pub struct AtomParseError(pub String);

/// A package identifier of the form `category/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    category: String,
    name: String,
}

impl Atom {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self { category: category.into(), name: name.into() }
    }

    pub fn parse(s: &str) -> Result<Self, AtomParseError> {
        match s.split_once('/') {
            Some((category, name))
                if !category.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(category, name))
            }
            _ => Err(AtomParseError(s.to_string())),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The atom pinned to the `9999` (cros-workon live) version.
    pub fn live_version(&self) -> String {
        format!("{}-9999", self)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

impl std::str::FromStr for Atom {
    type Err = AtomParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Atom::parse(s)
    }
}

impl Serialize for Atom {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Atom {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Atom::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A buildable unit: where its sources live and which atom builds them.
///
/// `source_dir` is relative to the source root (e.g. `src/platform2/codelab`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageInfo {
    pub source_dir: PathBuf,
    pub atom: Atom,
}

impl PackageInfo {
    pub fn new(source_dir: impl Into<PathBuf>, atom: Atom) -> Self {
        Self { source_dir: source_dir.into(), atom }
    }

    /// Where the published compilation database lives, relative to the source root.
    pub fn compdb_path(&self) -> PathBuf {
        self.source_dir.join(crate::compdb::COMPDB_FILE_NAME)
    }

    /// Whether `relative` (a source-root-relative path) is inside this package.
    pub fn contains(&self, relative: &Path) -> bool {
        relative.starts_with(&self.source_dir)
    }
}

#[cfg(test)]
#[path = "package_tests.rs"]
mod tests;
