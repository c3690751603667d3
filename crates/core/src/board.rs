// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target board identification.
//!
//! A board names the hardware/software configuration packages are built
//! for. `host` is the virtual board meaning the native build machine, whose
//! sysroot is `/` and whose tools carry no board suffix.

use std::fmt;
use std::path::PathBuf;

/// Sentinel board name meaning the native build machine.
pub const HOST_BOARD_NAME: &str = "host";

/// A build target.
///
/// Serializes as a plain string using Display format:
/// - `"host"`
/// - `"amd64-generic"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Board {
    /// The native build machine.
    Host,
    /// A named board (e.g. `amd64-generic`).
    Named(String),
}

impl Board {
    /// Parse a board name. Returns `None` for an empty or blank name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if name == HOST_BOARD_NAME {
            return Some(Board::Host);
        }
        Some(Board::Named(name.to_string()))
    }

    pub fn is_host(&self) -> bool {
        matches!(self, Board::Host)
    }

    /// The board's sysroot inside the chroot.
    pub fn sysroot(&self) -> PathBuf {
        match self {
            Board::Host => PathBuf::from("/"),
            Board::Named(name) => PathBuf::from("/build").join(name),
        }
    }

    /// Name of a board-specific portage tool (`ebuild-<board>`, or bare for host).
    pub fn tool(&self, base: &str) -> String {
        match self {
            Board::Host => base.to_string(),
            Board::Named(name) => format!("{}-{}", base, name),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Board::Host => write!(f, "{}", HOST_BOARD_NAME),
            Board::Named(name) => write!(f, "{}", name),
        }
    }
}

impl serde::Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Board::parse(&s).ok_or_else(|| serde::de::Error::custom("empty board name"))
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
