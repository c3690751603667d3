// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, so `main()` owns process termination.

use std::fmt;
use std::path::Path;

/// Generation ran and failed.
pub const EXIT_FAILED: i32 = 1;

/// Nothing to do for the request (unknown package, no board, bad input).
pub const EXIT_USAGE: i32 = 2;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn unknown_package(path: &Path) -> Self {
        Self::new(EXIT_USAGE, format!("no known package owns {}", path.display()))
    }

    pub fn no_board() -> Self {
        Self::new(EXIT_USAGE, "no board configured; run `cide board set <board>` or set CIDE_BOARD")
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
