// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::{Path, PathBuf};

use cide_compdb::ChrootMode;
use cide_core::Board;

use crate::exit_error::ExitError;

/// File whose presence marks the inside of the SDK chroot.
const CHROOT_VERSION_FILE: &str = "/etc/cros_chroot_version";

/// Resolve config directory: CIDE_CONFIG_DIR > XDG_CONFIG_HOME/cide > ~/.config/cide
pub fn config_dir() -> Result<PathBuf, ExitError> {
    if let Ok(dir) = std::env::var("CIDE_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("cide"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| ExitError::new(2, "cannot locate config directory: HOME is not set"))?;
    Ok(PathBuf::from(home).join(".config/cide"))
}

/// Log filter directive (default `info`).
pub fn log_filter() -> String {
    std::env::var("CIDE_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

/// Board forced for this invocation, overriding the persisted one.
pub fn board_override() -> Option<Board> {
    std::env::var("CIDE_BOARD").ok().and_then(|s| Board::parse(&s))
}

/// Whether this process runs inside the SDK chroot.
///
/// `CIDE_INSIDE_CHROOT=1` forces inside, `0` forces outside.
pub fn chroot_mode() -> ChrootMode {
    match std::env::var("CIDE_INSIDE_CHROOT").as_deref() {
        Ok("1") => ChrootMode::Inside,
        Ok("0") => ChrootMode::Outside,
        _ if Path::new(CHROOT_VERSION_FILE).exists() => ChrootMode::Inside,
        _ => ChrootMode::Outside,
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
