// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of compdb generation failures and their remediation.
//!
//! Every failure from the artifact locator or the compdb service ends in
//! exactly one [`CompdbError`] variant. The controller turns a variant into
//! one user-facing message plus at most one [`Remedy`].

use std::fmt;
use std::path::PathBuf;

use cide_adapters::{ExecError, Remedy};
use cide_core::{Atom, Board, CompdbParseError};
use thiserror::Error;

/// Underlying cause of a [`CompdbError`].
#[derive(Debug, Error)]
pub enum CompdbCause {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Glob(#[from] glob::PatternError),
    #[error(transparent)]
    Parse(#[from] CompdbParseError),
}

/// Failure generating or publishing a compilation database.
#[derive(Debug, Error)]
pub enum CompdbError {
    #[error("failed to remove cache file {}", cache.display())]
    RemoveCache { cache: PathBuf, source: Option<CompdbCause> },

    #[error("failed to run ebuild for {atom} (board {board})")]
    RunEbuild { board: Board, atom: Atom, source: Option<CompdbCause> },

    #[error("compilation database was not generated for {atom}")]
    NotGenerated { atom: Atom, source: Option<CompdbCause> },

    #[error("failed to copy compilation database to {}", destination.display())]
    CopyFailed { destination: PathBuf, source: Option<CompdbCause> },
}

/// Fieldless discriminant of [`CompdbError`], used for per-session dedup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompdbErrorKind {
    RemoveCache,
    RunEbuild,
    NotGenerated,
    CopyFailed,
}

impl fmt::Display for CompdbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompdbErrorKind::RemoveCache => write!(f, "remove_cache"),
            CompdbErrorKind::RunEbuild => write!(f, "run_ebuild"),
            CompdbErrorKind::NotGenerated => write!(f, "not_generated"),
            CompdbErrorKind::CopyFailed => write!(f, "copy_failed"),
        }
    }
}

impl CompdbError {
    pub fn kind(&self) -> CompdbErrorKind {
        match self {
            CompdbError::RemoveCache { .. } => CompdbErrorKind::RemoveCache,
            CompdbError::RunEbuild { .. } => CompdbErrorKind::RunEbuild,
            CompdbError::NotGenerated { .. } => CompdbErrorKind::NotGenerated,
            CompdbError::CopyFailed { .. } => CompdbErrorKind::CopyFailed,
        }
    }

    pub fn cause(&self) -> Option<&CompdbCause> {
        match self {
            CompdbError::RemoveCache { source, .. }
            | CompdbError::RunEbuild { source, .. }
            | CompdbError::NotGenerated { source, .. }
            | CompdbError::CopyFailed { source, .. } => source.as_ref(),
        }
    }

    fn credential_rejected(&self) -> bool {
        matches!(self.cause(), Some(CompdbCause::Exec(ExecError::InvalidCredential { .. })))
    }

    /// The message shown to the user.
    pub fn user_message(&self) -> String {
        let prefix = "Failed to generate cross reference";
        match self {
            CompdbError::RemoveCache { cache, .. } if self.credential_rejected() => format!(
                "{}: sudo rejected the password while removing {}; try again or remove it manually and reload the IDE",
                prefix,
                cache.display()
            ),
            CompdbError::RemoveCache { cache, .. } => format!(
                "{}: try removing the file {} and reload the IDE",
                prefix,
                cache.display()
            ),
            CompdbError::RunEbuild { .. } if self.credential_rejected() => {
                format!("{}: sudo rejected the password; try again", prefix)
            }
            CompdbError::RunEbuild { board, atom, .. } => format!(
                "{}: try running `cros_workon --board={} start {}` and `{} {}` from the chroot",
                prefix,
                board,
                atom.name(),
                board.tool("emerge"),
                atom
            ),
            CompdbError::NotGenerated { atom, .. } => format!(
                "{}: the compilation database for {} was not produced by the build; please file a bug",
                prefix, atom
            ),
            CompdbError::CopyFailed { destination, .. } => format!(
                "{}: try removing the file {} and reload the IDE",
                prefix,
                destination.display()
            ),
        }
    }

    /// The single remedial action offered with [`Self::user_message`].
    pub fn remedy(&self) -> Option<Remedy> {
        match self.kind() {
            CompdbErrorKind::RemoveCache => Some(Remedy::OpenDocs),
            CompdbErrorKind::RunEbuild => Some(Remedy::ShowLog),
            CompdbErrorKind::NotGenerated => Some(Remedy::FileBug),
            CompdbErrorKind::CopyFailed => Some(Remedy::ShowLog),
        }
    }

    /// The error and its cause chain on one line, for logs.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
