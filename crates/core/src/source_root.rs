// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The chroot / source-tree path pair.
//!
//! A checkout is a directory containing a `chroot/` subdirectory (the build
//! sandbox) next to `src/` (the editable sources). Paths reported by tools
//! running in the sandbox are chroot-absolute and must be mapped onto the
//! host through the chroot directory before they can be opened from outside.

use std::path::{Component, Path, PathBuf};

/// Name of the chroot directory that marks a source root.
pub const CHROOT_DIR_NAME: &str = "chroot";

/// Where the source root is mounted inside the chroot.
pub const CHROOT_SOURCE_MOUNT: &str = "/mnt/host/source";

/// A located checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRoot {
    source: PathBuf,
}

impl SourceRoot {
    /// Wrap an already-known source root without checking for the marker.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into() }
    }

    /// Walk upward from `path` to the nearest directory containing `chroot/`.
    pub fn find(path: &Path) -> Option<Self> {
        path.ancestors()
            .find(|dir| dir.join(CHROOT_DIR_NAME).is_dir())
            .map(|dir| Self::new(dir))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn chroot(&self) -> PathBuf {
        self.source.join(CHROOT_DIR_NAME)
    }

    /// Map a chroot-absolute path onto the host filesystem.
    pub fn chroot_to_host(&self, chroot_path: &Path) -> PathBuf {
        let mut host = self.chroot();
        host.extend(chroot_path.components().filter(|c| matches!(c, Component::Normal(_))));
        host
    }

    /// `path` relative to the source root, or `None` if it is not beneath it.
    ///
    /// Purely lexical: a relative path that climbs out with `..` is rejected.
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        let rel = path.strip_prefix(&self.source).ok()?;
        if rel.is_absolute() || rel.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }
        Some(rel.to_path_buf())
    }

    /// Absolute host path of a source-root-relative path.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.source.join(relative)
    }
}

#[cfg(test)]
#[path = "source_root_tests.rs"]
mod tests;
