// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Map a source file to the package that builds it.
//!
//! The directory-to-package mapping is either a hand-curated table or is
//! generated from `*-9999.ebuild` files in the overlays: a package that
//! inherits the `platform` eclass and sets `PLATFORM_SUBDIR` owns
//! `src/platform2/<subdir>`. The generated mapping is built at most once per
//! source root for the lifetime of the resolver.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use cide_core::{Atom, PackageInfo, SourceRoot};
use regex::Regex;

/// Overlays scanned for live ebuilds, relative to the source root.
pub const OVERLAY_DIRS: &[&str] =
    &["src/third_party/chromiumos-overlay", "src/private-overlays/chromeos-partner-overlay"];

/// Curated platform2 packages.
pub const STATIC_PACKAGES: &[(&str, &str)] = &[
    ("src/aosp/frameworks/ml", "chromeos-base/aosp-frameworks-ml-nn"),
    ("src/platform/crosvm", "chromeos-base/crosvm"),
    ("src/platform2/attestation", "chromeos-base/attestation"),
    ("src/platform2/codelab", "chromeos-base/codelab"),
    ("src/platform2/cros-disks", "chromeos-base/cros-disks"),
    ("src/platform2/cryptohome", "chromeos-base/cryptohome"),
    ("src/platform2/debugd", "chromeos-base/debugd"),
    ("src/platform2/libbrillo", "chromeos-base/libbrillo"),
    ("src/platform2/login_manager", "chromeos-base/chromeos-login"),
    ("src/platform2/metrics", "chromeos-base/metrics"),
    ("src/platform2/missive", "chromeos-base/missive"),
    ("src/platform2/ml", "chromeos-base/ml"),
    ("src/platform2/power_manager", "chromeos-base/power_manager"),
    ("src/platform2/shill", "chromeos-base/shill"),
    ("src/platform2/spaced", "chromeos-base/spaced"),
    ("src/platform2/tpm_manager", "chromeos-base/tpm_manager"),
    ("src/platform2/trunks", "chromeos-base/trunks"),
    ("src/platform2/update_engine", "chromeos-base/update_engine"),
    ("src/platform2/vm_tools", "chromeos-base/vm_host_tools"),
];

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static INHERIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^inherit\s+(.*)$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static SUBDIR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*PLATFORM_SUBDIR=["']?([^"'\s]+)["']?"#)
        .expect("constant regex pattern is valid")
});

/// Where the directory-to-package mapping comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingSource {
    Static,
    #[default]
    Generated,
}

type Mapping = HashMap<PathBuf, Atom>;

/// Resolves files to packages.
pub struct PackageResolver {
    source: MappingSource,
    /// Forces the source root instead of searching upward for it.
    root_override: Option<SourceRoot>,
    generated: tokio::sync::Mutex<HashMap<PathBuf, Arc<Mapping>>>,
}

impl PackageResolver {
    pub fn new(source: MappingSource) -> Self {
        Self { source, root_override: None, generated: tokio::sync::Mutex::default() }
    }

    /// Resolve every path against `root` instead of searching for one.
    ///
    /// The root is canonicalized so it compares equal to canonicalized inputs.
    pub fn with_source_root(mut self, root: SourceRoot) -> Self {
        let source = std::fs::canonicalize(root.source()).unwrap_or_else(|_| root.source().to_path_buf());
        self.root_override = Some(SourceRoot::new(source));
        self
    }

    /// The package owning `path`, or `None` when it is unknown.
    pub async fn resolve(&self, path: &Path) -> Option<PackageInfo> {
        self.locate(path).await.map(|(_, package)| package)
    }

    /// Like [`Self::resolve`], also returning the source root the package lives in.
    pub async fn locate(&self, path: &Path) -> Option<(SourceRoot, PackageInfo)> {
        let canonical = match tokio::fs::canonicalize(path).await {
            Ok(p) => p,
            // Nonexistent files are still resolvable by their lexical path.
            Err(_) if path.is_absolute() => path.to_path_buf(),
            Err(_) => return None,
        };

        let root = match &self.root_override {
            Some(root) => root.clone(),
            None => SourceRoot::find(&canonical)?,
        };
        let relative = root.relative(&canonical)?;
        let mapping = self.mapping(&root).await;

        let package = relative
            .ancestors()
            .filter(|dir| !dir.as_os_str().is_empty())
            .find_map(|dir| mapping.get(dir).map(|atom| PackageInfo::new(dir, atom.clone())));
        if package.is_none() {
            tracing::debug!(path = %canonical.display(), "no package owns file");
        }
        package.map(|p| (root, p))
    }

    async fn mapping(&self, root: &SourceRoot) -> Arc<Mapping> {
        match self.source {
            MappingSource::Static => Arc::new(static_mapping()),
            MappingSource::Generated => {
                let mut cache = self.generated.lock().await;
                if let Some(mapping) = cache.get(root.source()) {
                    return Arc::clone(mapping);
                }
                let mapping = Arc::new(generate_mapping(root).await);
                tracing::info!(
                    root = %root.source().display(),
                    packages = mapping.len(),
                    "generated package mapping"
                );
                cache.insert(root.source().to_path_buf(), Arc::clone(&mapping));
                mapping
            }
        }
    }
}

impl Default for PackageResolver {
    fn default() -> Self {
        Self::new(MappingSource::default())
    }
}

fn static_mapping() -> Mapping {
    STATIC_PACKAGES
        .iter()
        .filter_map(|(dir, atom)| Some((PathBuf::from(dir), Atom::parse(atom).ok()?)))
        .collect()
}

/// Scan overlays for live platform2 ebuilds.
///
/// Entries are visited in sorted order; when two ebuilds claim the same
/// subdirectory the first one registered wins.
async fn generate_mapping(root: &SourceRoot) -> Mapping {
    let mut mapping = Mapping::new();
    for overlay in OVERLAY_DIRS {
        let overlay = root.join(overlay);
        for category in sorted_dirs(&overlay).await {
            for package in sorted_dirs(&category).await {
                let Some(atom) = atom_for(&category, &package) else {
                    continue;
                };
                let ebuild = package.join(format!("{}-9999.ebuild", atom.name()));
                let Ok(content) = tokio::fs::read_to_string(&ebuild).await else {
                    continue;
                };
                if let Some(subdir) = platform_subdir(&content) {
                    let dir = Path::new("src/platform2").join(subdir);
                    mapping.entry(dir).or_insert(atom);
                }
            }
        }
    }
    mapping
}

fn atom_for(category: &Path, package: &Path) -> Option<Atom> {
    let category = category.file_name()?.to_str()?;
    let name = package.file_name()?.to_str()?;
    Some(Atom::new(category, name))
}

/// `PLATFORM_SUBDIR` of an ebuild that inherits the `platform` eclass.
pub fn platform_subdir(ebuild: &str) -> Option<String> {
    let inherits_platform = INHERIT_PATTERN
        .captures_iter(ebuild)
        .any(|caps| caps[1].split_whitespace().any(|eclass| eclass == "platform"));
    if !inherits_platform {
        return None;
    }
    SUBDIR_PATTERN.captures(ebuild).map(|caps| caps[1].to_string())
}

/// Subdirectories of `dir`, sorted; empty when `dir` is unreadable.
async fn sorted_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return dirs;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    dirs
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
