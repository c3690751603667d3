// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drive an ebuild to produce a compilation database and find it on disk.
//!
//! One invocation walks four steps and keeps no state between invocations:
//!
//! 1. remove `.configured` / `.compiled` markers so portage re-runs the
//!    configure and compile phases,
//! 2. look up the live (`9999`) ebuild and run it with the requested USE
//!    flags,
//! 3. search every candidate build directory for the artifact,
//! 4. return the newest match.
//!
//! Build output lands in a different directory depending on whether the
//! package uses the incremental build cache, so every candidate is searched
//! and modification time disambiguates stale leftovers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use cide_adapters::{CommandSpec, ProcessAdapter, StatusSink};
use cide_core::{Atom, Board, SourceRoot};

use crate::error::{CompdbCause, CompdbError};

/// Portage phase markers that make it skip regenerating compile commands.
pub const CACHE_MARKERS: &[&str] = &[".configured", ".compiled"];

/// Artifact written when the build runs inside the chroot.
pub const ARTIFACT_CHROOT: &str = "compile_commands_chroot.json";

/// Artifact with paths translated for use outside the chroot.
pub const ARTIFACT_NO_CHROOT: &str = "compile_commands_no_chroot.json";

/// USE flags for a compdb-only pass (no compilation).
pub const COMPDB_ONLY_FLAGS: &[&str] = &["compdb_only", "test"];

/// USE flags for a full compile that also emits the compdb.
pub const FULL_BUILD_FLAGS: &[&str] = &["compilation_database", "test"];

/// Which side of the chroot boundary this process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChrootMode {
    Inside,
    #[default]
    Outside,
}

impl ChrootMode {
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ChrootMode::Inside => ARTIFACT_CHROOT,
            ChrootMode::Outside => ARTIFACT_NO_CHROOT,
        }
    }
}

/// One `(board, atom, flags)` generation request.
pub struct Ebuild<'a, P: ProcessAdapter + ?Sized> {
    process: &'a P,
    root: &'a SourceRoot,
    mode: ChrootMode,
    board: &'a Board,
    atom: &'a Atom,
    use_flags: &'a [&'a str],
    log: Option<Arc<dyn StatusSink>>,
}

impl<'a, P: ProcessAdapter + ?Sized> Ebuild<'a, P> {
    pub fn new(
        process: &'a P,
        root: &'a SourceRoot,
        mode: ChrootMode,
        board: &'a Board,
        atom: &'a Atom,
        use_flags: &'a [&'a str],
    ) -> Self {
        Self { process, root, mode, board, atom, use_flags, log: None }
    }

    pub fn log_to(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.log = Some(sink);
        self
    }

    /// Run the build and return the host path of the produced artifact.
    pub async fn generate(&self) -> Result<PathBuf, CompdbError> {
        tracing::info!(board = %self.board, atom = %self.atom, flags = ?self.use_flags, "running ebuild");
        self.remove_cache().await?;
        self.run_ebuild().await?;
        self.locate_artifact().await
    }

    /// Candidate build directories, as chroot paths.
    pub fn build_dirs(&self) -> Vec<PathBuf> {
        let sysroot = self.board.sysroot();
        vec![
            // CROS_WORKON_INCREMENTAL_BUILD=1
            sysroot.join("var/cache/portage").join(self.atom.category()).join(self.atom.name()),
            sysroot
                .join("tmp/portage")
                .join(self.atom.category())
                .join(format!("{}-9999", self.atom.name())),
        ]
    }

    /// A chroot path as seen from this process.
    fn local_path(&self, chroot_path: &Path) -> PathBuf {
        match self.mode {
            ChrootMode::Inside => chroot_path.to_path_buf(),
            ChrootMode::Outside => self.root.chroot_to_host(chroot_path),
        }
    }

    /// Run `program args` inside the chroot.
    fn chroot_command(&self, program: &str, args: &[String]) -> CommandSpec {
        let spec = match self.mode {
            ChrootMode::Inside => CommandSpec::new(program).args(args.iter().cloned()),
            ChrootMode::Outside => CommandSpec::new("cros_sdk")
                .arg("--")
                .arg(program)
                .args(args.iter().cloned())
                .cwd(self.root.source()),
        };
        match &self.log {
            Some(log) => spec.log_to(Arc::clone(log)),
            None => spec,
        }
    }

    async fn remove_cache(&self) -> Result<(), CompdbError> {
        for dir in self.build_dirs() {
            for marker in CACHE_MARKERS {
                let chroot_cache = dir.join(marker);
                let cache = self.local_path(&chroot_cache);
                let rm = ["rm".to_string(), "-f".to_string(), chroot_cache.to_string_lossy().into_owned()];
                let spec = match self.mode {
                    ChrootMode::Inside => self.chroot_command("rm", &rm[1..]).privileged(),
                    ChrootMode::Outside => self.chroot_command("sudo", &rm),
                };
                if let Err(e) = self.process.exec(&spec).await {
                    return Err(CompdbError::RemoveCache { cache, source: Some(e.into()) });
                }
            }
        }
        Ok(())
    }

    async fn run_ebuild(&self) -> Result<(), CompdbError> {
        let run_error = |cause: CompdbCause| CompdbError::RunEbuild {
            board: self.board.clone(),
            atom: self.atom.clone(),
            source: Some(cause),
        };

        let which = self.chroot_command(
            &self.board.tool("equery"),
            &["which".to_string(), format!("={}", self.atom.live_version())],
        );
        let output = self.process.exec(&which).await.map_err(|e| run_error(e.into()))?;
        let ebuild_path = output.stdout.trim();
        if ebuild_path.is_empty() {
            return Err(CompdbError::RunEbuild {
                board: self.board.clone(),
                atom: self.atom.clone(),
                source: None,
            });
        }

        let args = vec![
            format!("USE={}", self.use_flags.join(" ")),
            self.board.tool("ebuild"),
            ebuild_path.to_string(),
            "compile".to_string(),
        ];
        let spec = match self.mode {
            ChrootMode::Inside => self.chroot_command("env", &args).privileged(),
            ChrootMode::Outside => {
                let mut sudo_args = vec!["env".to_string()];
                sudo_args.extend(args);
                self.chroot_command("sudo", &sudo_args)
            }
        };
        self.process.exec(&spec).await.map_err(|e| run_error(e.into()))?;
        Ok(())
    }

    async fn locate_artifact(&self) -> Result<PathBuf, CompdbError> {
        let artifact = self.mode.artifact_name();
        let mut patterns = Vec::new();
        for dir in self.build_dirs() {
            let dir = self.local_path(&dir);
            patterns.push(format!(
                "{}/**/{}",
                glob::Pattern::escape(&dir.to_string_lossy()),
                artifact
            ));
        }

        let found = tokio::task::spawn_blocking(move || find_candidates(&patterns))
            .await
            .map_err(|e| CompdbError::NotGenerated {
                atom: self.atom.clone(),
                source: Some(CompdbCause::Io(std::io::Error::other(e))),
            })?
            .map_err(|e| CompdbError::NotGenerated { atom: self.atom.clone(), source: Some(e.into()) })?;

        if found.len() > 1 {
            tracing::warn!(atom = %self.atom, candidates = ?found, "multiple artifacts found; using the newest");
        }
        select_latest(found).ok_or_else(|| CompdbError::NotGenerated {
            atom: self.atom.clone(),
            source: None,
        })
    }
}

/// Every existing file matching `patterns`, with its modification time.
fn find_candidates(patterns: &[String]) -> Result<Vec<(SystemTime, PathBuf)>, glob::PatternError> {
    let mut found = Vec::new();
    for pattern in patterns {
        for path in glob::glob(pattern)?.flatten() {
            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            found.push((mtime, path));
        }
    }
    Ok(found)
}

/// Newest candidate; equal times fall back to the lexicographically greatest path.
///
/// The path tie-break is arbitrary but deterministic.
pub fn select_latest(candidates: Vec<(SystemTime, PathBuf)>) -> Option<PathBuf> {
    candidates.into_iter().max().map(|(_, path)| path)
}

#[cfg(test)]
#[path = "ebuild_tests.rs"]
mod tests;
