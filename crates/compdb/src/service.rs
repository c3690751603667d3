// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Produce and install a package's `compile_commands.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cide_adapters::{ProcessAdapter, StatusSink};
use cide_core::{Atom, Board, CompilationDatabase, PackageInfo, SourceRoot, COMPDB_FILE_NAME};

use crate::ebuild::{ChrootMode, Ebuild, COMPDB_ONLY_FLAGS, FULL_BUILD_FLAGS};
use crate::error::{CompdbCause, CompdbError};

/// Generates validated compilation databases and publishes them atomically.
pub struct CompdbService<P> {
    process: Arc<P>,
    mode: ChrootMode,
    log: Option<Arc<dyn StatusSink>>,
}

impl<P: ProcessAdapter> CompdbService<P> {
    pub fn new(process: Arc<P>, mode: ChrootMode) -> Self {
        Self { process, mode, log: None }
    }

    /// Stream build output into `sink`.
    pub fn log_to(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.log = Some(sink);
        self
    }

    pub fn mode(&self) -> ChrootMode {
        self.mode
    }

    /// Build the compdb for `package` and install it into its source directory.
    ///
    /// A compdb-only pass runs first. If its output references files that do
    /// not exist yet (typically sources generated during compilation), a full
    /// build of the package runs and its artifact is used instead.
    pub async fn generate(
        &self,
        root: &SourceRoot,
        board: &Board,
        package: &PackageInfo,
    ) -> Result<PathBuf, CompdbError> {
        let atom = &package.atom;
        let mut artifact = self.locate(root, board, atom, COMPDB_ONLY_FLAGS).await?;

        let missing = missing_files(atom, &artifact).await?;
        if !missing.is_empty() {
            tracing::info!(
                %atom,
                missing = missing.len(),
                first = %missing[0].display(),
                "compdb references missing files; running a full build"
            );
            artifact = self.locate(root, board, atom, FULL_BUILD_FLAGS).await?;
        }

        let destination = root.join(package.compdb_path());
        publish(&artifact, &destination).await?;
        tracing::info!(%atom, path = %destination.display(), "published compilation database");
        Ok(destination)
    }

    async fn locate(
        &self,
        root: &SourceRoot,
        board: &Board,
        atom: &Atom,
        flags: &[&str],
    ) -> Result<PathBuf, CompdbError> {
        let ebuild = Ebuild::new(self.process.as_ref(), root, self.mode, board, atom, flags);
        match &self.log {
            Some(log) => ebuild.log_to(Arc::clone(log)).generate().await,
            None => ebuild.generate().await,
        }
    }
}

/// Files the artifact references that are absent on disk.
async fn missing_files(atom: &Atom, artifact: &Path) -> Result<Vec<PathBuf>, CompdbError> {
    let not_generated =
        |cause: CompdbCause| CompdbError::NotGenerated { atom: atom.clone(), source: Some(cause) };

    let bytes = tokio::fs::read(artifact).await.map_err(|e| not_generated(e.into()))?;
    let compdb = CompilationDatabase::from_slice(&bytes).map_err(|e| not_generated(e.into()))?;
    tokio::task::spawn_blocking(move || compdb.missing_files(Path::exists))
        .await
        .map_err(|e| not_generated(CompdbCause::Io(std::io::Error::other(e))))
}

/// Copy `artifact` over `destination` without ever exposing a partial file.
///
/// The copy goes to a uniquely named sibling of `destination`, which is then
/// renamed into place. The temporary file is removed on every path. An
/// existing `destination` symlink is replaced, not written through.
pub async fn publish(artifact: &Path, destination: &Path) -> Result<(), CompdbError> {
    let tmp = temp_path(destination);
    let result = async {
        tokio::fs::copy(artifact, &tmp).await?;
        tokio::fs::rename(&tmp, destination).await
    }
    .await;

    if let Err(e) = tokio::fs::remove_file(&tmp).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %tmp.display(), error = %e, "failed to remove temporary compdb");
        }
    }

    result.map_err(|e| CompdbError::CopyFailed {
        destination: destination.to_path_buf(),
        source: Some(e.into()),
    })
}

fn temp_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| COMPDB_FILE_NAME.to_string());
    destination.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
