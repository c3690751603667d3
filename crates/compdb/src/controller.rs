// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decide when to generate, and report failures to the user.
//!
//! The controller owns all session state: which `(board, atom)` pairs have a
//! published compdb, which are being generated, and which error kinds the user
//! has already been shown. One controller lives for one editor session.
//!
//! Handlers only resolve the file and check session state before handing the
//! work to the per-package [`JobManager`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cide_adapters::{BoardProvider, NotifyAdapter, ProcessAdapter, StatusSink, TaskStatus};
use cide_core::{Atom, Board, PackageInfo, SourceRoot};
use parking_lot::Mutex;

use crate::error::{CompdbError, CompdbErrorKind};
use crate::job::JobManager;
use crate::resolver::PackageResolver;
use crate::service::CompdbService;

/// Task name shown in the status indicator.
pub const STATUS_TASK: &str = "C++ xrefs";

/// Extensions of files whose focus may trigger generation.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hh", "hpp"];

/// Extensions of build-definition files whose save always regenerates.
pub const BUILD_FILE_EXTENSIONS: &[&str] = &["gn", "gni"];

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e))
}

pub fn is_build_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| BUILD_FILE_EXTENSIONS.contains(&e))
}

/// Lifecycle of one package's compdb within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    NotGenerated,
    Generating,
    Generated,
}

/// Why a trigger did not start a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a C/C++ source (focus) or not a build file (save).
    NotCandidate,
    /// No package owns the file.
    UnknownPackage,
    /// No board is configured.
    NoBoard,
    /// Already generated in this session and still on disk.
    UpToDate,
    /// A generation for the package is already running.
    InProgress,
}

/// Result of handling one editor event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// Superseded by a later request before it started.
    Cancelled,
    Generated(PathBuf),
    Failed(CompdbErrorKind),
}

type Key = (Board, Atom);

#[derive(Default)]
struct Session {
    /// Published compdb per package.
    generated: HashMap<Key, PathBuf>,
    /// Outstanding requests per package, running or queued.
    in_flight: HashMap<Key, usize>,
    /// Error kinds already surfaced interactively.
    shown: HashSet<CompdbErrorKind>,
}

/// Collaborators of a [`CompdbController`].
pub struct ControllerDeps<P, N, B> {
    pub resolver: PackageResolver,
    pub service: CompdbService<P>,
    pub notifier: N,
    pub boards: B,
    pub status: Arc<dyn StatusSink>,
}

pub struct CompdbController<P, N, B> {
    resolver: PackageResolver,
    service: Arc<CompdbService<P>>,
    notifier: N,
    boards: B,
    status: Arc<dyn StatusSink>,
    jobs: Mutex<HashMap<Key, JobManager<PathBuf, CompdbError>>>,
    session: Mutex<Session>,
}

impl<P, N, B> CompdbController<P, N, B>
where
    P: ProcessAdapter,
    N: NotifyAdapter,
    B: BoardProvider,
{
    pub fn new(deps: ControllerDeps<P, N, B>) -> Self {
        Self {
            resolver: deps.resolver,
            service: Arc::new(deps.service),
            notifier: deps.notifier,
            boards: deps.boards,
            status: deps.status,
            jobs: Mutex::default(),
            session: Mutex::default(),
        }
    }

    /// A file became the active editor.
    ///
    /// Generates when the file is a C/C++ source of a known package that has
    /// no compdb from this session, or whose compdb has since disappeared.
    pub async fn on_file_focused(&self, path: &Path) -> Outcome {
        if !is_source_file(path) {
            return Outcome::Skipped(SkipReason::NotCandidate);
        }
        let (root, board, package) = match self.target(path).await {
            Ok(target) => target,
            Err(reason) => return Outcome::Skipped(reason),
        };
        match self.state(&board, &package.atom) {
            GenerationState::Generated => Outcome::Skipped(SkipReason::UpToDate),
            GenerationState::Generating => Outcome::Skipped(SkipReason::InProgress),
            GenerationState::NotGenerated => self.generate(root, board, package).await,
        }
    }

    /// A file was saved. Build files always regenerate their package.
    pub async fn on_file_saved(&self, path: &Path) -> Outcome {
        if !is_build_file(path) {
            return Outcome::Skipped(SkipReason::NotCandidate);
        }
        self.regenerate(path).await
    }

    /// Regenerate the package owning `path` regardless of session state.
    pub async fn regenerate(&self, path: &Path) -> Outcome {
        match self.target(path).await {
            Ok((root, board, package)) => self.generate(root, board, package).await,
            Err(reason) => Outcome::Skipped(reason),
        }
    }

    /// Current state of `atom` on `board`.
    ///
    /// A recorded compdb that no longer exists on disk is forgotten, moving the
    /// package back to [`GenerationState::NotGenerated`].
    pub fn state(&self, board: &Board, atom: &Atom) -> GenerationState {
        let key = (board.clone(), atom.clone());
        let mut session = self.session.lock();
        if session.in_flight.get(&key).is_some_and(|n| *n > 0) {
            return GenerationState::Generating;
        }
        match session.generated.get(&key) {
            Some(path) if path.exists() => GenerationState::Generated,
            Some(path) => {
                tracing::info!(%atom, path = %path.display(), "published compdb disappeared");
                session.generated.remove(&key);
                GenerationState::NotGenerated
            }
            None => GenerationState::NotGenerated,
        }
    }

    async fn target(&self, path: &Path) -> Result<(SourceRoot, Board, PackageInfo), SkipReason> {
        let (root, package) = self.resolver.locate(path).await.ok_or(SkipReason::UnknownPackage)?;
        let board = self.boards.board().await.ok_or(SkipReason::NoBoard)?;
        Ok((root, board, package))
    }

    fn job_manager(&self, key: &Key) -> JobManager<PathBuf, CompdbError> {
        self.jobs.lock().entry(key.clone()).or_default().clone()
    }

    async fn generate(&self, root: SourceRoot, board: Board, package: PackageInfo) -> Outcome {
        let key = (board.clone(), package.atom.clone());
        *self.session.lock().in_flight.entry(key.clone()).or_default() += 1;
        self.status.set_status(STATUS_TASK, TaskStatus::Running);
        self.status.append(&format!("Generating compilation database for {} ({})", package.atom, board));

        let service = Arc::clone(&self.service);
        let result = self
            .job_manager(&key)
            .offer(async move { service.generate(&root, &board, &package).await })
            .await;

        {
            let mut session = self.session.lock();
            if let Some(n) = session.in_flight.get_mut(&key) {
                *n = n.saturating_sub(1);
                if *n == 0 {
                    session.in_flight.remove(&key);
                }
            }
            if let Ok(Some(path)) = &result {
                session.generated.insert(key.clone(), path.clone());
            }
        }

        match result {
            Ok(Some(path)) => {
                self.status.append(&format!("Published {}", path.display()));
                self.status.set_status(STATUS_TASK, TaskStatus::Ok);
                if let Err(e) = self.notifier.compdb_updated(&path).await {
                    tracing::warn!(error = %e, "failed to report compdb update");
                }
                Outcome::Generated(path)
            }
            Ok(None) => {
                tracing::debug!(atom = %key.1, "generation superseded");
                Outcome::Cancelled
            }
            Err(e) => {
                let kind = e.kind();
                self.report(e).await;
                Outcome::Failed(kind)
            }
        }
    }

    /// Log a failure; show it interactively only the first time its kind occurs.
    async fn report(&self, error: CompdbError) {
        let kind = error.kind();
        let detail = error.detail();
        tracing::error!(%kind, error = %detail, "compdb generation failed");
        self.status.append(&detail);
        self.status.set_status(STATUS_TASK, TaskStatus::Error);

        let first = self.session.lock().shown.insert(kind);
        if !first {
            return;
        }
        if let Err(e) = self.notifier.show_error(&error.user_message(), error.remedy()).await {
            tracing::warn!(error = %e, "failed to show error");
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
