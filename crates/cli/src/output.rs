// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use cide_compdb::{is_build_file, Outcome, SkipReason};
use clap::ValueEnum;
use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `data` as pretty JSON, or run `text_fn` for human output.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}

pub fn skip_reason_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotCandidate => "not a candidate file",
        SkipReason::UnknownPackage => "no known package",
        SkipReason::NoBoard => "no board configured",
        SkipReason::UpToDate => "up to date",
        SkipReason::InProgress => "already generating",
    }
}

/// One-line, uncolored rendering of an event outcome.
pub fn outcome_label(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Generated(path) => format!("generated {}", path.display()),
        Outcome::Skipped(reason) => format!("skipped ({})", skip_reason_label(*reason)),
        Outcome::Cancelled => "superseded".to_string(),
        Outcome::Failed(kind) => format!("failed ({kind})"),
    }
}

/// Colored line for `cide watch`.
pub fn print_outcome(event: &str, path: &Path, outcome: &Outcome) {
    let label = outcome_label(outcome);
    let label = match outcome {
        Outcome::Failed(_) => color::error(&label),
        _ => label,
    };
    println!("{} {}: {}", color::header(event), color::literal(&path.display().to_string()), label);
}

/// Watch `dir` recursively and forward every created or modified build file.
///
/// The returned watcher must be kept alive for events to keep flowing.
pub fn watch_build_files(
    dir: &Path,
    tx: mpsc::Sender<PathBuf>,
) -> notify::Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, _>| {
        let Ok(event) = res else {
            return;
        };
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        for path in event.paths.into_iter().filter(|p| is_build_file(p)) {
            let _ = tx.blocking_send(path);
        }
    })?;
    watcher.watch(dir, RecursiveMode::Recursive)?;
    Ok(watcher)
}
