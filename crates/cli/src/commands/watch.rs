// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide watch`: feed editor events into the controller for a session.
//!
//! Events arrive as lines on stdin (`open <path>` when a file gains focus,
//! `save <path>` when it is written) and, unless disabled, from a filesystem
//! watcher that reports saved build files. The session ends at Ctrl-C, or at
//! end of input when no watcher is running.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use cide_adapters::{DesktopNotifyAdapter, LogNotifyAdapter, NotifyAdapter, TracingStatusSink};
use cide_core::{Board, SourceRoot};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::{parse_board, Context, Controller};
use crate::output::{print_outcome, watch_build_files};

/// Directory watched for build-file saves, relative to the source root.
const DEFAULT_WATCH_DIR: &str = "src/platform2";

#[derive(Args)]
pub struct WatchArgs {
    /// Board to build for (defaults to CIDE_BOARD, then the configured board)
    #[arg(long, value_parser = parse_board)]
    pub board: Option<Board>,

    /// Directory to watch for build-file saves (default: <source root>/src/platform2)
    #[arg(long, conflicts_with = "no_watch")]
    pub watch_dir: Option<PathBuf>,

    /// Only react to events on stdin
    #[arg(long)]
    pub no_watch: bool,

    /// Report errors in the log instead of desktop notifications
    #[arg(long)]
    pub no_desktop: bool,
}

/// An editor event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Open,
    Save,
}

impl EditorEvent {
    fn as_str(&self) -> &'static str {
        match self {
            EditorEvent::Open => "open",
            EditorEvent::Save => "save",
        }
    }
}

/// Parse one stdin line. Relative paths are taken relative to `cwd`.
pub fn parse_event(line: &str, cwd: &Path) -> Option<(EditorEvent, PathBuf)> {
    let (verb, path) = line.trim().split_once(char::is_whitespace)?;
    let event = match verb {
        "open" | "focus" => EditorEvent::Open,
        "save" => EditorEvent::Save,
        _ => return None,
    };
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some((event, cwd.join(path)))
}

pub async fn handle(ctx: &Context, args: WatchArgs) -> Result<()> {
    if args.no_desktop {
        run(ctx, args, LogNotifyAdapter).await
    } else {
        run(ctx, args, DesktopNotifyAdapter::new()).await
    }
}

async fn run<N: NotifyAdapter>(ctx: &Context, args: WatchArgs, notifier: N) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let controller =
        Arc::new(ctx.controller(notifier, Arc::new(TracingStatusSink::new()), args.board.clone()));

    let (tx, mut rx) = mpsc::channel(64);
    let watcher = match watch_dir(ctx, &args, &cwd) {
        Some(dir) => match watch_build_files(&dir, tx) {
            Ok(watcher) => {
                tracing::info!(dir = %dir.display(), "watching for build file changes");
                Some(watcher)
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot watch directory");
                None
            }
        },
        None => None,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut tasks = JoinSet::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_event(&line, &cwd) {
                    Some((event, path)) => dispatch(&mut tasks, &controller, event, path),
                    None if line.trim().is_empty() => {}
                    None => tracing::warn!(%line, "ignoring unrecognized event"),
                },
                Ok(None) | Err(_) => {
                    stdin_open = false;
                    if watcher.is_none() {
                        break;
                    }
                }
            },
            Some(path) = rx.recv() => dispatch(&mut tasks, &controller, EditorEvent::Save, path),
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "event handler failed");
                }
            }
            _ = &mut ctrl_c => {
                tasks.abort_all();
                return Ok(());
            }
        }
    }

    // End of input: let in-flight generations finish.
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "event handler failed");
        }
    }
    Ok(())
}

fn watch_dir(ctx: &Context, args: &WatchArgs, cwd: &Path) -> Option<PathBuf> {
    if args.no_watch {
        return None;
    }
    if let Some(dir) = &args.watch_dir {
        return Some(cwd.join(dir));
    }
    let root = match &ctx.config.source_root {
        Some(root) => SourceRoot::new(root),
        None => SourceRoot::find(cwd)?,
    };
    let dir = root.join(DEFAULT_WATCH_DIR);
    dir.is_dir().then_some(dir)
}

fn dispatch<N: NotifyAdapter>(
    tasks: &mut JoinSet<()>,
    controller: &Arc<Controller<N>>,
    event: EditorEvent,
    path: PathBuf,
) {
    let controller = Arc::clone(controller);
    tasks.spawn(async move {
        let outcome = match event {
            EditorEvent::Open => controller.on_file_focused(&path).await,
            EditorEvent::Save => controller.on_file_saved(&path).await,
        };
        print_outcome(event.as_str(), &path, &outcome);
    });
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
