// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide generate`: build and install the compdb for a file's package.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use cide_adapters::{LogNotifyAdapter, TracingStatusSink};
use cide_compdb::{Outcome, SkipReason};
use cide_core::Board;
use clap::Args;
use serde::Serialize;

use super::{parse_board, Context};
use crate::color;
use crate::exit_error::{ExitError, EXIT_FAILED};
use crate::output::format_or_json;

#[derive(Args)]
pub struct GenerateArgs {
    /// Any file belonging to the package
    pub path: PathBuf,

    /// Board to build for (defaults to CIDE_BOARD, then the configured board)
    #[arg(long, value_parser = parse_board)]
    pub board: Option<Board>,
}

#[derive(Serialize)]
struct Generated<'a> {
    compdb: &'a std::path::Path,
}

pub async fn handle(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let controller = ctx.controller(LogNotifyAdapter, Arc::new(TracingStatusSink::new()), args.board);

    match controller.regenerate(&args.path).await {
        Outcome::Generated(path) => format_or_json(ctx.format, &Generated { compdb: &path }, || {
            println!("{}", color::literal(&path.display().to_string()));
        }),
        Outcome::Skipped(SkipReason::NoBoard) => Err(ExitError::no_board().into()),
        Outcome::Skipped(_) => Err(ExitError::unknown_package(&args.path).into()),
        // A fresh controller has nothing queued to supersede it.
        Outcome::Cancelled => Ok(()),
        Outcome::Failed(kind) => {
            Err(ExitError::new(EXIT_FAILED, format!("compdb generation failed ({kind})")).into())
        }
    }
}
