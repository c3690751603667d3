// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide resolve`: show which package owns a file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::format_or_json;

#[derive(Args)]
pub struct ResolveArgs {
    /// Source or build file inside a checkout
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct Resolved {
    atom: String,
    source_dir: PathBuf,
    source_root: PathBuf,
    compdb: PathBuf,
}

pub async fn handle(ctx: &Context, args: ResolveArgs) -> Result<()> {
    let resolver = ctx.resolver();
    let Some((root, package)) = resolver.locate(&args.path).await else {
        return Err(ExitError::unknown_package(&args.path).into());
    };

    let resolved = Resolved {
        atom: package.atom.to_string(),
        source_dir: package.source_dir.clone(),
        source_root: root.source().to_path_buf(),
        compdb: root.join(package.compdb_path()),
    };
    format_or_json(ctx.format, &resolved, || {
        println!(
            "{} {}",
            color::header(&resolved.atom),
            color::literal(&resolved.source_dir.display().to_string())
        );
    })
}
