// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide board`: persist or show the default board.

use anyhow::Result;
use cide_core::Board;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::{parse_board, Context};
use crate::color;
use crate::env;
use crate::output::format_or_json;

#[derive(Args)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[derive(Subcommand)]
pub enum BoardCommand {
    /// Set the default board (`host` for the host sysroot)
    Set {
        #[arg(value_parser = parse_board)]
        board: Board,
    },
    /// Show the board generation would use
    Show {},
}

#[derive(Serialize)]
struct BoardInfo {
    board: Option<Board>,
    /// Where the answer came from: `env` or `config`.
    source: Option<&'static str>,
}

pub fn handle(ctx: Context, args: BoardArgs) -> Result<()> {
    match args.command {
        BoardCommand::Set { board } => handle_set(ctx, board),
        BoardCommand::Show {} => handle_show(&ctx),
    }
}

fn handle_set(mut ctx: Context, board: Board) -> Result<()> {
    ctx.config.board = Some(board.clone());
    ctx.config.save(&ctx.config_dir)?;
    tracing::info!(%board, dir = %ctx.config_dir.display(), "saved default board");
    format_or_json(ctx.format, &BoardInfo { board: Some(board.clone()), source: Some("config") }, || {
        println!("Default board set to {}", color::header(&board.to_string()));
    })
}

fn handle_show(ctx: &Context) -> Result<()> {
    let info = match (env::board_override(), &ctx.config.board) {
        (Some(board), _) => BoardInfo { board: Some(board), source: Some("env") },
        (None, Some(board)) => BoardInfo { board: Some(board.clone()), source: Some("config") },
        (None, None) => BoardInfo { board: None, source: None },
    };
    format_or_json(ctx.format, &info, || match (&info.board, info.source) {
        (Some(board), Some(source)) => println!("{} ({})", color::header(&board.to_string()), source),
        _ => println!("No board configured"),
    })
}
