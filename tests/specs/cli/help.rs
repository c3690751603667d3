// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn cide_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn cide_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("resolve")
        .stdout_has("generate")
        .stdout_has("watch")
        .stdout_has("board");
}

#[test]
fn cide_version_includes_package_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn cide_board_help_shows_subcommands() {
    cli().args(&["board", "--help"]).passes().stdout_has("set").stdout_has("show");
}

#[test]
fn cide_watch_help_shows_flags() {
    cli()
        .args(&["watch", "--help"])
        .passes()
        .stdout_has("--no-watch")
        .stdout_has("--no-desktop")
        .stdout_has("--board");
}

#[test]
fn unknown_command_fails() {
    cli().args(&["frobnicate"]).fails().code(2);
}
