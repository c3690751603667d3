// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide board` specs

use crate::prelude::*;

#[test]
fn show_without_board_reports_none() {
    let project = Project::empty();
    project.cide().args(&["board", "show"]).passes().stdout_has("No board configured");
}

#[test]
fn set_persists_board_for_later_commands() {
    let project = Project::empty();
    project.cide().args(&["board", "set", "amd64-generic"]).passes().stdout_has("amd64-generic");

    project.cide().args(&["board", "show"]).passes().stdout_eq("amd64-generic (config)\n");
    let config = std::fs::read_to_string(project.config_dir().join("config.toml")).unwrap();
    assert!(config.contains("board = \"amd64-generic\""), "config: {config}");
}

#[test]
fn environment_overrides_configured_board() {
    let project = Project::empty();
    project.cide().args(&["board", "set", "eve"]).passes();

    project
        .cide()
        .env("CIDE_BOARD", "host")
        .args(&["board", "show"])
        .passes()
        .stdout_eq("host (env)\n");
}

#[test]
fn show_json_is_machine_readable() {
    let project = Project::empty();
    project.cide().args(&["board", "set", "host"]).passes();

    let run = project.cide().args(&["board", "show", "-o", "json"]).passes();
    let json: serde_json::Value = serde_json::from_str(run.stdout()).unwrap();
    assert_eq!(json["board"], "host");
    assert_eq!(json["source"], "config");
}

#[test]
fn blank_board_name_is_rejected() {
    let project = Project::empty();
    project.cide().args(&["board", "set", " "]).fails().stderr_has("must not be empty");
}

#[test]
fn unreadable_config_is_reported() {
    let project = Project::empty();
    std::fs::write(project.config_dir().join("config.toml"), "mapping = 3\n").unwrap();
    project.cide().args(&["board", "show"]).fails().code(1).stderr_has("invalid config");
}
