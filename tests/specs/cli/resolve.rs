// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide resolve` specs

use crate::prelude::*;

fn codelab_project() -> Project {
    let project = Project::empty();
    project.platform_package("chromeos-base/codelab", "codelab");
    project.file("src/platform2/codelab/codelab.cc", "int main() {}\n");
    project
}

#[test]
fn resolves_file_through_generated_mapping() {
    let project = codelab_project();
    project
        .cide()
        .args(&["resolve", "src/platform2/codelab/codelab.cc"])
        .passes()
        .stdout_eq("chromeos-base/codelab src/platform2/codelab\n");
}

#[test]
fn resolves_with_static_mapping() {
    let project = Project::empty();
    project.file("src/platform2/shill/manager.cc", "");
    std::fs::write(project.config_dir().join("config.toml"), "mapping = \"static\"\n").unwrap();

    project
        .cide()
        .args(&["resolve", "src/platform2/shill/manager.cc"])
        .passes()
        .stdout_has("chromeos-base/shill");
}

#[test]
fn json_output_names_the_compdb_destination() {
    let project = codelab_project();
    let run = project
        .cide()
        .args(&["resolve", "-o", "json", "src/platform2/codelab/codelab.cc"])
        .passes();

    let json: serde_json::Value = serde_json::from_str(run.stdout()).unwrap();
    assert_eq!(json["atom"], "chromeos-base/codelab");
    assert_eq!(json["source_dir"], "src/platform2/codelab");
    let compdb = project.path().join("src/platform2/codelab/compile_commands.json");
    assert_eq!(json["compdb"], compdb.to_string_lossy().as_ref());
}

#[test]
fn unknown_file_exits_with_usage_code() {
    let project = codelab_project();
    project.file("src/platform2/unowned/a.cc", "");
    project
        .cide()
        .args(&["resolve", "src/platform2/unowned/a.cc"])
        .fails()
        .code(2)
        .stderr_has("no known package owns");
}

#[test]
fn file_outside_any_checkout_is_unknown() {
    cli().args(&["resolve", "/etc/hosts"]).fails().code(2);
}
