// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide watch` specs driven through stdin.

use crate::prelude::*;

fn watch(project: &Project) -> CliBuilder {
    project.cide().args(&["watch", "--no-watch", "--no-desktop", "--board", "amd64-generic"])
}

#[test]
fn ignores_files_that_are_not_candidates() {
    let project = Project::empty();
    project.platform_package("chromeos-base/codelab", "codelab");

    watch(&project)
        .stdin("open src/platform2/codelab/README.md\nsave src/platform2/codelab/codelab.cc\n")
        .passes()
        .stdout_has("README.md: skipped (not a candidate file)")
        .stdout_has("codelab.cc: skipped (not a candidate file)");
}

#[test]
fn reports_files_without_a_package() {
    let project = Project::empty();
    watch(&project)
        .stdin("open src/platform2/unowned/a.cc\n")
        .passes()
        .stdout_has("a.cc: skipped (no known package)");
}

#[test]
fn unrecognized_lines_are_ignored() {
    let project = Project::empty();
    watch(&project)
        .stdin("\nclose a.cc\nopen notes.txt\n")
        .passes()
        .stdout_has("notes.txt: skipped (not a candidate file)")
        .stdout_lacks("close");
}

#[cfg(unix)]
#[test]
fn failures_are_reported_per_event() {
    let project = Project::empty();
    project.platform_package("chromeos-base/codelab", "codelab");
    project.file("src/platform2/codelab/codelab.cc", "");
    project.fake_tool("sudo", "exit 1\n");

    watch(&project)
        .env("PATH", project.path_env())
        .stdin("open src/platform2/codelab/codelab.cc\n")
        .passes()
        .stdout_has("codelab.cc: failed (remove_cache)");
}
