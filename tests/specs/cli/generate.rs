// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cide generate` specs, with the SDK tools replaced by shell scripts.

use crate::prelude::*;

const ARTIFACT_DIR: &str = "chroot/build/amd64-generic/tmp/portage/chromeos-base/codelab-9999/work";

/// `cros_sdk -- tool...`, run from the checkout: removes cache markers under
/// `./chroot`, answers the ebuild lookup and writes the artifact for
/// `sudo env USE=... ebuild-<board> <ebuild> compile`. The compdb-only pass
/// writes `$FIRST_PASS`, the full build writes `[]`.
const FAKE_CROS_SDK: &str = r#"
[ "$1" = "--" ] && shift
if [ "$1" = sudo ] && [ "$2" = rm ]; then
  exec rm -f "$PWD/chroot$4"
fi
echo "$@" >> "$PWD/.calls"
case "$1" in
  equery-*)
    echo /mnt/host/source/src/third_party/chromiumos-overlay/chromeos-base/codelab/codelab-9999.ebuild
    ;;
  sudo)
    mkdir -p "$ARTIFACT_DIR"
    case "$3" in
      USE=compdb_only*) printf '%s' "$FIRST_PASS" > "$ARTIFACT_DIR/compile_commands_no_chroot.json" ;;
      *) printf '[]' > "$ARTIFACT_DIR/compile_commands_no_chroot.json" ;;
    esac
    echo ">>> Emerging codelab"
    ;;
  *)
    echo "unexpected: $*" >&2
    exit 1
    ;;
esac
"#;

/// Host `sudo` must never run outside the chroot.
const FAILING_SUDO: &str = "echo \"host sudo: $*\" >&2\nexit 1\n";

fn codelab_project() -> Project {
    let project = Project::empty();
    project.platform_package("chromeos-base/codelab", "codelab");
    project.file("src/platform2/codelab/codelab.cc", "int main() {}\n");
    project.fake_tool("sudo", FAILING_SUDO);
    project.fake_tool("cros_sdk", FAKE_CROS_SDK);
    project
}

fn generate(project: &Project, first_pass: &str) -> CliBuilder {
    project
        .cide()
        .env("PATH", project.path_env())
        .env("ARTIFACT_DIR", project.path().join(ARTIFACT_DIR))
        .env("FIRST_PASS", first_pass)
        .args(&["generate", "--board", "amd64-generic", "src/platform2/codelab/codelab.cc"])
}

fn calls(project: &Project) -> Vec<String> {
    std::fs::read_to_string(project.path().join(".calls"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn publishes_codelab_compdb() {
    let project = codelab_project();
    let published = project.path().join("src/platform2/codelab/compile_commands.json");

    generate(&project, "[]").passes().stdout_eq(&format!("{}\n", published.display()));

    assert_eq!(std::fs::read_to_string(&published).unwrap(), "[]");
    let calls = calls(&project);
    assert_eq!(calls.len(), 2, "calls: {calls:?}");
    assert_eq!(calls[0], "equery-amd64-generic which =chromeos-base/codelab-9999");
    assert!(calls[1].starts_with("sudo env USE=compdb_only test ebuild-amd64-generic "));
}

#[test]
fn missing_sources_trigger_a_full_build() {
    let project = codelab_project();
    let missing = project.path().join("src/platform2/codelab/gen/adaptor.cc");
    let first_pass = format!(
        r#"[{{"directory": "/tmp", "command": "clang++ -c {0}", "file": "{0}"}}]"#,
        missing.display()
    );

    generate(&project, &first_pass).passes();

    let builds: Vec<_> = calls(&project).into_iter().filter(|c| c.starts_with("sudo ")).collect();
    assert_eq!(builds.len(), 2, "builds: {builds:?}");
    assert!(builds[1].contains("USE=compilation_database test"));
    let published = project.path().join("src/platform2/codelab/compile_commands.json");
    assert_eq!(std::fs::read_to_string(published).unwrap(), "[]");
}

#[test]
fn stale_cache_markers_are_removed() {
    let project = codelab_project();
    let marker = project.file(
        "chroot/build/amd64-generic/var/cache/portage/chromeos-base/codelab/.configured",
        "",
    );

    generate(&project, "[]").passes();

    assert!(!marker.exists());
}

#[test]
fn json_output_reports_the_destination() {
    let project = codelab_project();
    let run = generate(&project, "[]").args(&["-o", "json"]).passes();
    let json: serde_json::Value = serde_json::from_str(run.stdout()).unwrap();
    assert!(json["compdb"].as_str().unwrap().ends_with("src/platform2/codelab/compile_commands.json"));
}

#[test]
fn build_failure_is_reported_with_remedy() {
    let project = codelab_project();
    project.fake_tool(
        "cros_sdk",
        "[ \"$2\" = sudo ] && [ \"$3\" = rm ] && exit 0\necho 'emerge failed' >&2\nexit 1\n",
    );

    generate(&project, "[]")
        .fails()
        .code(1)
        .stderr_has("compdb generation failed (run_ebuild)")
        .stderr_has("cros_workon --board=amd64-generic start codelab");
}

#[test]
fn missing_board_is_a_usage_error() {
    let project = codelab_project();
    project
        .cide()
        .args(&["generate", "src/platform2/codelab/codelab.cc"])
        .fails()
        .code(2)
        .stderr_has("no board configured");
}
