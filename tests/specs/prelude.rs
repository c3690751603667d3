// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers for driving the `cide` binary against a scratch checkout.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Run `cide` outside any checkout with an empty config directory.
pub fn cli() -> CliBuilder {
    let config = TempDir::new().unwrap();
    let mut builder = CliBuilder::new(config.path().to_path_buf());
    builder.keep.push(config);
    builder
}

pub struct CliBuilder {
    cmd: Command,
    stdin: Option<String>,
    keep: Vec<TempDir>,
}

impl CliBuilder {
    fn new(config_dir: PathBuf) -> Self {
        let mut cmd = Command::cargo_bin("cide").unwrap();
        cmd.env("CIDE_CONFIG_DIR", config_dir)
            .env("CIDE_LOG", "warn")
            .env("CIDE_INSIDE_CHROOT", "0")
            .env("NO_COLOR", "1")
            .env_remove("CIDE_BOARD")
            .env_remove("COLOR");
        Self { cmd, stdin: None, keep: Vec::new() }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn pwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    fn run(mut self) -> RunAssert {
        if let Some(input) = self.stdin.take() {
            self.cmd.write_stdin(input);
        }
        let output = self.cmd.output().unwrap();
        RunAssert {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Run and assert a zero exit status.
    pub fn passes(self) -> RunAssert {
        let run = self.run();
        assert_eq!(run.code, Some(0), "expected success\n{run}");
        run
    }

    /// Run and assert a non-zero exit status.
    pub fn fails(self) -> RunAssert {
        let run = self.run();
        assert_ne!(run.code, Some(0), "expected failure\n{run}");
        run
    }
}

pub struct RunAssert {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl std::fmt::Display for RunAssert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exit: {:?}\n--- stdout\n{}--- stderr\n{}", self.code, self.stdout, self.stderr)
    }
}

impl RunAssert {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.code, Some(expected), "unexpected exit code\n{self}");
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}\n{self}");
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}\n{self}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}\n{self}");
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }
}

/// A scratch ChromiumOS-style checkout plus its own config directory.
pub struct Project {
    root: TempDir,
    config: TempDir,
}

impl Project {
    /// A checkout with a `chroot/` marker and nothing else.
    pub fn empty() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("chroot")).unwrap();
        Self { root, config: TempDir::new().unwrap() }
    }

    /// Canonical path of the checkout.
    pub fn path(&self) -> PathBuf {
        std::fs::canonicalize(self.root.path()).unwrap()
    }

    pub fn config_dir(&self) -> &Path {
        self.config.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Add `<category>/<name>/<name>-9999.ebuild` for a platform2 package.
    pub fn platform_package(&self, atom: &str, subdir: &str) {
        let (_, name) = atom.split_once('/').unwrap();
        self.file(
            &format!("src/third_party/chromiumos-overlay/{atom}/{name}-9999.ebuild"),
            &format!("EAPI=7\nPLATFORM_SUBDIR=\"{subdir}\"\ninherit cros-workon platform\n"),
        );
    }

    /// Install a stand-in executable named `name` into the project's bin dir.
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = self.file(&format!(".bin/{name}"), &format!("#!/bin/sh\n{script}"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// `PATH` with the project's fake tools first.
    pub fn path_env(&self) -> std::ffi::OsString {
        let mut paths = vec![self.path().join(".bin")];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths).unwrap()
    }

    /// `cide` run from the checkout root with this project's config.
    pub fn cide(&self) -> CliBuilder {
        CliBuilder::new(self.config_dir().to_path_buf()).pwd(self.path())
    }
}
