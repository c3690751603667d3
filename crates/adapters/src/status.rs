// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress reporting: an append-only log plus a status indicator per task.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// State of the background status indicator for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Ok,
    Error,
    Running,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Ok => write!(f, "ok"),
            TaskStatus::Error => write!(f, "error"),
            TaskStatus::Running => write!(f, "running"),
        }
    }
}

/// Sink for build output and task status.
///
/// `append` receives whole lines without their trailing newline.
pub trait StatusSink: Send + Sync {
    fn append(&self, line: &str);
    fn set_status(&self, task: &str, status: TaskStatus);
}

/// Forwards log lines to `tracing` and remembers the latest status per task.
#[derive(Default)]
pub struct TracingStatusSink {
    statuses: Mutex<HashMap<String, TaskStatus>>,
}

impl TracingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, task: &str) -> Option<TaskStatus> {
        self.statuses.lock().get(task).copied()
    }
}

impl StatusSink for TracingStatusSink {
    fn append(&self, line: &str) {
        tracing::info!(target: "cide::task", "{}", line);
    }

    fn set_status(&self, task: &str, status: TaskStatus) {
        let previous = self.statuses.lock().insert(task.to_string(), status);
        if previous != Some(status) {
            tracing::debug!(target: "cide::task", task, %status, "status changed");
        }
    }
}

impl<T: StatusSink + ?Sized> StatusSink for Arc<T> {
    fn append(&self, line: &str) {
        (**self).append(line)
    }

    fn set_status(&self, task: &str, status: TaskStatus) {
        (**self).set_status(task, status)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{StatusSink, TaskStatus};
    use parking_lot::Mutex;

    /// Records every line and status transition.
    #[derive(Default)]
    pub struct FakeStatusSink {
        lines: Mutex<Vec<String>>,
        transitions: Mutex<Vec<(String, TaskStatus)>>,
    }

    impl FakeStatusSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().clone()
        }

        pub fn transitions(&self) -> Vec<(String, TaskStatus)> {
            self.transitions.lock().clone()
        }

        /// Latest status recorded for `task`.
        pub fn status(&self, task: &str) -> Option<TaskStatus> {
            self.transitions.lock().iter().rev().find(|(t, _)| t == task).map(|(_, s)| *s)
        }
    }

    impl StatusSink for FakeStatusSink {
        fn append(&self, line: &str) {
            self.lines.lock().push(line.to_string());
        }

        fn set_status(&self, task: &str, status: TaskStatus) {
            self.transitions.lock().push((task.to_string(), status));
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusSink;

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
