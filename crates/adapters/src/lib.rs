// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: processes, notifications, status, boards

pub mod board;
pub mod notify;
pub mod process;
pub mod status;

pub use board::{BoardProvider, FixedBoard};
pub use notify::{DesktopNotifyAdapter, LogNotifyAdapter, NotifyAdapter, NotifyError, Remedy};
pub use process::{CommandSpec, ExecError, ExecOutput, LocalProcessAdapter, ProcessAdapter};
pub use status::{StatusSink, TaskStatus, TracingStatusSink};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use process::FakeProcessAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use status::FakeStatusSink;
