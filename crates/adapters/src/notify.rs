// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Documentation for cross-reference setup and troubleshooting.
pub const COMPDB_DOCS_URL: &str =
    "https://chromium.googlesource.com/chromiumos/docs/+/HEAD/developer_guide.md#C_and-C_-cross-reference";

/// Bug filer for issues the user cannot fix locally.
pub const FILE_BUG_URL: &str = "https://issuetracker.google.com/issues/new?component=1218555";

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// The single button offered alongside an error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Remedy {
    OpenDocs,
    FileBug,
    ShowLog,
}

impl Remedy {
    pub fn label(&self) -> &'static str {
        match self {
            Remedy::OpenDocs => "Open document",
            Remedy::FileBug => "File a bug",
            Remedy::ShowLog => "Show log",
        }
    }

    /// Where the button leads, when it leads somewhere outside the tool.
    pub fn url(&self) -> Option<&'static str> {
        match self {
            Remedy::OpenDocs => Some(COMPDB_DOCS_URL),
            Remedy::FileBug => Some(FILE_BUG_URL),
            Remedy::ShowLog => None,
        }
    }
}

impl fmt::Display for Remedy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.url() {
            Some(url) => write!(f, "{}: {}", self.label(), url),
            None => write!(f, "{}", self.label()),
        }
    }
}

/// Adapter for user-facing notifications
#[async_trait]
pub trait NotifyAdapter: Send + Sync + 'static {
    /// Show an interactive error message with at most one remedy button.
    async fn show_error(&self, message: &str, remedy: Option<Remedy>) -> Result<(), NotifyError>;

    /// A compilation database was (re)published; language servers reading it
    /// should be restarted.
    async fn compdb_updated(&self, path: &Path) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS, `notify-rust` uses `mac-notification-sys` (Cocoa bindings) to send
/// notifications via the Notification Center. The first notification triggers
/// `ensure_application_set()` which runs an AppleScript to look up a bundle
/// identifier. In a process without Automation permissions, that AppleScript
/// blocks forever. We pre-set the bundle identifier at construction time to
/// bypass the lookup entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn show_error(&self, message: &str, remedy: Option<Remedy>) -> Result<(), NotifyError> {
        let body = match remedy {
            Some(remedy) => format!("{}\n{}", message, remedy),
            None => message.to_string(),
        };
        // notify_rust::Notification::show() is synchronous on macOS.
        // Fire-and-forget on tokio's bounded blocking thread pool.
        tokio::task::spawn_blocking(move || {
            match notify_rust::Notification::new().summary("C++ cross references").body(&body).show()
            {
                Ok(_) => tracing::info!(message = %body, "desktop notification sent"),
                Err(e) => tracing::warn!(error = %e, "desktop notification failed"),
            }
        });
        Ok(())
    }

    async fn compdb_updated(&self, path: &Path) -> Result<(), NotifyError> {
        tracing::info!(path = %path.display(), "compilation database updated");
        Ok(())
    }
}

/// Reports through `tracing` only; for one-shot commands without a UI.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifyAdapter;

#[async_trait]
impl NotifyAdapter for LogNotifyAdapter {
    async fn show_error(&self, message: &str, remedy: Option<Remedy>) -> Result<(), NotifyError> {
        match remedy {
            Some(remedy) => tracing::error!(%remedy, "{}", message),
            None => tracing::error!("{}", message),
        }
        Ok(())
    }

    async fn compdb_updated(&self, path: &Path) -> Result<(), NotifyError> {
        tracing::info!(path = %path.display(), "compilation database updated");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError, Remedy};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded error message
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NotifyCall {
        pub message: String,
        pub remedy: Option<Remedy>,
    }

    #[derive(Default)]
    struct FakeNotifyState {
        errors: Vec<NotifyCall>,
        updated: Vec<PathBuf>,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        inner: Arc<Mutex<FakeNotifyState>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded error messages
        pub fn errors(&self) -> Vec<NotifyCall> {
            self.inner.lock().errors.clone()
        }

        /// Get all paths reported as updated
        pub fn updated(&self) -> Vec<PathBuf> {
            self.inner.lock().updated.clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn show_error(
            &self,
            message: &str,
            remedy: Option<Remedy>,
        ) -> Result<(), NotifyError> {
            self.inner.lock().errors.push(NotifyCall { message: message.to_string(), remedy });
            Ok(())
        }

        async fn compdb_updated(&self, path: &Path) -> Result<(), NotifyError> {
            self.inner.lock().updated.push(path.to_path_buf());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
