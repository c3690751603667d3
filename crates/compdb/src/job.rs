// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight job coalescing.
//!
//! A [`JobManager`] guards one logical resource. At most one job runs at a
//! time; jobs offered while one is running wait in a queue, and when the
//! running job finishes every queued job except the most recent is cancelled.
//! A started job always runs to completion.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

type BoxJob<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

enum Outcome<T, E> {
    Finished(Result<T, E>),
    Panicked(Box<dyn Any + Send>),
}

struct Pending<T, E> {
    job: BoxJob<T, E>,
    /// Dropping this without sending is how a queued job is cancelled.
    done: oneshot::Sender<Outcome<T, E>>,
}

struct Inner<T, E> {
    running: bool,
    queue: Vec<Pending<T, E>>,
}

/// Serializes jobs for one resource, collapsing bursts to the latest request.
pub struct JobManager<T, E> {
    inner: Arc<Mutex<Inner<T, E>>>,
}

impl<T, E> Clone for JobManager<T, E> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T, E> Default for JobManager<T, E> {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(Inner { running: false, queue: Vec::new() })) }
    }
}

impl<T, E> JobManager<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a job is currently running.
    pub fn is_busy(&self) -> bool {
        self.inner.lock().running
    }

    /// Number of jobs waiting behind the running one.
    pub fn queued(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Submit a job.
    ///
    /// Resolves to `Ok(Some(value))` when the job ran and succeeded, `Err` when
    /// it ran and failed, and `Ok(None)` when it was cancelled before
    /// starting. A panic inside the job is resumed in the caller.
    ///
    /// Dropping the returned future does not cancel the job.
    pub async fn offer<F>(&self, job: F) -> Result<Option<T>, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (done, rx) = oneshot::channel();
        let pending = Pending { job: Box::pin(job), done };

        let start = {
            let mut inner = self.inner.lock();
            if inner.running {
                inner.queue.push(pending);
                None
            } else {
                inner.running = true;
                Some(pending)
            }
        };
        if let Some(first) = start {
            tokio::spawn(drive(Arc::clone(&self.inner), first));
        }

        match rx.await {
            Ok(Outcome::Finished(result)) => result.map(Some),
            Ok(Outcome::Panicked(payload)) => std::panic::resume_unwind(payload),
            Err(_) => Ok(None),
        }
    }
}

/// Run `next`, then keep draining the queue until it is empty.
async fn drive<T, E>(inner: Arc<Mutex<Inner<T, E>>>, mut next: Pending<T, E>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    loop {
        let Pending { job, done } = next;
        // Run on its own task so a panicking job cannot wedge the queue.
        match tokio::spawn(job).await {
            Ok(result) => {
                let _ = done.send(Outcome::Finished(result));
            }
            Err(e) if e.is_panic() => {
                let _ = done.send(Outcome::Panicked(e.into_panic()));
            }
            // Runtime shutting down; the caller sees a cancellation.
            Err(_) => drop(done),
        }

        next = {
            let mut inner = inner.lock();
            match inner.queue.pop() {
                Some(latest) => {
                    let superseded = inner.queue.len();
                    inner.queue.clear();
                    if superseded > 0 {
                        tracing::debug!(superseded, "cancelled superseded jobs");
                    }
                    latest
                }
                None => {
                    inner.running = false;
                    return;
                }
            }
        };
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
