//! Bridges between blocking service calls and async callers.
//!
//! [`TaskFactory`] moves blocking work off the async executor, which is how
//! the `*_async` operations of [`Message`](crate::Message) run.
//! [`SynchronousInvoker`] goes the other way and drives a future to
//! completion from synchronous code.

use std::future::Future;

use thiserror::Error;
use tokio::runtime::{Builder, Handle, RuntimeFlavor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("No async runtime is running on this thread")]
    NoRuntime,
    #[error("Cannot block inside a current-thread runtime")]
    InsideRuntime,
    #[error("Background task failed: {0}")]
    Failed(String),
    #[error("Failed to start a runtime: {0}")]
    Runtime(String),
}

/// Runs blocking work on the runtime's blocking pool.
#[derive(Debug, Default)]
pub struct TaskFactory;

impl TaskFactory {
    pub fn new() -> Self {
        Self
    }

    /// Runs `work` on the blocking pool of the current runtime and waits for
    /// its result. A panic inside `work` is reported as [`TaskError::Failed`].
    pub async fn execute<F, T>(&self, work: F) -> Result<T, TaskError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| TaskError::NoRuntime)?;
        handle.spawn_blocking(work).await.map_err(|err| {
            tracing::warn!(error = %err, "background task failed");
            TaskError::Failed(err.to_string())
        })
    }
}

/// Drives futures to completion from synchronous code.
#[derive(Debug, Default)]
pub struct SynchronousInvoker;

impl SynchronousInvoker {
    pub fn new() -> Self {
        Self
    }

    /// Blocks until `future` completes.
    ///
    /// Outside a runtime a private current-thread runtime is started. Inside
    /// a multi-thread runtime the worker is handed over with `block_in_place`
    /// first. Inside a current-thread runtime there is no worker to hand
    /// over, so this fails with [`TaskError::InsideRuntime`].
    pub fn invoke<F: Future>(&self, future: F) -> Result<F::Output, TaskError> {
        match Handle::try_current() {
            Ok(handle) => match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => tokio::task::block_in_place(|| block_on(future)),
                _ => Err(TaskError::InsideRuntime),
            },
            Err(_) => block_on(future),
        }
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output, TaskError> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| TaskError::Runtime(err.to_string()))?;
    Ok(runtime.block_on(future))
}
