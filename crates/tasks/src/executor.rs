use std::future::Future;

use tokio::{
    sync::watch,
    task::JoinHandle,
};
use tracing::*;

/// Receiving end of the process-wide shutdown signal. Entities clone this
/// and `select!` on `changed()`/`wait_for(|v| *v)` alongside their inbox to
/// react to `Stop` cooperatively.
#[derive(Clone)]
pub struct ShutdownSignal(watch::Receiver<bool>);

impl ShutdownSignal {
    /// Resolves once shutdown has been signalled. Safe to await repeatedly.
    pub async fn wait(&mut self) {
        let _ = self.0.wait_for(|v| *v).await;
    }

    pub fn is_set(&self) -> bool {
        *self.0.borrow()
    }
}

/// Owns the task registry and the shutdown signal for a process.
///
/// Hands out [`TaskExecutor`] handles that entities use to spawn their
/// actor loops; tracks every spawned task by name so a panic or an early
/// return can be attributed to the entity that caused it.
pub struct TaskManager {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl TaskManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    pub fn executor(&self) -> TaskExecutor {
        TaskExecutor {
            shutdown: ShutdownSignal(self.shutdown_tx.subscribe()),
        }
    }

    /// Signals every outstanding task to begin cooperative shutdown.
    pub fn initiate_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Registers a handle for a task spawned outside of [`TaskExecutor`]
    /// (used by the binary's top-level setup, mirroring how critical tasks
    /// spawned via the executor are tracked internally).
    pub fn track(&mut self, name: impl Into<String>, handle: JoinHandle<()>) {
        self.handles.push((name.into(), handle));
    }

    /// Awaits every tracked task, logging any that panicked or returned an
    /// error. Intended for use during orderly shutdown, after
    /// [`Self::initiate_shutdown`].
    pub async fn join_all(self) {
        for (name, handle) in self.handles {
            match handle.await {
                Ok(()) => debug!(task = %name, "task exited cleanly"),
                Err(err) if err.is_panic() => {
                    error!(task = %name, "task panicked: {:?}", err)
                }
                Err(err) => warn!(task = %name, "task was cancelled: {:?}", err),
            }
        }
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Lightweight, cloneable handle used by entities to spawn their actor
/// loops and to learn about process shutdown.
#[derive(Clone)]
pub struct TaskExecutor {
    shutdown: ShutdownSignal,
}

impl TaskExecutor {
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Spawns a task whose failure (panic or `Err`) is a bug, not an
    /// expected outcome — logged at `error` level with the task name for
    /// correlation. Does not itself tear down the process; the caller
    /// decides what a critical-task failure means for it.
    pub fn spawn_critical_async<F>(&self, name: &'static str, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        tokio::task::spawn(async move {
            match fut.await {
                Ok(()) => debug!(task = name, "critical task exited"),
                Err(err) => error!(task = name, "critical task failed: {:?}", err),
            }
        })
    }

    /// Spawns a task whose early exit is unremarkable (e.g. a short-lived
    /// helper), logged at `debug` level only.
    pub fn spawn_async<F>(&self, name: &'static str, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::task::spawn(async move {
            fut.await;
            trace!(task = name, "task exited");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use super::*;

    #[tokio::test]
    async fn critical_task_runs_to_completion() {
        let manager = TaskManager::new();
        let executor = manager.executor();
        let ran = Arc::new(AtomicBool::new(false));

        let handle = {
            let ran = Arc::clone(&ran);
            executor.spawn_critical_async("test_task", async move {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
        };

        handle.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn shutdown_signal_propagates() {
        let manager = TaskManager::new();
        let executor = manager.executor();
        let mut signal = executor.shutdown_signal();

        assert!(!signal.is_set());
        manager.initiate_shutdown();
        signal.wait().await;
        assert!(signal.is_set());
    }
}
