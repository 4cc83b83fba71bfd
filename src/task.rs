//! UI task handoff.
//!
//! All node state lives on the UI thread. Other threads hand work to it
//! through a [`UiTaskHandle`]; the UI thread drains its queue with
//! [`UiTaskRunner::run_pending`] (or blocks for work with
//! [`UiTaskRunner::run_for`]).
//!
//! ```ignore
//! let runner = UiTaskRunner::new();
//! let handle = runner.handle();
//!
//! std::thread::spawn(move || {
//!     let count = handle.post_ui_task_and_wait(|| spark_node::node_count())?;
//!     println!("{count} nodes");
//! });
//!
//! loop {
//!     runner.run_for(Duration::from_millis(16));
//! }
//! ```

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use crate::config;
use crate::error::{Error, Result};

type Task = Box<dyn FnOnce() + Send>;

// =============================================================================
// RUNNER (UI thread)
// =============================================================================

/// UI-thread end of the task queue. Not `Send`: it stays on the thread that
/// created it.
pub struct UiTaskRunner {
    rx: Receiver<Task>,
    handle: UiTaskHandle,
    _not_send: std::marker::PhantomData<*const ()>,
}

impl UiTaskRunner {
    /// Create a runner owned by the calling thread, which becomes the UI
    /// thread for every handle cloned from it.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = UiTaskHandle {
            tx,
            ui_thread: thread::current().id(),
            wait_timeout: config::config().ui_task_wait_timeout,
        };
        Self {
            rx,
            handle,
            _not_send: std::marker::PhantomData,
        }
    }

    pub fn handle(&self) -> UiTaskHandle {
        self.handle.clone()
    }

    /// Run every queued task. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Run tasks as they arrive until `budget` elapses. Returns how many ran.
    pub fn run_for(&self, budget: Duration) -> usize {
        let deadline = Instant::now() + budget;
        let mut ran = 0;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(task) => {
                    task();
                    ran += 1;
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        ran + self.run_pending()
    }
}

impl Default for UiTaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// HANDLE (any thread)
// =============================================================================

/// Posting end of the UI task queue.
#[derive(Clone)]
pub struct UiTaskHandle {
    tx: Sender<Task>,
    ui_thread: ThreadId,
    wait_timeout: Duration,
}

impl std::fmt::Debug for UiTaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiTaskHandle")
            .field("ui_thread", &self.ui_thread)
            .field("wait_timeout", &self.wait_timeout)
            .finish()
    }
}

impl UiTaskHandle {
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    /// Queue `task` for the UI thread without waiting.
    pub fn post_ui_task(&self, task: impl FnOnce() + Send + 'static) -> Result<()> {
        self.tx
            .send(Box::new(task))
            .map_err(|_| Error::param("UI task runner is gone"))
    }

    /// Run `task` on the UI thread and return its result.
    ///
    /// On the UI thread the task runs inline. Elsewhere the caller blocks
    /// until the UI thread runs it, or fails once the wait timeout passes.
    pub fn post_ui_task_and_wait<R>(&self, task: impl FnOnce() -> R + Send + 'static) -> Result<R>
    where
        R: Send + 'static,
    {
        if self.is_ui_thread() {
            return Ok(task());
        }

        let (done_tx, done_rx) = mpsc::sync_channel(1);
        self.post_ui_task(move || {
            let _ = done_tx.send(task());
        })?;

        match done_rx.recv_timeout(self.wait_timeout) {
            Ok(result) => Ok(result),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("UI task not run within {:?}", self.wait_timeout);
                Err(Error::param(format!("UI task timed out after {:?}", self.wait_timeout)))
            }
            Err(RecvTimeoutError::Disconnected) => Err(Error::param("UI task dropped before running")),
        }
    }

    /// Run `work` on a background thread, then `complete` with its result on
    /// the UI thread.
    pub fn post_async_ui_task<T, W, C>(&self, work: W, complete: C) -> Result<JoinHandle<()>>
    where
        T: Send + 'static,
        W: FnOnce() -> T + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let handle = self.clone();
        thread::Builder::new()
            .name("spark-node-task".to_string())
            .spawn(move || {
                let value = work();
                if handle.post_ui_task(move || complete(value)).is_err() {
                    log::warn!("async UI task finished after the runner was dropped");
                }
            })
            .map_err(|e| Error::param(format!("cannot spawn task thread: {e}")))
    }
}
