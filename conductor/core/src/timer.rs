//! Timer Handles
//!
//! Every recurring schedule in the core (blink, typing, audio-status polling)
//! runs as a Tokio task owned through a [`TimerHandle`]. The owner cancels the
//! handle whenever the state that started it is superseded, and dropping the
//! handle cancels it too, so a timer can never outlive its owner.

use std::future::Future;

use tokio::task::JoinHandle;

/// Owned handle to a spawned timer task
#[derive(Debug, Default)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// A handle with nothing scheduled
    #[must_use]
    pub const fn idle() -> Self {
        Self { task: None }
    }

    /// Spawn `fut` on the current Tokio runtime and own it
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: Some(tokio::spawn(fut)),
        }
    }

    /// Replace whatever is scheduled with `fut`
    ///
    /// The previous task is aborted before the new one is spawned.
    pub fn restart<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.task = Some(tokio::spawn(fut));
    }

    /// Abort the scheduled task (no-op when idle)
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether a task is scheduled and has not finished yet
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
