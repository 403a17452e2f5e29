//! Single-flight timer owned by a service's private state.
//!
//! Arming replaces any pending expiry. Each arm gets a new generation; the
//! callback receives it and must check [`OneShot::fire`] under the same
//! lock that guards the timer, so an expiry racing a cancel is a no-op.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub(crate) struct OneShot {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl OneShot {
    /// Schedule `on_expiry(generation)` after `delay`, replacing any pending expiry.
    pub(crate) fn arm<F>(&mut self, runtime: &Handle, delay: Duration, on_expiry: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        self.task = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_expiry(generation);
        }));
    }

    /// Drop any pending expiry.
    pub(crate) fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// Claim an expiry; `false` if it was cancelled or re-armed meanwhile.
    pub(crate) fn fire(&mut self, generation: u64) -> bool {
        if self.task.is_none() || self.generation != generation {
            return false;
        }
        self.task = None;
        true
    }
}
