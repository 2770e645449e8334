//! Cancellable one-shot timer
//!
//! Replaces the ad hoc "keep a timeout id around and clear it before
//! re-arming" pattern: scheduling on a `DelayedTask` always cancels the
//! previously scheduled run first, so at most one run is ever pending.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};

#[derive(Clone, Default)]
pub struct DelayedTask {
    pending: Arc<Mutex<Option<(u64, AbortHandle)>>>,
}

impl DelayedTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `f` to run after `delay`, cancelling any previously
    /// scheduled run. Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut pending = self.pending.lock().unwrap();
            let generation = pending.as_ref().map_or(0, |(g, _)| *g) + 1;
            if let Some((_, previous)) = pending.replace((generation, handle)) {
                previous.abort();
            }
            generation
        };

        let pending = self.pending.clone();
        tokio::spawn(Abortable::new(
            async move {
                tokio::time::sleep(delay).await;
                f();
                // Only clear our own registration; a newer schedule may
                // have replaced it already.
                let mut pending = pending.lock().unwrap();
                if pending.as_ref().is_some_and(|(g, _)| *g == generation) {
                    pending.take();
                }
            },
            registration,
        ));
    }

    /// Cancel the pending run, if any.
    pub fn cancel(&self) {
        if let Some((_, handle)) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().unwrap().is_some()
    }
}
