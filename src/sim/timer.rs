use std::future::Future;

use log::debug;
use tokio::task::JoinHandle;

/// A spawned timer task that lives exactly as long as its owner.
///
/// Dropping the handle aborts the task, so a view that goes away takes all
/// of its pending timeouts and intervals with it.
pub struct ScopedTask {
    label: &'static str,
    handle: JoinHandle<()>,
}

impl ScopedTask {
    pub fn spawn<F>(label: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!("Scheduling {}", label);
        ScopedTask {
            label,
            handle: tokio::spawn(future),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Cancelling {}", self.label);
            self.handle.abort();
        }
    }
}
