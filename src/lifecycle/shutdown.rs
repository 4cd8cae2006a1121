//! Shutdown signaling for a detached accept loop.

use tokio::sync::watch;

/// Handle that tells one accept loop to stop.
///
/// The task holds a [`ShutdownSignal`]; the owner keeps the handle and
/// triggers it exactly once, from `kill`.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Create a handle and the signal end for the accept task.
    pub fn new() -> (Self, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, ShutdownSignal { rx })
    }

    /// Signal the accept loop to stop and drop its listener.
    pub fn trigger(&self) {
        // Receiver may already be gone if the task aborted; nothing to do.
        let _ = self.tx.send(true);
    }
}

/// Receiving end held by the accept task.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered.
    pub async fn triggered(&mut self) {
        while !*self.rx.borrow() {
            if self.rx.changed().await.is_err() {
                // Handle dropped without triggering: treat as shutdown so the
                // task cannot outlive its owner silently.
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_wakes_signal() {
        let (handle, mut signal) = ShutdownHandle::new();

        handle.trigger();
        signal.triggered().await;
    }

    #[tokio::test]
    async fn test_dropped_handle_releases_signal() {
        let (handle, mut signal) = ShutdownHandle::new();

        drop(handle);
        signal.triggered().await;
    }
}
