//! Shutdown coordination for a module and its components.

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// One per module. Every component task holds a [`ShutdownHandle`] and
/// treats the trigger as a cooperative request, observed at its next
/// suspension point.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Derive a handle for a task that must observe the trigger. Handles
    /// created after the trigger still see it.
    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Broadcast the shutdown request to every handle simultaneously.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// A task's view of its module's shutdown state.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    rx: watch::Receiver<bool>,
}

impl ShutdownHandle {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been triggered; immediately if it already
    /// was. Safe to call from `select!` arms any number of times.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // A dropped coordinator counts as cancellation too.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}
