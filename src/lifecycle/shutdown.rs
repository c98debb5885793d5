//! Shutdown coordination.

use tokio::sync::broadcast;

use crate::lifecycle::signals::termination_signal;

/// Coordinator for graceful shutdown.
///
/// The server, the rate window sweeper and the reload task each hold a
/// receiver and stop when it fires.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the shutdown signal. Safe to call with no subscribers.
    pub fn trigger(&self) {
        let subscribers = self.tx.send(()).unwrap_or(0);
        tracing::debug!(subscribers, "Shutdown triggered");
    }

    /// Wait for SIGINT/SIGTERM, then fire.
    pub async fn trigger_on_signal(&self) {
        termination_signal().await;
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
