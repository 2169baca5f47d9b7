//! Early-stop signal for runs.

use tokio::sync::broadcast;

/// Broadcasts a stop request to every run subscribed to it.
///
/// A stop only ends issuance; each run still drains its in-flight probes
/// before reporting.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver handed to `Orchestrator::run`. Subscribe before the run starts.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed run to stop issuing. Returns how many were told.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(runs = notified, "Stop requested");
        notified
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
