//! Shutdown coordination.
//!
//! The coordinator answers "what tells a listener to begin draining": the
//! runner wires it to OS signals by default, hosts can hold a handle and
//! trigger it explicitly, and tests do the same.

use tokio::sync::broadcast;

/// Broadcast-based shutdown coordinator.
///
/// Clones share the same channel; every listener subscribes once at
/// startup and begins draining when the signal fires.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the stop signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every subscribed listener to begin draining.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
