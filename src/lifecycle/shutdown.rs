//! Shutdown coordination for the HTTP front end.
//!
//! Only the listeners stop. Worker threads are not joined; they exit when the
//! last `Site` holding their scheduler is dropped.

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// One-shot stop signal fanned out to every running `HttpServer`.
///
/// Servers subscribe before they start; a signal sent earlier is not replayed.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to pass to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscribed server. Harmless when nobody is subscribed.
    pub fn trigger(&self) {
        match self.tx.send(()) {
            Ok(servers) => tracing::debug!(servers, "Shutdown triggered"),
            Err(_) => tracing::debug!("Shutdown triggered with no server listening"),
        }
    }

    /// Trigger once the process receives Ctrl+C or SIGTERM.
    pub fn trigger_on_signal(self) {
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            self.trigger();
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
