//! Shared application state.
//!
//! The layout is immutable after load, so it needs no lock; only the
//! latest classification is mutable, guarded by a plain RwLock. Every new
//! result is also fanned out to WebSocket subscribers over a broadcast
//! channel.

use groundtrack_core::{AirportLayout, Classification, Classifier};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

pub struct AppState {
    pub layout: Arc<AirportLayout>,
    pub classifier: Classifier,
    latest: RwLock<Option<Classification>>,
    pub tx: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(layout: AirportLayout, classifier: Classifier) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            layout: Arc::new(layout),
            classifier,
            latest: RwLock::new(None),
            tx,
        }
    }

    /// Store a fresh classification and notify stream subscribers.
    pub fn publish(&self, result: Classification) {
        match serde_json::to_string(&result) {
            Ok(payload) => {
                // No subscribers is fine; send only fails then
                let _ = self.tx.send(payload);
            }
            Err(err) => tracing::error!(%err, "failed to serialize classification"),
        }
        if let Ok(mut latest) = self.latest.write() {
            *latest = Some(result);
        }
    }

    /// Most recent classification, if any sample has arrived yet.
    pub fn latest(&self) -> Option<Classification> {
        self.latest.read().ok().and_then(|guard| guard.clone())
    }
}
