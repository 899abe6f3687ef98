//! Sample ingest loop: feed channel in, classifications out.

use crate::state::AppState;
use groundtrack_core::TelemetrySample;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Consume samples until the feed closes its side of the channel.
///
/// An invalid sample is logged and skipped; classification of the stream
/// never halts on one bad reading.
pub async fn run_ingest(state: Arc<AppState>, mut rx: mpsc::Receiver<TelemetrySample>) {
    while let Some(sample) = rx.recv().await {
        match state.classifier.classify(&state.layout, &sample) {
            Ok(result) => {
                tracing::debug!(zone = %result.zone, "classified sample");
                state.publish(result);
            }
            Err(err) => {
                tracing::warn!(%err, "dropping invalid sample");
            }
        }
    }
    tracing::info!("telemetry feed closed, ingest loop stopping");
}
