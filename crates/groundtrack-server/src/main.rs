//! Groundtrack server - live airport surface position monitoring

mod api;
mod config;
mod ingest;
mod state;

use anyhow::{Context, Result};
use axum::routing::get;
use groundtrack_core::{AirportLayout, Classifier, Thresholds};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("groundtrack_server=debug".parse()?),
        )
        .init();

    let config = Config::from_env();

    let layout = AirportLayout::from_file(&config.layout_path)
        .with_context(|| format!("loading airport layout from {}", config.layout_path))?;
    tracing::info!(
        airport = %layout.name,
        icao = %layout.icao,
        runways = layout.runways.len(),
        taxiways = layout.taxiways.len(),
        "airport layout loaded"
    );

    let thresholds = match &config.thresholds_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading thresholds from {path}"))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing thresholds from {path}"))?
        }
        None => Thresholds::default(),
    };

    let state = Arc::new(AppState::new(layout, Classifier::new(thresholds)));

    // Telemetry path: UDP feed -> channel -> ingest loop
    let (sample_tx, sample_rx) = tokio::sync::mpsc::channel(64);
    let udp_addr = SocketAddr::from(([0, 0, 0, 0], config.udp_port));
    tokio::spawn(async move {
        if let Err(err) = groundtrack_feed::run_udp_feed(udp_addr, sample_tx).await {
            tracing::error!(%err, "UDP feed failed");
        }
    });
    tokio::spawn(ingest::run_ingest(state.clone(), sample_rx));

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
