//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub udp_port: u16,
    pub layout_path: String,
    /// Optional JSON file with (partial) classifier threshold overrides
    pub thresholds_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("GROUNDTRACK_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            udp_port: env::var("GROUNDTRACK_UDP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(groundtrack_feed::DEFAULT_UDP_PORT),
            layout_path: env::var("GROUNDTRACK_LAYOUT")
                .unwrap_or_else(|_| "data/lowg.json".to_string()),
            thresholds_path: env::var("GROUNDTRACK_THRESHOLDS").ok(),
        }
    }
}
