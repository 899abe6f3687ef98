//! UDP telemetry listener.
//!
//! Binds a socket, pairs the latest GPS and attitude messages from the
//! simulator, and pushes complete [`TelemetrySample`]s into a channel.
//! The classifier runs on the consumer side of that channel; this task
//! never blocks on anything but the socket.

use crate::wire::{self, AttitudeReport, GpsReport, WireMessage};
use chrono::Utc;
use groundtrack_core::{GeoPoint, TelemetrySample};
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Default port the simulator broadcasts to.
pub const DEFAULT_UDP_PORT: u16 = 49002;

/// Pairs GPS and attitude reports into telemetry samples.
///
/// A sample is emitted on every GPS message once at least one attitude
/// message has arrived; the attitude heading is carried forward until the
/// next one. Separate from the socket loop so it can be tested without I/O.
#[derive(Debug, Default)]
pub struct SampleAssembler {
    last_attitude: Option<AttitudeReport>,
}

impl SampleAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one parsed message; returns a sample when one is complete.
    pub fn push(&mut self, message: WireMessage) -> Option<TelemetrySample> {
        match message {
            WireMessage::Attitude(att) => {
                self.last_attitude = Some(att);
                None
            }
            WireMessage::Gps(gps) => self.assemble(gps),
            WireMessage::Aircraft(info) => {
                tracing::debug!(?info, "aircraft identity");
                None
            }
        }
    }

    fn assemble(&self, gps: GpsReport) -> Option<TelemetrySample> {
        let Some(att) = self.last_attitude else {
            tracing::debug!("GPS fix before first attitude message, waiting");
            return None;
        };
        Some(TelemetrySample {
            position: GeoPoint::new(gps.lat_deg, gps.lon_deg),
            heading_deg: att.true_heading_deg,
            ground_speed_mps: gps.ground_speed_mps,
            altitude_m: gps.altitude_msl_m,
            timestamp: Utc::now(),
        })
    }
}

/// Listen on `addr` and forward assembled samples into `tx`.
///
/// Malformed datagrams are logged at debug and dropped; a single bad
/// reading never interrupts the stream. Returns when the receiving side
/// of the channel is gone.
pub async fn run_udp_feed(addr: SocketAddr, tx: mpsc::Sender<TelemetrySample>) -> io::Result<()> {
    let socket = UdpSocket::bind(addr).await?;
    tracing::info!(%addr, "listening for simulator telemetry");
    run_on_socket(socket, tx).await
}

/// Socket loop behind [`run_udp_feed`], usable with a pre-bound socket.
pub async fn run_on_socket(
    socket: UdpSocket,
    tx: mpsc::Sender<TelemetrySample>,
) -> io::Result<()> {
    let mut assembler = SampleAssembler::new();
    let mut buf = [0u8; 1024];

    loop {
        let (len, peer) = socket.recv_from(&mut buf).await?;
        let text = String::from_utf8_lossy(&buf[..len]);

        let message = match wire::parse_datagram(&text) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(%peer, %err, "dropping malformed datagram");
                continue;
            }
        };

        if let Some(sample) = assembler.push(message) {
            if tx.send(sample).await.is_err() {
                tracing::info!("sample consumer gone, stopping UDP feed");
                return Ok(());
            }
        }
    }
}
