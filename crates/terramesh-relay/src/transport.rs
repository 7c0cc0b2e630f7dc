//! Wireless transport boundary
//!
//! The radio driver is external to the relay: all the core needs is an
//! unreliable, at-most-once broadcast primitive. [`WirelessTransport`]
//! captures that contract; [`UdpTransport`] implements it over a UDP
//! broadcast socket so a full mesh can be exercised on ordinary hosts.
//!
//! Delivery loss is inherent to the medium and invisible at this layer:
//! sends are fire-and-forget, there are no acknowledgements, and nothing is
//! retried.

use async_trait::async_trait;
use bytes::Bytes;
use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use terramesh_core::MAX_WIRE_BYTES;

use crate::config::TransportConfig;
use crate::error::{RelayError, Result};

/// Abstraction over the broadcast radio medium.
///
/// Implementations deliver frames to every peer in range at most once, in
/// no particular order, with no delivery confirmation.
#[async_trait]
pub trait WirelessTransport: Send {
    /// Bring the transport up. Failure here is fatal at node startup.
    async fn start(&mut self) -> Result<()>;

    /// Tear the transport down
    async fn shutdown(&mut self) -> Result<()>;

    /// Whether the transport is up
    fn is_running(&self) -> bool;

    /// Broadcast one frame (at most [`MAX_WIRE_BYTES`] bytes) to all peers
    async fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Wait for the next inbound frame.
    ///
    /// Returns `None` when a datagram arrived but was discarded (oversize
    /// or otherwise unusable); the caller just polls again.
    async fn recv(&mut self) -> Result<Option<Bytes>>;

    /// Transport name for logging
    fn name(&self) -> &str;
}

/// Receive buffer: one byte beyond the frame bound so oversize datagrams
/// are detectable rather than silently truncated.
const RECV_BUFFER_SIZE: usize = MAX_WIRE_BYTES + 1;

/// UDP broadcast stand-in for the radio driver.
///
/// Every node in the simulated broadcast domain binds the same port and
/// sends to the all-ones address. Whether a node sees its own datagrams
/// back depends on the host network stack; the relay semantics tolerate
/// either, the same way they tolerate a peer echo.
pub struct UdpTransport {
    config: TransportConfig,
    socket: Option<UdpSocket>,
    name: String,
}

impl UdpTransport {
    /// Create a transport from configuration (not yet bound)
    pub fn new(config: TransportConfig) -> Self {
        let name = format!("udp:{}", config.port);
        Self {
            config,
            socket: None,
            name,
        }
    }

    fn socket(&self) -> Result<&UdpSocket> {
        self.socket
            .as_ref()
            .ok_or_else(|| RelayError::SendFailed("transport not started".to_string()))
    }
}

#[async_trait]
impl WirelessTransport for UdpTransport {
    async fn start(&mut self) -> Result<()> {
        let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, self.config.port);
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| RelayError::TransportInit(format!("bind {}: {}", bind_addr, e)))?;
        socket
            .set_broadcast(true)
            .map_err(|e| RelayError::TransportInit(format!("set_broadcast: {}", e)))?;

        info!(addr = %bind_addr, "wireless transport up");
        self.socket = Some(socket);
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        if self.socket.take().is_some() {
            info!(name = %self.name, "wireless transport down");
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.socket.is_some()
    }

    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > MAX_WIRE_BYTES {
            return Err(RelayError::SendFailed(format!(
                "frame is {} bytes, medium maximum is {}",
                frame.len(),
                MAX_WIRE_BYTES
            )));
        }

        let dest = SocketAddrV4::new(self.config.broadcast_addr, self.config.port);
        let sent = self
            .socket()?
            .send_to(frame, dest)
            .await
            .map_err(|e| RelayError::SendFailed(e.to_string()))?;
        debug!(bytes = sent, dest = %dest, "broadcast frame");
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Bytes>> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let (len, peer) = self
            .socket()?
            .recv_from(&mut buf)
            .await
            .map_err(|e| RelayError::RecvFailed(e.to_string()))?;

        if len > MAX_WIRE_BYTES {
            warn!(bytes = len, peer = %peer, "discarding oversize datagram");
            return Ok(None);
        }

        debug!(bytes = len, peer = %peer, "received frame");
        Ok(Some(Bytes::copy_from_slice(&buf[..len])))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
