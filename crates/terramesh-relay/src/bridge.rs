//! RelayBridge - couples the wireless medium to the local channel
//!
//! The bridge owns one [`WirelessTransport`] and one [`RelayCore`] and runs
//! the node's single logical thread of control. All entry points funnel into
//! one `tokio::select!` loop, so the dedup cache is only ever touched from
//! one task:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      RelayBridge                         │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  Wireless In ──► RelayCore ──► Local Out (broadcast)     │
//! │                     │     └──► Wireless Out (re-flood)   │
//! │                     │                                    │
//! │  Local In (mpsc) ───┴────────► Wireless Out only         │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Local Out is a `tokio::sync::broadcast` channel so one accepted frame can
//! fan out to several sinks (stdio echo, browser event stream) without the
//! bridge knowing who is listening.

use bytes::Bytes;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::core::{Action, DropReason, LocalContent, RelayCore};
use crate::error::{RelayError, Result};
use crate::transport::WirelessTransport;

/// Depth of the Local In and command queues
const CHANNEL_DEPTH: usize = 256;

/// Commands that can be sent to a running bridge
#[derive(Debug)]
pub enum BridgeCommand {
    /// Report relay statistics
    GetStats(oneshot::Sender<RelayStats>),
    /// Stop the bridge loop
    Shutdown,
}

/// Relay statistics
#[derive(Debug, Clone, Default)]
pub struct RelayStats {
    /// Wireless messages accepted (delivered locally + rebroadcast)
    pub accepted: u64,
    /// Wireless messages dropped as duplicates
    pub duplicates_dropped: u64,
    /// Wireless frames dropped as undecodable
    pub decode_failures: u64,
    /// Messages originated by this node's local channel
    pub local_originated: u64,
    /// Broadcast sends that failed (loss is otherwise invisible)
    pub send_errors: u64,
}

/// Handle for feeding and controlling a running [`RelayBridge`]
#[derive(Clone)]
pub struct BridgeHandle {
    command_tx: mpsc::Sender<BridgeCommand>,
    local_in: mpsc::Sender<LocalContent>,
    local_out: broadcast::Sender<Bytes>,
}

impl BridgeHandle {
    /// Inject locally originated content (operator text, sensor reading)
    pub async fn send_local(&self, content: LocalContent) -> Result<()> {
        self.local_in
            .send(content)
            .await
            .map_err(|_| RelayError::ChannelClosed)
    }

    /// Subscribe a Local Out sink to accepted wireless frames
    pub fn subscribe_local_out(&self) -> broadcast::Receiver<Bytes> {
        self.local_out.subscribe()
    }

    /// Fetch relay statistics
    pub async fn stats(&self) -> Result<RelayStats> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(BridgeCommand::GetStats(tx))
            .await
            .map_err(|_| RelayError::ChannelClosed)?;
        rx.await.map_err(|_| RelayError::ChannelClosed)
    }

    /// Stop the bridge
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(BridgeCommand::Shutdown)
            .await
            .map_err(|_| RelayError::ChannelClosed)
    }
}

/// Bridge service coupling one wireless channel and the local channel
pub struct RelayBridge<T: WirelessTransport> {
    transport: T,
    core: RelayCore,
    local_out: broadcast::Sender<Bytes>,
    local_rx: mpsc::Receiver<LocalContent>,
    command_rx: mpsc::Receiver<BridgeCommand>,
    stats: RelayStats,
}

impl<T: WirelessTransport + 'static> RelayBridge<T> {
    /// Create a bridge from a transport and a relay core
    pub fn new(transport: T, core: RelayCore) -> (Self, BridgeHandle) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_DEPTH);
        let (local_in, local_rx) = mpsc::channel(CHANNEL_DEPTH);
        let (local_out, _) = broadcast::channel(CHANNEL_DEPTH);

        let handle = BridgeHandle {
            command_tx,
            local_in,
            local_out: local_out.clone(),
        };

        let bridge = Self {
            transport,
            core,
            local_out,
            local_rx,
            command_rx,
            stats: RelayStats::default(),
        };

        (bridge, handle)
    }

    /// Run the bridge event loop until shutdown.
    ///
    /// Transport startup failure is returned to the caller, which treats it
    /// as fatal: the node logs a diagnostic and stays inert. Receive and
    /// send failures after startup are logged and counted, never retried -
    /// loss is inherent to the medium.
    pub async fn run(mut self) -> Result<()> {
        info!(node = %self.core.node_id(), transport = self.transport.name(), "starting relay bridge");
        self.transport.start().await?;

        loop {
            tokio::select! {
                frame = self.transport.recv() => {
                    match frame {
                        Ok(Some(raw)) => self.handle_wireless_frame(raw).await,
                        Ok(None) => trace!("transport discarded a datagram"),
                        Err(e) => {
                            warn!(error = %e, "wireless receive failed");
                        }
                    }
                }

                Some(content) = self.local_rx.recv() => {
                    self.handle_local_content(content).await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        BridgeCommand::GetStats(tx) => {
                            let _ = tx.send(self.stats.clone());
                        }
                        BridgeCommand::Shutdown => {
                            info!("bridge shutdown requested");
                            break;
                        }
                    }
                }
            }
        }

        if let Err(e) = self.transport.shutdown().await {
            warn!(error = %e, "error shutting down transport");
        }
        info!("relay bridge stopped");
        Ok(())
    }

    /// Wireless In: run the relay decision and, on accept, fan the
    /// *original* bytes out to the local sinks and back onto the medium.
    async fn handle_wireless_frame(&mut self, raw: Bytes) {
        match self.core.on_wireless_message(&raw) {
            Action::Accept => {
                self.stats.accepted += 1;

                // Bit-identical passthrough on both paths; the decoded form
                // never leaves the core.
                let _ = self.local_out.send(raw.clone());

                if let Err(e) = self.transport.send(&raw).await {
                    debug!(error = %e, "rebroadcast failed");
                    self.stats.send_errors += 1;
                }
            }
            Action::Drop(DropReason::Duplicate) => {
                self.stats.duplicates_dropped += 1;
            }
            Action::Drop(DropReason::Malformed) => {
                self.stats.decode_failures += 1;
            }
        }
    }

    /// Local In: stamp, encode, and broadcast. No local loopback.
    async fn handle_local_content(&mut self, content: LocalContent) {
        let frame = match self.core.on_local_message(content) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "failed to encode local message");
                return;
            }
        };

        self.stats.local_originated += 1;
        if let Err(e) = self.transport.send(&frame).await {
            debug!(error = %e, "broadcast of local message failed");
            self.stats.send_errors += 1;
        }
    }
}
