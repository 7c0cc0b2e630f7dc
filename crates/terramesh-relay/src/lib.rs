//! Terramesh Relay - flood-broadcast relay core and transport bridge
//!
//! Every terramesh node, whatever its role, runs the same relay: consume
//! messages from the wireless medium and the local channel, decide
//! forward-or-drop with only local state, and flood accepted messages back
//! out. The pieces:
//!
//! 1. **Dedup cache** ([`cache`]) - bounded FIFO window of first-seen ids;
//!    the loop-breaking mechanism for flood topology
//! 2. **Relay core** ([`core`]) - the accept/drop decision and local-origin
//!    stamping
//! 3. **Transport boundary** ([`transport`]) - the at-most-once broadcast
//!    contract, plus a UDP host stand-in for the radio driver
//! 4. **Bridge service** ([`bridge`]) - the single event loop coupling one
//!    wireless channel to the local sinks and sources
//!
//! # Message flow
//!
//! ## Wireless In
//!
//! 1. Transport delivers a raw frame
//! 2. [`RelayCore::on_wireless_message`] decodes and checks the dedup window
//! 3. On accept, the bridge hands the original bytes to every Local Out
//!    sink and rebroadcasts them unchanged
//!
//! ## Local In
//!
//! 1. Operator text or a sensor reading arrives via [`BridgeHandle`]
//! 2. [`RelayCore::on_local_message`] stamps a fresh id and encodes
//! 3. The bridge broadcasts the frame; nothing is echoed locally

#![warn(missing_docs)]

pub mod bridge;
pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod transport;

// Re-exports for convenience
pub use bridge::{BridgeCommand, BridgeHandle, RelayBridge, RelayStats};
pub use cache::DedupCache;
pub use config::{RelayConfig, TransportConfig, DEDUP_CAPACITY, DEFAULT_UDP_PORT};
pub use core::{Action, DropReason, LocalContent, RelayCore};
pub use error::{RelayError, Result};
pub use transport::{UdpTransport, WirelessTransport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
