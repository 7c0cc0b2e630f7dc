//! Relay and transport configuration

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Capacity of the dedup window, in message ids
pub const DEDUP_CAPACITY: usize = 20;

/// Default UDP port for the host broadcast transport
pub const DEFAULT_UDP_PORT: u16 = 47900;

/// Relay core behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Dedup window capacity
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,
}

fn default_dedup_capacity() -> usize {
    DEDUP_CAPACITY
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            dedup_capacity: DEDUP_CAPACITY,
        }
    }
}

/// Settings for the UDP broadcast host transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Port shared by every node in the broadcast domain
    #[serde(default = "default_udp_port")]
    pub port: u16,

    /// Broadcast destination address (all-ones by default)
    #[serde(default = "default_broadcast_addr")]
    pub broadcast_addr: Ipv4Addr,
}

fn default_udp_port() -> u16 {
    DEFAULT_UDP_PORT
}

fn default_broadcast_addr() -> Ipv4Addr {
    Ipv4Addr::BROADCAST
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_UDP_PORT,
            broadcast_addr: Ipv4Addr::BROADCAST,
        }
    }
}
