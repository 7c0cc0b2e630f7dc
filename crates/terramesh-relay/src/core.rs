//! Relay core: the dedup-and-forward decision
//!
//! One [`RelayCore`] instance runs per node and owns all relay state - the
//! dedup cache and the id generator. Every call is a function of the input
//! and the current cache: no timers, no retries, no acknowledgements.
//!
//! The core decides; it never performs I/O. On [`Action::Accept`] the
//! surrounding bridge forwards the *original* received bytes to both the
//! local sinks and the wireless medium, so fields the local decoder does not
//! understand survive the relay bit-identically.

use bytes::Bytes;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use terramesh_core::{codec, Message, MessageId, NodeId, SensorReport};

use crate::cache::DedupCache;
use crate::config::RelayConfig;
use crate::error::Result;

/// Relay decision for a received wireless frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// New message: deliver locally and rebroadcast
    Accept,
    /// Suppressed: no further effect
    Drop(DropReason),
}

/// Why a frame was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The frame did not decode as a wire message
    Malformed,
    /// The message id is already in the dedup window
    Duplicate,
}

/// Content handed to the relay by a local producer
#[derive(Debug, Clone, PartialEq)]
pub enum LocalContent {
    /// Operator-typed chat text
    Chat {
        /// Attribution carried in the `username` wire field
        sender_name: Option<String>,
        /// The chat text
        text: String,
    },
    /// A freshly sampled sensor reading
    Sensors(SensorReport),
}

/// Per-node relay state: dedup cache plus id generator.
///
/// Not shared across nodes or threads; the bridge task is the only caller.
#[derive(Debug)]
pub struct RelayCore {
    node_id: NodeId,
    cache: DedupCache,
    // Id uniqueness is statistical, not a security property
    rng: SmallRng,
}

impl RelayCore {
    /// Create a relay core for the given node with default settings
    pub fn new(node_id: NodeId) -> Self {
        Self::with_config(node_id, &RelayConfig::default())
    }

    /// Create a relay core from configuration
    pub fn with_config(node_id: NodeId, config: &RelayConfig) -> Self {
        Self {
            node_id,
            cache: DedupCache::with_capacity(config.dedup_capacity),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Decide what to do with a frame received from the wireless medium.
    ///
    /// Malformed frames and duplicate ids are dropped; a new id is recorded
    /// in the dedup window and the frame is accepted. The decision mutates
    /// only the cache - forwarding the bytes is the bridge's job.
    pub fn on_wireless_message(&mut self, raw: &[u8]) -> Action {
        let msg = match codec::decode(raw) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, len = raw.len(), "dropping undecodable frame");
                return Action::Drop(DropReason::Malformed);
            }
        };

        if !self.cache.observe(&msg.id) {
            trace!(id = %msg.id, "dropping duplicate message");
            return Action::Drop(DropReason::Duplicate);
        }

        debug!(id = %msg.id, origin = %msg.origin, "accepted new message");
        Action::Accept
    }

    /// Stamp locally originated content with a fresh id and encode it.
    ///
    /// The result goes to the wireless medium only - a node never loops its
    /// own message back to its local sinks. The fresh id is deliberately not
    /// recorded in the dedup cache: it can only come back as a peer's
    /// verbatim rebroadcast, which costs at most one extra echo that the
    /// peers' own windows suppress beyond one hop.
    pub fn on_local_message(&mut self, content: LocalContent) -> Result<Bytes> {
        let id = MessageId::generate(&mut self.rng);
        let msg = match content {
            LocalContent::Chat { sender_name, text } => {
                Message::chat(id, self.node_id.clone(), sender_name, text)
            }
            LocalContent::Sensors(report) => Message::sensors(id, self.node_id.clone(), report),
        };

        trace!(id = %msg.id, "stamped local message");
        Ok(codec::encode(&msg)?)
    }

    /// This node's identifier
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Number of ids currently in the dedup window
    pub fn seen_count(&self) -> usize {
        self.cache.len()
    }
}
