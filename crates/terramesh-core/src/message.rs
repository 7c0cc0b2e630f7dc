//! Decoded message model for the mesh
//!
//! A [`Message`] is the unit of exchange between nodes: either operator chat
//! text or a structured sensor reading. Relays never modify a message in
//! flight; the decoded form exists only so the relay can extract the id and
//! local consumers can inspect payloads.

use serde::{Deserialize, Serialize};

use crate::ident::{MessageId, NodeId};

/// Outcome of a single sensor read.
///
/// Kept distinct from a plain float so in-process consumers can tell a real
/// zero reading from a missing or disconnected sensor. On the wire an
/// unavailable sensor degrades to the `0.0` sentinel all nodes expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SensorValue {
    /// A real measurement was taken
    Reading(f64),
    /// The sensor is absent or disconnected
    Unavailable,
}

impl SensorValue {
    /// Whether a real measurement is present
    pub fn is_available(&self) -> bool {
        matches!(self, SensorValue::Reading(_))
    }

    /// The value sent on the wire: the measurement, or the `0.0` sentinel.
    pub fn wire_value(&self) -> f64 {
        match self {
            SensorValue::Reading(v) => *v,
            SensorValue::Unavailable => 0.0,
        }
    }
}

/// One sampling round from a sensor node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    /// Soil moisture, percent of saturation (0-100)
    pub moisture: SensorValue,
    /// Barometric pressure in hPa
    pub pressure: SensorValue,
}

/// Message payload discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Free-text operator chat
    Chat {
        /// The chat text (empty when the wire field was absent)
        text: String,
    },
    /// A structured sensor reading record
    Sensors(SensorReport),
}

/// The unit of exchange between mesh nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier, generated once at origin
    pub id: MessageId,
    /// Node that generated the content
    pub origin: NodeId,
    /// Optional human-readable attribution (chat messages)
    pub sender_name: Option<String>,
    /// Payload
    pub kind: MessageKind,
}

impl Message {
    /// Create a chat message
    pub fn chat(id: MessageId, origin: NodeId, sender_name: Option<String>, text: String) -> Self {
        Self {
            id,
            origin,
            sender_name,
            kind: MessageKind::Chat { text },
        }
    }

    /// Create a sensor-reading message
    pub fn sensors(id: MessageId, origin: NodeId, report: SensorReport) -> Self {
        Self {
            id,
            origin,
            sender_name: None,
            kind: MessageKind::Sensors(report),
        }
    }
}
