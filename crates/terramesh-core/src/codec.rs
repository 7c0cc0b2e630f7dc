//! JSON wire codec
//!
//! All nodes agree on one flat JSON object:
//!
//! ```json
//! {"uuid": "...", "from_node": "...", "username": "...",
//!  "message": "...", "type": "sensors", "moisture": 0.0, "pressure": 0.0}
//! ```
//!
//! `uuid` and `from_node` are required; everything else is optional and
//! unknown fields must decode without failure, so that newer nodes can add
//! fields without breaking older relays. The encoded form must fit a fixed
//! 256-byte frame - producers are rejected here, never by the relay core.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::ident::{MessageId, NodeId};
use crate::message::{Message, MessageKind, SensorReport, SensorValue};

/// Hard bound on the encoded wire form, in bytes
pub const MAX_WIRE_BYTES: usize = 256;

/// Discriminator value marking a sensor-reading record
const SENSORS_TYPE: &str = "sensors";

/// The flat JSON object as it travels on the wire.
///
/// Every field except the two identifiers is optional so partial or
/// forward-compatible payloads still decode.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WireMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moisture: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pressure: Option<f64>,
}

/// Encode a message into its wire frame.
///
/// Fails with [`CodecError::WireTooLarge`] if the encoded form would not
/// fit [`MAX_WIRE_BYTES`].
pub fn encode(msg: &Message) -> Result<Bytes> {
    let mut wire = WireMessage {
        uuid: Some(msg.id.as_str().to_string()),
        from_node: Some(msg.origin.as_str().to_string()),
        username: msg.sender_name.clone(),
        ..WireMessage::default()
    };

    match &msg.kind {
        MessageKind::Chat { text } => {
            wire.message = Some(text.clone());
        }
        MessageKind::Sensors(report) => {
            wire.kind = Some(SENSORS_TYPE.to_string());
            wire.moisture = Some(report.moisture.wire_value());
            wire.pressure = Some(report.pressure.wire_value());
        }
    }

    let encoded = serde_json::to_vec(&wire)?;
    if encoded.len() > MAX_WIRE_BYTES {
        return Err(CodecError::too_large(encoded.len()));
    }
    Ok(Bytes::from(encoded))
}

/// Decode a wire frame into a message.
///
/// Optional fields may be missing and unknown fields are ignored; only a
/// malformed object or a missing identifier fails.
pub fn decode(raw: &[u8]) -> Result<Message> {
    let wire: WireMessage = serde_json::from_slice(raw)?;

    let id = MessageId(wire.uuid.ok_or(CodecError::MissingField("uuid"))?);
    let origin = NodeId(
        wire.from_node
            .ok_or(CodecError::MissingField("from_node"))?,
    );

    let kind = match wire.kind.as_deref() {
        Some(SENSORS_TYPE) => MessageKind::Sensors(SensorReport {
            moisture: wire
                .moisture
                .map(SensorValue::Reading)
                .unwrap_or(SensorValue::Unavailable),
            pressure: wire
                .pressure
                .map(SensorValue::Reading)
                .unwrap_or(SensorValue::Unavailable),
        }),
        // Unknown discriminators fall back to chat; passthrough keeps the
        // original bytes intact for consumers that do understand them.
        _ => MessageKind::Chat {
            text: wire.message.unwrap_or_default(),
        },
    };

    Ok(Message {
        id,
        origin,
        sender_name: wire.username,
        kind,
    })
}
