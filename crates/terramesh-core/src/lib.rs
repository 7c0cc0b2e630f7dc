//! Terramesh Core - Message model and wire codec for the flood relay
//!
//! This crate provides the types every terramesh node agrees on, independent
//! of transport or role:
//!
//! - [`ident`] - Node and message identifiers
//! - [`message`] - The decoded message model (chat and sensor readings)
//! - [`codec`] - JSON wire codec with the 256-byte frame bound
//! - [`error`] - Codec error types
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use terramesh_core::{codec, Message, MessageId, NodeId};
//!
//! let mut rng = SmallRng::from_entropy();
//! let msg = Message::chat(
//!     MessageId::generate(&mut rng),
//!     NodeId::from("field-7"),
//!     Some("Admin".to_string()),
//!     "help needed".to_string(),
//! );
//!
//! let frame = codec::encode(&msg).unwrap();
//! let decoded = codec::decode(&frame).unwrap();
//! assert_eq!(decoded.id, msg.id);
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod ident;
pub mod message;

// Re-exports for convenience
pub use codec::MAX_WIRE_BYTES;
pub use error::{CodecError, Result};
pub use ident::{MessageId, NodeId};
pub use message::{Message, MessageKind, SensorReport, SensorValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
