//! Codec error types

use thiserror::Error;

use crate::codec::MAX_WIRE_BYTES;

/// Errors produced by the wire codec
#[derive(Error, Debug)]
pub enum CodecError {
    /// Payload is not a well-formed wire message
    #[error("malformed wire payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required field was absent from the decoded object
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The encoded form exceeds the fixed frame bound
    #[error("encoded message is {size} bytes, exceeds wire maximum of {max}")]
    WireTooLarge {
        /// Actual encoded size
        size: usize,
        /// The frame bound ([`MAX_WIRE_BYTES`])
        max: usize,
    },
}

impl CodecError {
    /// Construct the oversize error for an encoded length
    pub(crate) fn too_large(size: usize) -> Self {
        CodecError::WireTooLarge {
            size,
            max: MAX_WIRE_BYTES,
        }
    }
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
