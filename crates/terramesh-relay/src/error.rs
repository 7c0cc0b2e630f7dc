//! Error types for relay and transport operations

use thiserror::Error;

use terramesh_core::CodecError;

/// Main error type for relay operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// Wire codec failure on a locally originated message
    #[error("wire codec error: {0}")]
    Codec(#[from] CodecError),

    /// The wireless transport failed to start (fatal at node startup)
    #[error("failed to start wireless transport: {0}")]
    TransportInit(String),

    /// A broadcast send failed
    #[error("wireless send failed: {0}")]
    SendFailed(String),

    /// A receive attempt failed
    #[error("wireless receive failed: {0}")]
    RecvFailed(String),

    /// A control or data channel closed
    #[error("channel closed")]
    ChannelClosed,

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for RelayError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        RelayError::ChannelClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_wraps() {
        let codec = CodecError::MissingField("uuid");
        let err = RelayError::from(codec);
        assert!(err.to_string().contains("uuid"));
    }

    #[test]
    fn test_transport_init_message() {
        let err = RelayError::TransportInit("bind refused".to_string());
        assert!(err.to_string().contains("bind refused"));
    }
}
