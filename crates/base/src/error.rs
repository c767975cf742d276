//! Error types shared across the peerlink SDK
//!
//! Every fallible operation in the SDK reports failures through [`P2PError`].
//! The enumeration is closed: client code can match on it exhaustively and
//! collaborator implementations (signaling transports, peer connection
//! channels) report their own failures through the pass-through variants
//! without the client core reinterpreting them.

use thiserror::Error;

/// Result type for peerlink SDK operations
pub type P2PResult<T> = Result<T, P2PError>;

/// Errors that can occur in the peerlink SDK
#[derive(Debug, Clone, Error)]
pub enum P2PError {
    /// Operation targeted a remote user outside the allow list
    #[error("Remote user not allowed: {message}")]
    RemoteNotAllowed { message: String },

    /// Operation targeted a remote user this client has no standing with
    #[error("Remote user not existed: {message}")]
    RemoteNotExisted { message: String },

    /// Operation issued against a released client or dead session handle
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Operation received a malformed argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Failure reported by the signaling transport, passed through unchanged
    #[error("Signaling error: {message}")]
    Signaling { message: String },

    /// Failure reported by a peer connection channel, passed through unchanged
    #[error("Channel error: {message}")]
    Channel { message: String },

    /// Unclassified failure
    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl P2PError {
    /// Create a remote-not-allowed error
    pub fn remote_not_allowed(message: impl Into<String>) -> Self {
        Self::RemoteNotAllowed {
            message: message.into(),
        }
    }

    /// Create a remote-not-existed error
    pub fn remote_not_existed(message: impl Into<String>) -> Self {
        Self::RemoteNotExisted {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a signaling transport error
    pub fn signaling(message: impl Into<String>) -> Self {
        Self::Signaling {
            message: message.into(),
        }
    }

    /// Create a peer connection channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Create an unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// The human-readable message carried by this error
    pub fn message(&self) -> &str {
        match self {
            Self::RemoteNotAllowed { message }
            | Self::RemoteNotExisted { message }
            | Self::InvalidState { message }
            | Self::InvalidArgument { message }
            | Self::Signaling { message }
            | Self::Channel { message }
            | Self::Unknown { message } => message,
        }
    }

    /// Get error kind for metrics/logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RemoteNotAllowed { .. } => "remote-not-allowed",
            Self::RemoteNotExisted { .. } => "remote-not-existed",
            Self::InvalidState { .. } => "invalid-state",
            Self::InvalidArgument { .. } => "invalid-argument",
            Self::Signaling { .. } => "signaling",
            Self::Channel { .. } => "channel",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Whether the failure originated in a collaborator rather than the
    /// client core itself
    pub fn is_collaborator_error(&self) -> bool {
        matches!(self, Self::Signaling { .. } | Self::Channel { .. })
    }
}

impl Default for P2PError {
    fn default() -> Self {
        Self::Unknown {
            message: "Unknown exception.".to_string(),
        }
    }
}
