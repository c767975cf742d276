//! Signaling transport collaborator surface
//!
//! The client does not speak any signaling wire protocol itself. The
//! application supplies a [`SignalingChannel`] implementation (WebSocket,
//! REST, an in-process loopback in tests) and the client drives it: outbound
//! through `connect`/`disconnect`/`send_message`, inbound through the
//! listener channel installed with [`SignalingChannel::set_listener`].

use crate::client::P2PClient;
use peerlink_base::{P2PResult, RemoteId};
use std::sync::Weak;
use tokio::sync::mpsc;
use tracing::warn;

/// The reserved payload a session sends to tear down the remote end.
///
/// An inbound message equal to this payload must never create a session on
/// the receiving side; it only stops one that already exists.
pub const CHAT_CLOSED_MESSAGE: &str = r#"{"type":"chat-closed"}"#;

/// Notifications the signaling transport pushes into the client
#[derive(Debug, Clone, PartialEq)]
pub enum SignalingTransportEvent {
    /// A signaling message arrived from a remote user
    MessageReceived {
        /// The payload, opaque to the transport
        message: String,
        /// The user that sent it
        remote_id: RemoteId,
    },
    /// The connection to the signaling server was lost
    Disconnected,
}

/// Signaling transport collaborator, implemented by the application
///
/// Implementations must not call back into the client from inside these
/// methods; inbound traffic goes through the listener channel instead.
#[async_trait::async_trait]
pub trait SignalingChannel: Send + Sync + std::fmt::Debug {
    /// Connect to the signaling server
    async fn connect(&self, host: &str, token: &str) -> P2PResult<()>;

    /// Disconnect from the signaling server
    async fn disconnect(&self) -> P2PResult<()>;

    /// Send one signaling message to a remote user
    async fn send_message(&self, message: &str, remote_id: &RemoteId) -> P2PResult<()>;

    /// Install the sender the transport uses to push inbound traffic and
    /// disconnect notifications into the client. Called once during client
    /// construction; a replacement sender invalidates the previous one.
    fn set_listener(&self, listener: mpsc::UnboundedSender<SignalingTransportEvent>);
}

/// Outbound signaling path handed to each session's channel
///
/// Sessions never talk to the transport directly; they emit through this
/// trait so every outbound message crosses the client.
#[async_trait::async_trait]
pub trait SignalingSender: Send + Sync + std::fmt::Debug {
    /// Forward one signaling message toward a remote user
    async fn send_signaling_message(&self, message: &str, remote_id: &RemoteId) -> P2PResult<()>;
}

/// [`SignalingSender`] backed by a non-owning client handle.
///
/// The handle is resolved on every call; once the client is gone the message
/// is logged and dropped instead of crashing a session that outlived it.
#[derive(Debug)]
pub(crate) struct ClientSignalingSender {
    client: Weak<P2PClient>,
}

impl ClientSignalingSender {
    pub(crate) fn new(client: Weak<P2PClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl SignalingSender for ClientSignalingSender {
    async fn send_signaling_message(&self, message: &str, remote_id: &RemoteId) -> P2PResult<()> {
        match self.client.upgrade() {
            Some(client) => client.send_signaling_message(message, remote_id).await,
            None => {
                warn!("Dropping outbound signaling message to {}, client has been released", remote_id);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_closed_payload_matches_wire_form() {
        assert_eq!(CHAT_CLOSED_MESSAGE, "{\"type\":\"chat-closed\"}");
    }

    #[tokio::test]
    async fn test_sender_with_released_client_is_a_noop() {
        let sender = ClientSignalingSender::new(Weak::new());
        let result = sender
            .send_signaling_message("hello", &RemoteId::new("bob"))
            .await;
        assert!(result.is_ok());
    }
}
