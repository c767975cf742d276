//! Peer connection channel collaborator surface
//!
//! One channel backs one session. The client core never negotiates media or
//! transports itself; it asks the application's [`ChannelFactory`] for a
//! [`PeerConnectionChannel`] and delegates publish/send/stop/stats to it.
//! Whatever the channel learns on its own (the remote side started or closed
//! the chat, data arrived, streams came and went) flows back through the
//! event sender the factory received.

use crate::events::ClientEvent;
use crate::signaling::SignalingSender;
use peerlink_base::{
    CandidateNetworkPolicy, ConnectionStats, IceServer, LocalStream, P2PResult, RemoteId,
    RemoteStream,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Configuration for a single peer connection channel
///
/// Derived from the client's [`peerlink_base::ClientConfiguration`] at
/// session creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfiguration {
    /// ICE servers the channel may use
    pub ice_servers: Vec<IceServer>,
    /// Candidate gathering policy for the channel
    pub candidate_network_policy: CandidateNetworkPolicy,
}

/// Events a peer connection channel reports back to its client
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The session became active
    Started {
        /// The remote user of the reporting session
        remote_id: RemoteId,
    },
    /// The session ended
    Stopped {
        /// The remote user of the reporting session
        remote_id: RemoteId,
    },
    /// The remote user declined the session
    Denied {
        /// The remote user of the reporting session
        remote_id: RemoteId,
    },
    /// A text message arrived over the session's data path
    DataReceived {
        /// The remote user of the reporting session
        remote_id: RemoteId,
        /// The message payload
        message: String,
    },
    /// The remote user published a stream over this session
    StreamAdded {
        /// The newly available stream
        stream: RemoteStream,
    },
    /// A remote stream on this session went away
    StreamRemoved {
        /// The stream that is no longer available
        stream: RemoteStream,
    },
}

impl From<ChannelEvent> for ClientEvent {
    fn from(event: ChannelEvent) -> Self {
        match event {
            ChannelEvent::Started { remote_id } => ClientEvent::ChatStarted { remote_id },
            ChannelEvent::Stopped { remote_id } => ClientEvent::ChatStopped { remote_id },
            ChannelEvent::Denied { remote_id } => ClientEvent::Denied { remote_id },
            ChannelEvent::DataReceived { remote_id, message } => {
                ClientEvent::DataReceived { remote_id, message }
            }
            ChannelEvent::StreamAdded { stream } => ClientEvent::StreamAdded { stream },
            ChannelEvent::StreamRemoved { stream } => ClientEvent::StreamRemoved { stream },
        }
    }
}

/// One session's negotiation and transport engine, implemented by the
/// application
///
/// Implementations report failures with their own messages; the client core
/// passes them through unchanged. Implementations must not call back into
/// client operations that take the registry lock (`publish`, `send`, `stop`,
/// and friends) from inside these methods - the outbound signaling sender
/// and the channel event sender are the supported paths back out.
#[async_trait::async_trait]
pub trait PeerConnectionChannel: Send + Sync + std::fmt::Debug {
    /// Publish a local stream over this session
    async fn publish(&self, stream: &LocalStream) -> P2PResult<()>;

    /// Stop publishing a previously published local stream
    async fn unpublish(&self, stream: &LocalStream) -> P2PResult<()>;

    /// Send a text message over this session's data path
    async fn send(&self, message: &str) -> P2PResult<()>;

    /// Tear the session down, notifying the remote side
    async fn stop(&self) -> P2PResult<()>;

    /// Snapshot the session's transport statistics
    async fn get_connection_stats(&self) -> P2PResult<ConnectionStats>;

    /// Deliver one inbound signaling message addressed to this session
    async fn on_incoming_signaling_message(&self, message: &str);
}

/// Builds one [`PeerConnectionChannel`] per session, implemented by the
/// application
pub trait ChannelFactory: Send + Sync + std::fmt::Debug {
    /// Construct the channel for a new session
    ///
    /// Called exactly once per live session, under the client's registry
    /// lock: implementations must only wire the object up, not perform I/O
    /// or call back into the client. `signaling` is the session's outbound
    /// signaling path and `events` its reporting path.
    fn create_channel(
        &self,
        config: ChannelConfiguration,
        remote_id: &RemoteId,
        signaling: Arc<dyn SignalingSender>,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Arc<dyn PeerConnectionChannel>;
}
