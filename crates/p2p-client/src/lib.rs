//! # peerlink-p2p-client - Direct Peer Session Orchestration
//!
//! This crate provides the client-side orchestrator for direct peer-to-peer
//! audio, video and data sessions. It coordinates:
//! - **Authorization**: an explicit allow list gating every outbound command
//!   and every inbound signaling message
//! - **Sessions**: at most one lazily created session per remote user, each
//!   owning one peer-connection channel
//! - **Events**: a serialized dispatcher delivering client events to
//!   registered observers in emission order
//! - **Signaling**: routing between the signaling transport and the session
//!   that each payload belongs to
//!
//! The signaling wire and the media engine are collaborators injected at
//! build time ([`SignalingChannel`] and [`ChannelFactory`]), so the
//! orchestration logic stays independent of any particular server protocol
//! or WebRTC stack.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use peerlink_p2p_client::{P2PClientBuilder, IceServer};
//!
//! # async fn run(
//! #     signaling: Arc<dyn peerlink_p2p_client::SignalingChannel>,
//! #     factory: Arc<dyn peerlink_p2p_client::ChannelFactory>,
//! #     observer: Arc<dyn peerlink_p2p_client::P2PClientObserver>,
//! # ) -> peerlink_p2p_client::P2PResult<()> {
//! // Build a client around your signaling transport and channel factory
//! let client = P2PClientBuilder::new()
//!     .with_ice_server(IceServer::new(vec!["stun:stun.example.com:3478".to_string()]))
//!     .build(signaling, factory)
//!     .await?;
//!
//! client.add_observer(observer).await;
//! client.connect("wss://signaling.example.com", "token").await?;
//!
//! // Nothing involving bob works until bob is allowed
//! client.add_allowed_remote_id("bob").await;
//! client.send(&"bob".into(), "hello").await?;
//!
//! // Tear down the relationship: session and allow-list entry go together
//! client.stop(&"bob".into()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! [`P2PClient`] owns two registries behind one lock (the allow list and
//! the session map), a serialized event dispatcher, and two background
//! routing loops. Commands gate on authorization first, then resolve or
//! create the session, then delegate to its channel. Inbound signaling
//! goes through the same gate before it can reach or create a session.
//!
//! ## Features
//!
//! - Allow-list authorization enforced on both directions
//! - Lazy session creation with a single-creation guarantee per remote user
//! - Ordered, serialized observer event delivery
//! - Weak back-references everywhere a collaborator points at the client

#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/peerlink-p2p-client/0.1.4")]

pub mod builder;
pub mod channel;
pub mod client;
pub mod events;
pub mod publication;
pub mod signaling;

// Re-export main types
pub use builder::P2PClientBuilder;
pub use channel::{ChannelConfiguration, ChannelEvent, ChannelFactory, PeerConnectionChannel};
pub use client::P2PClient;
pub use events::{ClientEvent, ObserverId, P2PClientObserver};
pub use publication::Publication;
pub use signaling::{
    SignalingChannel, SignalingSender, SignalingTransportEvent, CHAT_CLOSED_MESSAGE,
};

// Re-export the shared base types so applications need only one import
pub use peerlink_base::{
    CandidateNetworkPolicy, ClientConfiguration, ConnectionStats, IceServer, LocalStream,
    P2PError, P2PResult, RemoteId, RemoteStream,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
