//! # peerlink-base
//!
//! Shared base types for the peerlink P2P client SDK:
//!
//! - **Error taxonomy**: the closed [`P2PError`] enumeration every SDK
//!   operation reports through
//! - **Configuration**: [`ClientConfiguration`], [`IceServer`] and the ICE
//!   candidate gathering policy
//! - **Identity**: the opaque [`RemoteId`] remote user identifier
//! - **Streams**: [`LocalStream`] / [`RemoteStream`] opaque media handles
//! - **Statistics**: per-session [`ConnectionStats`] snapshots
//!
//! Client orchestration lives in `peerlink-p2p-client`, which builds on these
//! types.

pub mod config;
pub mod error;
pub mod identity;
pub mod stats;
pub mod stream;

// Re-export main types
pub use config::{CandidateNetworkPolicy, ClientConfiguration, IceServer};
pub use error::{P2PError, P2PResult};
pub use identity::RemoteId;
pub use stats::ConnectionStats;
pub use stream::{LocalStream, RemoteStream};
