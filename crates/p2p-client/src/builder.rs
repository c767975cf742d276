//! Client builder for creating P2P clients
//!
//! This module provides a fluent builder interface for constructing P2P
//! clients. The builder collects the client configuration, validates it,
//! and wires the supplied signaling transport and channel factory into a
//! ready [`P2PClient`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use peerlink_p2p_client::{CandidateNetworkPolicy, IceServer, P2PClientBuilder};
//!
//! # async fn run(
//! #     signaling: Arc<dyn peerlink_p2p_client::SignalingChannel>,
//! #     factory: Arc<dyn peerlink_p2p_client::ChannelFactory>,
//! # ) -> peerlink_p2p_client::P2PResult<()> {
//! let client = P2PClientBuilder::new()
//!     .with_ice_server(IceServer::new(vec!["stun:stun.example.com:3478".to_string()]))
//!     .with_candidate_network_policy(CandidateNetworkPolicy::LowCost)
//!     .build(signaling, factory)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::channel::ChannelFactory;
use crate::client::P2PClient;
use crate::signaling::SignalingChannel;
use peerlink_base::{
    CandidateNetworkPolicy, ClientConfiguration, IceServer, P2PError, P2PResult,
};
use std::sync::Arc;
use url::Url;

/// Fluent builder for [`P2PClient`]
///
/// All configuration methods consume and return the builder for chaining.
/// [`build`](Self::build) validates the accumulated configuration before
/// any background task is spawned, so a client that exists is a client
/// whose configuration was accepted.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use peerlink_p2p_client::{IceServer, P2PClientBuilder};
///
/// # async fn run(
/// #     signaling: Arc<dyn peerlink_p2p_client::SignalingChannel>,
/// #     factory: Arc<dyn peerlink_p2p_client::ChannelFactory>,
/// # ) -> peerlink_p2p_client::P2PResult<()> {
/// let client = P2PClientBuilder::new()
///     .with_ice_server(IceServer::with_credentials(
///         vec!["turn:turn.example.com:3478".to_string()],
///         "alice",
///         "secret",
///     ))
///     .build(signaling, factory)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct P2PClientBuilder {
    configuration: ClientConfiguration,
}

impl P2PClientBuilder {
    /// Create a builder with an empty configuration
    ///
    /// The defaults are no ICE servers and
    /// [`CandidateNetworkPolicy::All`]. A client built from the defaults
    /// is fully functional on networks where direct connectivity works
    /// without STUN or TURN.
    pub fn new() -> Self {
        Self {
            configuration: ClientConfiguration::default(),
        }
    }

    /// Add one ICE server to the configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use peerlink_p2p_client::{IceServer, P2PClientBuilder};
    ///
    /// let builder = P2PClientBuilder::new()
    ///     .with_ice_server(IceServer::new(vec!["stun:stun.example.com:3478".to_string()]));
    /// ```
    pub fn with_ice_server(mut self, server: IceServer) -> Self {
        self.configuration.ice_servers.push(server);
        self
    }

    /// Add several ICE servers at once, keeping their order
    pub fn with_ice_servers(mut self, servers: Vec<IceServer>) -> Self {
        self.configuration.ice_servers.extend(servers);
        self
    }

    /// Restrict or widen which network interfaces gather ICE candidates
    pub fn with_candidate_network_policy(mut self, policy: CandidateNetworkPolicy) -> Self {
        self.configuration.candidate_network_policy = policy;
        self
    }

    /// Replace the accumulated configuration wholesale
    ///
    /// Useful when a complete [`ClientConfiguration`] already exists, for
    /// example deserialized from an application settings file.
    pub fn with_configuration(mut self, configuration: ClientConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Validate the configuration and build the client
    ///
    /// Every ICE server url must parse and use one of the `stun`, `stuns`,
    /// `turn` or `turns` schemes; the first offending url fails the build
    /// with `InvalidArgument` and nothing is spawned.
    pub async fn build(
        self,
        signaling: Arc<dyn SignalingChannel>,
        channel_factory: Arc<dyn ChannelFactory>,
    ) -> P2PResult<Arc<P2PClient>> {
        validate_ice_servers(&self.configuration)?;
        Ok(P2PClient::new(self.configuration, signaling, channel_factory).await)
    }
}

fn validate_ice_servers(configuration: &ClientConfiguration) -> P2PResult<()> {
    for server in &configuration.ice_servers {
        for url in &server.urls {
            let parsed = Url::parse(url).map_err(|e| {
                P2PError::invalid_argument(format!("Invalid ICE server url '{}': {}", url, e))
            })?;
            match parsed.scheme() {
                "stun" | "stuns" | "turn" | "turns" => {}
                other => {
                    return Err(P2PError::invalid_argument(format!(
                        "Unsupported ICE server scheme '{}' in url '{}'",
                        other, url
                    )));
                }
            }
        }
    }
    Ok(())
}
