//! Client configuration types
//!
//! [`ClientConfiguration`] is supplied when a client is created and applies to
//! every session the client opens. Loading values from files or environment is
//! left to the application; these are plain serde-friendly types.

use serde::{Deserialize, Serialize};

/// A single ICE server entry (STUN or TURN)
///
/// # Examples
///
/// ```rust
/// use peerlink_base::IceServer;
///
/// let stun = IceServer::new(vec!["stun:stun.example.com:19302".to_string()]);
/// let turn = IceServer::with_credentials(
///     vec!["turn:turn.example.com:3478".to_string()],
///     "alice",
///     "secret",
/// );
/// assert!(turn.has_credentials());
/// assert!(!stun.has_credentials());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    /// Server URIs, e.g. `stun:host:port` or `turn:host:port`
    pub urls: Vec<String>,
    /// Username for TURN authentication, empty for STUN
    pub username: String,
    /// Password for TURN authentication, empty for STUN
    pub password: String,
}

impl IceServer {
    /// Create an ICE server entry without credentials
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: String::new(),
            password: String::new(),
        }
    }

    /// Create an ICE server entry with TURN credentials
    pub fn with_credentials(
        urls: Vec<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            urls,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether this entry carries TURN credentials
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }
}

/// Which network interfaces ICE candidate gathering may use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateNetworkPolicy {
    /// Gather candidates on low-cost networks only (skip cellular and
    /// other metered interfaces)
    LowCost,
    /// Gather candidates on every available network
    #[default]
    All,
}

impl std::fmt::Display for CandidateNetworkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowCost => write!(f, "low-cost"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Configuration applied to every session a client creates
///
/// # Examples
///
/// ```rust
/// use peerlink_base::{CandidateNetworkPolicy, ClientConfiguration, IceServer};
///
/// let config = ClientConfiguration::default()
///     .with_ice_server(IceServer::new(vec!["stun:stun.example.com:19302".to_string()]))
///     .with_candidate_network_policy(CandidateNetworkPolicy::LowCost);
/// assert_eq!(config.ice_servers.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfiguration {
    /// ICE servers handed to every new session
    pub ice_servers: Vec<IceServer>,
    /// Candidate gathering policy for every new session
    pub candidate_network_policy: CandidateNetworkPolicy,
}

impl ClientConfiguration {
    /// Create an empty configuration (no ICE servers, default policy)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one ICE server entry
    pub fn with_ice_server(mut self, server: IceServer) -> Self {
        self.ice_servers.push(server);
        self
    }

    /// Replace the ICE server list
    pub fn with_ice_servers(mut self, servers: Vec<IceServer>) -> Self {
        self.ice_servers = servers;
        self
    }

    /// Set the candidate gathering policy
    pub fn with_candidate_network_policy(mut self, policy: CandidateNetworkPolicy) -> Self {
        self.candidate_network_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults_to_all() {
        assert_eq!(CandidateNetworkPolicy::default(), CandidateNetworkPolicy::All);
        assert_eq!(
            ClientConfiguration::default().candidate_network_policy,
            CandidateNetworkPolicy::All
        );
    }

    #[test]
    fn test_builder_helpers_accumulate() {
        let config = ClientConfiguration::new()
            .with_ice_server(IceServer::new(vec!["stun:a.example.com:3478".to_string()]))
            .with_ice_server(IceServer::with_credentials(
                vec!["turn:b.example.com:3478".to_string()],
                "user",
                "pass",
            ))
            .with_candidate_network_policy(CandidateNetworkPolicy::LowCost);

        assert_eq!(config.ice_servers.len(), 2);
        assert!(config.ice_servers[1].has_credentials());
        assert_eq!(config.candidate_network_policy, CandidateNetworkPolicy::LowCost);
    }
}
