//! Connection statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a session's transport statistics
///
/// Produced by the peer connection channel collaborator and returned verbatim
/// by the client; fields the channel cannot measure stay at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStats {
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Estimated round-trip time to the remote peer, if measured
    pub round_trip_time_ms: Option<u32>,
    /// Total bytes sent over this session
    pub bytes_sent: u64,
    /// Total bytes received over this session
    pub bytes_received: u64,
    /// Packets reported lost by the remote peer
    pub packets_lost: u64,
}

impl Default for ConnectionStats {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            round_trip_time_ms: None,
            bytes_sent: 0,
            bytes_received: 0,
            packets_lost: 0,
        }
    }
}
