//! Stream publication handles

use crate::client::P2PClient;
use peerlink_base::{ConnectionStats, LocalStream, P2PError, P2PResult, RemoteId};
use std::sync::{Arc, Weak};

/// Handle for one local stream published to one remote user
///
/// Returned by [`P2PClient::publish`] once the channel has confirmed the
/// publish. Holds only a weak reference back to the client, so keeping a
/// publication around never keeps the client alive; operations on a
/// publication that outlived its client fail with `InvalidState`.
#[derive(Debug, Clone)]
pub struct Publication {
    client: Weak<P2PClient>,
    target_id: RemoteId,
    stream: LocalStream,
}

impl Publication {
    pub(crate) fn new(client: Weak<P2PClient>, target_id: RemoteId, stream: LocalStream) -> Self {
        Self {
            client,
            target_id,
            stream,
        }
    }

    /// The remote user this stream is published to
    pub fn target_id(&self) -> &RemoteId {
        &self.target_id
    }

    /// The published local stream
    pub fn stream(&self) -> &LocalStream {
        &self.stream
    }

    /// Stop this publication
    pub async fn stop(&self) -> P2PResult<()> {
        let client = self.client()?;
        client.unpublish(&self.target_id, &self.stream).await
    }

    /// Connection statistics for the session carrying this publication
    pub async fn get_stats(&self) -> P2PResult<ConnectionStats> {
        let client = self.client()?;
        client.get_connection_stats(&self.target_id).await
    }

    fn client(&self) -> P2PResult<Arc<P2PClient>> {
        self.client
            .upgrade()
            .ok_or_else(|| P2PError::invalid_state("Client has been released."))
    }
}
