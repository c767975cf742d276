//! Client command surface
//!
//! Every command takes the registry lock once, runs its authorization gate
//! and registry mutations inside that critical section, and drops the lock
//! before per-channel work that no longer involves the registries. Stop is
//! the exception: channel teardown stays inside the critical section so the
//! session entry, the allow-list entry and the channel shutdown form one
//! atomic unit.

use super::sessions::ClientCore;
use super::P2PClient;
use crate::publication::Publication;
use chrono::Utc;
use peerlink_base::{ConnectionStats, LocalStream, P2PError, P2PResult, RemoteId};
use std::sync::Arc;
use tracing::{debug, info};

impl P2PClient {
    /// Connect to the signaling server
    pub async fn connect(&self, host: &str, token: &str) -> P2PResult<()> {
        info!("📡 Connecting to signaling server: {}", host);
        self.signaling.connect(host, token).await
    }

    /// Disconnect from the signaling server
    ///
    /// Transport failures pass through. A spontaneous disconnect reported
    /// by the transport surfaces as
    /// [`ClientEvent::ServerDisconnected`](crate::ClientEvent::ServerDisconnected)
    /// instead of going through here.
    pub async fn disconnect(&self) -> P2PResult<()> {
        info!("📡 Disconnecting from signaling server");
        self.signaling.disconnect().await
    }

    /// Allow a remote user to interact with this client
    ///
    /// Commands targeting a user and inbound messages from a user are both
    /// rejected until the user is on this list. Adding an id that is
    /// already present is benign.
    pub async fn add_allowed_remote_id(&self, remote_id: impl Into<RemoteId>) {
        let remote_id = remote_id.into();
        let mut core = self.core.lock().await;
        if !core.allowed_remote_ids.insert(remote_id.clone()) {
            info!("Adding duplicated remote id.");
            return;
        }
        debug!("Allowed remote user: {}", remote_id);
    }

    /// Revoke a remote user's authorization
    ///
    /// Also tears down the session with that user if one exists, exactly
    /// like [`stop`](Self::stop). Fails with `RemoteNotExisted` when the id
    /// was never allowed.
    pub async fn remove_allowed_remote_id(&self, remote_id: &RemoteId) -> P2PResult<()> {
        let mut core = self.core.lock().await;
        if !core.allowed_remote_ids.contains(remote_id) {
            return Err(P2PError::remote_not_existed(
                "Trying to delete non-existed remote id.",
            ));
        }
        self.stop_session_locked(&mut core, remote_id).await
    }

    /// Publish a local stream to a remote user
    ///
    /// The target must be allowed. A session is created on first use; the
    /// returned [`Publication`] controls this one stream and holds only a
    /// weak handle on the client.
    pub async fn publish(
        self: &Arc<Self>,
        target_id: &RemoteId,
        stream: LocalStream,
    ) -> P2PResult<Publication> {
        let channel = {
            let mut core = self.core.lock().await;
            if !core.allowed_remote_ids.contains(target_id) {
                return Err(P2PError::remote_not_allowed(
                    "Publishing a stream cannot be done since the remote user is not allowed.",
                ));
            }
            self.get_or_create_session(&mut core, target_id)
        };

        debug!("▶️ Publishing stream {} to remote user: {}", stream, target_id);
        channel.publish(&stream).await?;
        Ok(Publication::new(
            Arc::downgrade(self),
            target_id.clone(),
            stream,
        ))
    }

    /// Stop publishing a stream to a remote user
    ///
    /// Requires an existing session; unlike [`publish`](Self::publish) this
    /// never creates one.
    pub async fn unpublish(&self, target_id: &RemoteId, stream: &LocalStream) -> P2PResult<()> {
        let channel = {
            let core = self.core.lock().await;
            match core.sessions.get(target_id) {
                Some(session) => session.channel.clone(),
                None => {
                    return Err(P2PError::remote_not_existed(
                        "Unpublishing a stream cannot be done since no session is set up with the remote user.",
                    ))
                }
            }
        };

        debug!("⏹️ Unpublishing stream {} to remote user: {}", stream, target_id);
        channel.unpublish(stream).await
    }

    /// Send a text message to a remote user over the data path
    ///
    /// The target must be allowed. A session is created on first use.
    pub async fn send(self: &Arc<Self>, target_id: &RemoteId, message: &str) -> P2PResult<()> {
        let channel = {
            let mut core = self.core.lock().await;
            if !core.allowed_remote_ids.contains(target_id) {
                return Err(P2PError::remote_not_allowed(
                    "Sending a message cannot be done since the remote user is not allowed.",
                ));
            }
            self.get_or_create_session(&mut core, target_id)
        };

        debug!("Sending message to remote user: {}", target_id);
        channel.send(message).await
    }

    /// End the relationship with a remote user
    ///
    /// Stops the session if one exists and removes both the session and the
    /// allow-list entry in one critical section. An id with neither a
    /// session nor an allow-list entry fails with `RemoteNotExisted`.
    pub async fn stop(&self, remote_id: &RemoteId) -> P2PResult<()> {
        let mut core = self.core.lock().await;
        if !core.sessions.contains_key(remote_id) && !core.allowed_remote_ids.contains(remote_id) {
            return Err(P2PError::remote_not_existed(
                "Trying to stop non-existed remote id.",
            ));
        }
        self.stop_session_locked(&mut core, remote_id).await
    }

    /// Connection statistics for the session with a remote user
    ///
    /// Requires an existing session; never creates one.
    pub async fn get_connection_stats(&self, target_id: &RemoteId) -> P2PResult<ConnectionStats> {
        let channel = {
            let core = self.core.lock().await;
            match core.sessions.get(target_id) {
                Some(session) => session.channel.clone(),
                None => {
                    return Err(P2PError::remote_not_existed(
                        "Getting connection stats cannot be done since no session is set up with the remote user.",
                    ))
                }
            }
        };

        channel.get_connection_stats().await
    }

    /// Remove a remote user's registry entries and stop their channel
    ///
    /// Caller holds the registry lock and has verified at least one entry
    /// exists. Both entries are removed even when channel stop fails.
    async fn stop_session_locked(
        &self,
        core: &mut ClientCore,
        remote_id: &RemoteId,
    ) -> P2PResult<()> {
        let session = core.sessions.remove(remote_id);
        core.allowed_remote_ids.remove(remote_id);
        if let Some(session) = session {
            let uptime = Utc::now().signed_duration_since(session.created_at);
            debug!(
                "⏹️ Stopping session with remote user: {} (up {}s)",
                remote_id,
                uptime.num_seconds()
            );
            session.channel.stop().await?;
        }
        Ok(())
    }
}
