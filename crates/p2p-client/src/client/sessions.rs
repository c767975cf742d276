//! Allow list and session registry state
//!
//! Both registries live in [`ClientCore`] behind the client's single lock,
//! so every command observes and mutates them atomically. Lookups that
//! span an await (factory calls, channel teardown) keep the lock held for
//! the whole critical section; the collaborator traits forbid calling back
//! into the client for exactly this reason.

use super::P2PClient;
use crate::channel::{ChannelConfiguration, PeerConnectionChannel};
use crate::signaling::{ClientSignalingSender, SignalingSender};
use chrono::{DateTime, Utc};
use peerlink_base::RemoteId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// One live relationship with a remote user
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) channel: Arc<dyn PeerConnectionChannel>,
    pub(crate) created_at: DateTime<Utc>,
}

/// Registry state guarded by the client's lock
#[derive(Debug, Default)]
pub(crate) struct ClientCore {
    /// Remote users allowed to interact with this client
    pub(crate) allowed_remote_ids: HashSet<RemoteId>,
    /// Lazily created sessions keyed by remote user
    pub(crate) sessions: HashMap<RemoteId, Session>,
}

impl P2PClient {
    /// Look up the session for a remote user, creating it on first use
    ///
    /// Must be called with the registry lock held; the caller passes the
    /// guarded [`ClientCore`] in. Creation hands the new channel a weak
    /// signaling adapter and the shared channel event sender, so the
    /// channel never holds the client alive.
    pub(crate) fn get_or_create_session(
        self: &Arc<Self>,
        core: &mut ClientCore,
        remote_id: &RemoteId,
    ) -> Arc<dyn PeerConnectionChannel> {
        if let Some(session) = core.sessions.get(remote_id) {
            return session.channel.clone();
        }

        let signaling: Arc<dyn SignalingSender> =
            Arc::new(ClientSignalingSender::new(Arc::downgrade(self)));
        let channel = self.channel_factory.create_channel(
            self.channel_configuration(),
            remote_id,
            signaling,
            self.channel_events_tx.clone(),
        );
        core.sessions.insert(
            remote_id.clone(),
            Session {
                channel: channel.clone(),
                created_at: Utc::now(),
            },
        );
        debug!("Created session with remote user: {}", remote_id);
        channel
    }

    /// Map the client configuration onto the per-channel subset
    pub(crate) fn channel_configuration(&self) -> ChannelConfiguration {
        ChannelConfiguration {
            ice_servers: self.configuration.ice_servers.clone(),
            candidate_network_policy: self.configuration.candidate_network_policy,
        }
    }
}
