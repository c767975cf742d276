//! The P2P client
//!
//! [`P2PClient`] coordinates everything this crate does: it keeps the
//! allow list and the per-user session registry behind one lock, runs the
//! serialized event dispatcher, routes inbound signaling to the right
//! session and exposes the command surface (`connect`, `publish`, `send`,
//! `stop`, ...). Media negotiation and the signaling wire live behind the
//! [`ChannelFactory`] and [`SignalingChannel`](crate::SignalingChannel)
//! collaborators supplied at construction.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use peerlink_p2p_client::{ClientConfiguration, P2PClient};
//! # async fn run(
//! #     signaling: Arc<dyn peerlink_p2p_client::SignalingChannel>,
//! #     factory: Arc<dyn peerlink_p2p_client::ChannelFactory>,
//! # ) -> peerlink_p2p_client::P2PResult<()> {
//! let client = P2PClient::new(ClientConfiguration::default(), signaling, factory).await;
//! client.connect("wss://signaling.example.com", "token").await?;
//! client.add_allowed_remote_id("bob").await;
//! client.send(&"bob".into(), "hello").await?;
//! # Ok(())
//! # }
//! ```

mod commands;
mod router;
mod sessions;

use crate::channel::{ChannelEvent, ChannelFactory};
use crate::events::{EventDispatcher, ObserverId, P2PClientObserver};
use crate::signaling::SignalingChannel;
use peerlink_base::{ClientConfiguration, RemoteId};
use sessions::ClientCore;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Client-side orchestrator for direct peer-to-peer sessions
///
/// One instance represents one local user. Remote users must be allowed
/// explicitly before any session can involve them; sessions themselves are
/// created lazily by the first command or inbound message that needs one.
#[derive(Debug)]
pub struct P2PClient {
    pub(crate) configuration: ClientConfiguration,
    pub(crate) signaling: Arc<dyn SignalingChannel>,
    pub(crate) channel_factory: Arc<dyn ChannelFactory>,
    /// Allow list and session registry, always mutated together under
    /// this one lock.
    pub(crate) core: Mutex<ClientCore>,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) channel_events_tx: mpsc::UnboundedSender<ChannelEvent>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl P2PClient {
    /// Create a client wired to the given collaborators
    ///
    /// Installs the inbound listener on the signaling transport and spawns
    /// the routing and dispatch tasks. The tasks hold only weak handles;
    /// dropping the last `Arc` shuts them down.
    pub async fn new(
        configuration: ClientConfiguration,
        signaling: Arc<dyn SignalingChannel>,
        channel_factory: Arc<dyn ChannelFactory>,
    ) -> Arc<Self> {
        let dispatcher = EventDispatcher::start();
        let (channel_events_tx, channel_events_rx) = mpsc::unbounded_channel::<ChannelEvent>();
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();

        let client = Arc::new(Self {
            configuration,
            signaling,
            channel_factory,
            core: Mutex::new(ClientCore::default()),
            dispatcher,
            channel_events_tx,
            task_handles: Mutex::new(Vec::new()),
        });

        client.signaling.set_listener(transport_tx);

        let transport_loop = Self::spawn_transport_loop(&client, transport_rx);
        let forward_loop = Self::spawn_channel_event_loop(&client, channel_events_rx);
        {
            let mut handles = client.task_handles.lock().await;
            handles.push(transport_loop);
            handles.push(forward_loop);
        }

        info!("P2P client created");
        client
    }

    /// The configuration this client was created with
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    /// Register an observer; it joins the end of the delivery order
    pub async fn add_observer(&self, observer: Arc<dyn P2PClientObserver>) -> ObserverId {
        self.dispatcher.add_observer(observer).await
    }

    /// Unregister an observer by the handle `add_observer` returned
    ///
    /// After this returns, no event emitted later can reach the observer.
    /// Returns false for a handle that was never registered or was already
    /// removed.
    pub async fn remove_observer(&self, id: ObserverId) -> bool {
        self.dispatcher.remove_observer(id).await
    }

    /// Whether a remote user is currently on the allow list
    pub async fn is_allowed(&self, remote_id: &RemoteId) -> bool {
        self.core.lock().await.allowed_remote_ids.contains(remote_id)
    }

    /// Whether a session with a remote user currently exists
    pub async fn has_session(&self, remote_id: &RemoteId) -> bool {
        self.core.lock().await.sessions.contains_key(remote_id)
    }

    /// The remote users this client currently has sessions with
    pub async fn active_sessions(&self) -> Vec<RemoteId> {
        self.core.lock().await.sessions.keys().cloned().collect()
    }
}

impl Drop for P2PClient {
    fn drop(&mut self) {
        for handle in self.task_handles.get_mut().iter() {
            handle.abort();
        }
        debug!("P2P client dropped");
    }
}
