//! Signaling and event routing
//!
//! Two background loops bridge the collaborators into the client: one
//! consumes transport events (inbound messages, server disconnects), the
//! other converts channel events into client events for the dispatcher.
//! Both hold only a weak client handle and stop as soon as the client is
//! gone.

use super::P2PClient;
use crate::channel::ChannelEvent;
use crate::events::ClientEvent;
use crate::signaling::{SignalingTransportEvent, CHAT_CLOSED_MESSAGE};
use peerlink_base::{P2PResult, RemoteId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

impl P2PClient {
    /// Forward one outbound signaling payload to the transport
    ///
    /// Channels reach this through their signaling-sender adapter.
    /// Transport failures propagate back to the calling channel.
    pub async fn send_signaling_message(
        &self,
        message: &str,
        remote_id: &RemoteId,
    ) -> P2PResult<()> {
        debug!("Sending signaling message to remote user: {}", remote_id);
        self.signaling.send_message(message, remote_id).await
    }

    /// Route one inbound signaling payload to the right session
    ///
    /// The gate order mirrors command dispatch: unauthorized senders are
    /// dropped before any session work. A chat-closed payload from a user
    /// with no session is dropped as well, so a stale close notification
    /// cannot resurrect a session that was already torn down.
    pub(crate) async fn handle_incoming_message(
        self: &Arc<Self>,
        remote_id: &RemoteId,
        message: &str,
    ) {
        let channel = {
            let mut core = self.core.lock().await;
            if !core.allowed_remote_ids.contains(remote_id) {
                warn!("Chat cannot be setup since the remote user is not allowed.");
                return;
            }
            if message == CHAT_CLOSED_MESSAGE && !core.sessions.contains_key(remote_id) {
                warn!("Non-existed chat cannot be stopped.");
                return;
            }
            self.get_or_create_session(&mut core, remote_id)
        };

        channel.on_incoming_signaling_message(message).await;
    }

    /// Consume transport events until the transport or the client goes away
    pub(crate) fn spawn_transport_loop(
        client: &Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<SignalingTransportEvent>,
    ) -> JoinHandle<()> {
        let weak = Arc::downgrade(client);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(client) = weak.upgrade() else { break };
                match event {
                    SignalingTransportEvent::MessageReceived { message, remote_id } => {
                        client.handle_incoming_message(&remote_id, &message).await;
                    }
                    SignalingTransportEvent::Disconnected => {
                        client.dispatcher.emit(ClientEvent::ServerDisconnected);
                    }
                }
            }
            debug!("Signaling transport loop ended");
        })
    }

    /// Convert channel events into client events for the dispatcher
    pub(crate) fn spawn_channel_event_loop(
        client: &Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<ChannelEvent>,
    ) -> JoinHandle<()> {
        let weak = Arc::downgrade(client);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(client) = weak.upgrade() else { break };
                client.dispatcher.emit(ClientEvent::from(event));
            }
            debug!("Channel event loop ended");
        })
    }
}
