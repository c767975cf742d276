//! Common test helpers for P2P client integration tests
//!
//! Provides recording fakes for the three collaborator surfaces (signaling
//! transport, channel factory, peer connection channel) plus an observer
//! that records every event it receives. The fakes never call back into the
//! client from collaborator methods, matching the contract real
//! implementations must honor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use peerlink_p2p_client::{
    ChannelConfiguration, ChannelEvent, ChannelFactory, ClientConfiguration, ClientEvent,
    ConnectionStats, LocalStream, P2PClient, P2PClientObserver, P2PError, P2PResult,
    PeerConnectionChannel, RemoteId, SignalingChannel, SignalingSender, SignalingTransportEvent,
};

/// Give the routing loops and the dispatcher time to drain
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

/// Build a client wired to fresh mock collaborators
pub async fn test_client() -> (
    Arc<P2PClient>,
    Arc<MockSignalingChannel>,
    Arc<MockChannelFactory>,
) {
    test_client_with_config(ClientConfiguration::default()).await
}

/// Build a client with the given configuration wired to fresh mock
/// collaborators
pub async fn test_client_with_config(
    configuration: ClientConfiguration,
) -> (
    Arc<P2PClient>,
    Arc<MockSignalingChannel>,
    Arc<MockChannelFactory>,
) {
    let signaling = Arc::new(MockSignalingChannel::default());
    let factory = Arc::new(MockChannelFactory::default());
    let client = P2PClient::new(configuration, signaling.clone(), factory.clone()).await;
    (client, signaling, factory)
}

/// Signaling transport fake
///
/// Records outbound traffic, exposes the listener the client installed so
/// tests can push inbound events, and can fail the next send on demand.
#[derive(Debug, Default)]
pub struct MockSignalingChannel {
    listener: Mutex<Option<mpsc::UnboundedSender<SignalingTransportEvent>>>,
    connects: Mutex<Vec<(String, String)>>,
    disconnect_count: AtomicUsize,
    sent: Mutex<Vec<(String, RemoteId)>>,
    send_failure: Mutex<Option<P2PError>>,
}

impl MockSignalingChannel {
    /// Every (host, token) pair `connect` was called with
    pub fn connect_calls(&self) -> Vec<(String, String)> {
        self.connects.lock().unwrap().clone()
    }

    /// How many times `disconnect` was called
    pub fn disconnect_count(&self) -> usize {
        self.disconnect_count.load(Ordering::SeqCst)
    }

    /// Every (message, remote_id) pair sent through the transport
    pub fn sent_messages(&self) -> Vec<(String, RemoteId)> {
        self.sent.lock().unwrap().clone()
    }

    /// Make the next `send_message` call fail with the given error
    pub fn fail_next_send(&self, error: P2PError) {
        *self.send_failure.lock().unwrap() = Some(error);
    }

    /// Whether the client installed its inbound listener
    pub fn listener_installed(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    /// Push an inbound signaling message into the client
    pub fn push_message(&self, remote_id: &str, message: &str) {
        self.push(SignalingTransportEvent::MessageReceived {
            message: message.to_string(),
            remote_id: RemoteId::new(remote_id),
        });
    }

    /// Push a spontaneous server disconnect into the client
    pub fn push_disconnected(&self) {
        self.push(SignalingTransportEvent::Disconnected);
    }

    fn push(&self, event: SignalingTransportEvent) {
        self.listener
            .lock()
            .unwrap()
            .as_ref()
            .expect("listener not installed")
            .send(event)
            .expect("transport loop gone");
    }
}

#[async_trait::async_trait]
impl SignalingChannel for MockSignalingChannel {
    async fn connect(&self, host: &str, token: &str) -> P2PResult<()> {
        self.connects
            .lock()
            .unwrap()
            .push((host.to_string(), token.to_string()));
        Ok(())
    }

    async fn disconnect(&self) -> P2PResult<()> {
        self.disconnect_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_message(&self, message: &str, remote_id: &RemoteId) -> P2PResult<()> {
        if let Some(error) = self.send_failure.lock().unwrap().take() {
            return Err(error);
        }
        self.sent
            .lock()
            .unwrap()
            .push((message.to_string(), remote_id.clone()));
        Ok(())
    }

    fn set_listener(&self, listener: mpsc::UnboundedSender<SignalingTransportEvent>) {
        *self.listener.lock().unwrap() = Some(listener);
    }
}

/// Channel factory fake retaining every channel it created
#[derive(Debug, Default)]
pub struct MockChannelFactory {
    created: Mutex<Vec<Arc<MockPeerConnectionChannel>>>,
}

impl MockChannelFactory {
    /// How many channels were created
    pub fn create_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// Every channel this factory created, in creation order
    pub fn channels(&self) -> Vec<Arc<MockPeerConnectionChannel>> {
        self.created.lock().unwrap().clone()
    }

    /// The channel created for a remote user, if any
    pub fn channel_for(&self, remote_id: &str) -> Option<Arc<MockPeerConnectionChannel>> {
        let wanted = RemoteId::new(remote_id);
        self.created
            .lock()
            .unwrap()
            .iter()
            .find(|channel| channel.remote_id() == &wanted)
            .cloned()
    }
}

impl ChannelFactory for MockChannelFactory {
    fn create_channel(
        &self,
        config: ChannelConfiguration,
        remote_id: &RemoteId,
        signaling: Arc<dyn SignalingSender>,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Arc<dyn PeerConnectionChannel> {
        let channel = Arc::new(MockPeerConnectionChannel {
            remote_id: remote_id.clone(),
            config,
            signaling,
            events,
            operations: Mutex::new(Vec::new()),
            next_failure: Mutex::new(None),
            stats: Mutex::new(ConnectionStats::default()),
        });
        self.created.lock().unwrap().push(channel.clone());
        channel
    }
}

/// Peer connection channel fake
///
/// Records every operation as a string, can fail the next operation on
/// demand, and exposes the senders it was wired with so tests can emit
/// channel events and exercise the outbound signaling path.
#[derive(Debug)]
pub struct MockPeerConnectionChannel {
    remote_id: RemoteId,
    config: ChannelConfiguration,
    signaling: Arc<dyn SignalingSender>,
    events: mpsc::UnboundedSender<ChannelEvent>,
    operations: Mutex<Vec<String>>,
    next_failure: Mutex<Option<P2PError>>,
    stats: Mutex<ConnectionStats>,
}

impl MockPeerConnectionChannel {
    /// The remote user this channel was created for
    pub fn remote_id(&self) -> &RemoteId {
        &self.remote_id
    }

    /// The configuration the factory received for this channel
    pub fn configuration(&self) -> &ChannelConfiguration {
        &self.config
    }

    /// Every operation delegated to this channel, in order
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    /// Make the next delegated operation fail with the given error
    pub fn fail_next(&self, error: P2PError) {
        *self.next_failure.lock().unwrap() = Some(error);
    }

    /// Replace the statistics snapshot `get_connection_stats` returns
    pub fn set_stats(&self, stats: ConnectionStats) {
        *self.stats.lock().unwrap() = stats;
    }

    /// Report a channel event to the client, as a real channel would
    pub fn emit(&self, event: ChannelEvent) {
        self.events.send(event).expect("channel event loop gone");
    }

    /// Send a signaling message through the sender this channel was wired
    /// with, as a real channel would during negotiation
    pub async fn send_via_signaling(&self, message: &str) -> P2PResult<()> {
        self.signaling
            .send_signaling_message(message, &self.remote_id)
            .await
    }

    fn record(&self, operation: String) {
        self.operations.lock().unwrap().push(operation);
    }

    fn take_failure(&self) -> P2PResult<()> {
        match self.next_failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl PeerConnectionChannel for MockPeerConnectionChannel {
    async fn publish(&self, stream: &LocalStream) -> P2PResult<()> {
        self.take_failure()?;
        self.record(format!("publish:{}", stream.id));
        Ok(())
    }

    async fn unpublish(&self, stream: &LocalStream) -> P2PResult<()> {
        self.take_failure()?;
        self.record(format!("unpublish:{}", stream.id));
        Ok(())
    }

    async fn send(&self, message: &str) -> P2PResult<()> {
        self.take_failure()?;
        self.record(format!("send:{}", message));
        Ok(())
    }

    async fn stop(&self) -> P2PResult<()> {
        self.take_failure()?;
        self.record("stop".to_string());
        Ok(())
    }

    async fn get_connection_stats(&self) -> P2PResult<ConnectionStats> {
        self.take_failure()?;
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn on_incoming_signaling_message(&self, message: &str) {
        self.record(format!("signal-in:{}", message));
    }
}

/// Observer recording every event it receives, in delivery order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ClientEvent>>,
}

impl RecordingObserver {
    /// Everything delivered so far
    pub fn events(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait::async_trait]
impl P2PClientObserver for RecordingObserver {
    async fn on_server_disconnected(&self) {
        self.record(ClientEvent::ServerDisconnected);
    }

    async fn on_chat_started(&self, remote_id: RemoteId) {
        self.record(ClientEvent::ChatStarted { remote_id });
    }

    async fn on_chat_stopped(&self, remote_id: RemoteId) {
        self.record(ClientEvent::ChatStopped { remote_id });
    }

    async fn on_denied(&self, remote_id: RemoteId) {
        self.record(ClientEvent::Denied { remote_id });
    }

    async fn on_data_received(&self, remote_id: RemoteId, message: String) {
        self.record(ClientEvent::DataReceived { remote_id, message });
    }

    async fn on_stream_added(&self, stream: peerlink_p2p_client::RemoteStream) {
        self.record(ClientEvent::StreamAdded { stream });
    }

    async fn on_stream_removed(&self, stream: peerlink_p2p_client::RemoteStream) {
        self.record(ClientEvent::StreamRemoved { stream });
    }
}
