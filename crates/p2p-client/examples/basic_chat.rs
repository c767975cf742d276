//! Basic Chat Example
//!
//! Two P2P clients (alice and bob) wired to an in-process loopback
//! signaling hub and a toy channel implementation. Demonstrates the full
//! command surface: allow-list management, lazy session creation, text
//! messaging, stream publication and teardown, plus the observer events
//! each side receives along the way.
//!
//! Run with: cargo run --example basic_chat

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

use peerlink_p2p_client::{
    ChannelConfiguration, ChannelEvent, ChannelFactory, ConnectionStats, IceServer, LocalStream,
    P2PClientBuilder, P2PClientObserver, P2PError, P2PResult, PeerConnectionChannel, RemoteId,
    SignalingChannel, SignalingSender, SignalingTransportEvent, CHAT_CLOSED_MESSAGE,
};

const INVITATION_MESSAGE: &str = "chat-invitation";
const DATA_PREFIX: &str = "data:";

/// In-process signaling hub routing messages between registered clients
#[derive(Debug, Default)]
struct LoopbackHub {
    listeners: Mutex<HashMap<String, mpsc::UnboundedSender<SignalingTransportEvent>>>,
}

impl LoopbackHub {
    fn transport(self: &Arc<Self>, local_id: &str) -> Arc<LoopbackTransport> {
        Arc::new(LoopbackTransport {
            local_id: local_id.to_string(),
            hub: self.clone(),
        })
    }
}

/// One client's view of the hub
#[derive(Debug)]
struct LoopbackTransport {
    local_id: String,
    hub: Arc<LoopbackHub>,
}

#[async_trait::async_trait]
impl SignalingChannel for LoopbackTransport {
    async fn connect(&self, host: &str, _token: &str) -> P2PResult<()> {
        println!("  [{}] connected to {}", self.local_id, host);
        Ok(())
    }

    async fn disconnect(&self) -> P2PResult<()> {
        println!("  [{}] disconnected", self.local_id);
        Ok(())
    }

    async fn send_message(&self, message: &str, remote_id: &RemoteId) -> P2PResult<()> {
        let listeners = self.hub.listeners.lock().unwrap();
        let listener = listeners
            .get(remote_id.as_str())
            .ok_or_else(|| P2PError::signaling(format!("No route to {}", remote_id)))?;
        listener
            .send(SignalingTransportEvent::MessageReceived {
                message: message.to_string(),
                remote_id: RemoteId::new(self.local_id.clone()),
            })
            .map_err(|_| P2PError::signaling("Receiving client is gone"))
    }

    fn set_listener(&self, listener: mpsc::UnboundedSender<SignalingTransportEvent>) {
        self.hub
            .listeners
            .lock()
            .unwrap()
            .insert(self.local_id.clone(), listener);
    }
}

/// Toy channel speaking a three-message protocol over signaling:
/// an invitation, `data:`-prefixed text, and the reserved close payload
#[derive(Debug)]
struct DemoChannel {
    remote_id: RemoteId,
    signaling: Arc<dyn SignalingSender>,
    events: mpsc::UnboundedSender<ChannelEvent>,
}

impl DemoChannel {
    fn report(&self, event: ChannelEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait::async_trait]
impl PeerConnectionChannel for DemoChannel {
    async fn publish(&self, stream: &LocalStream) -> P2PResult<()> {
        self.signaling
            .send_signaling_message(INVITATION_MESSAGE, &self.remote_id)
            .await?;
        self.report(ChannelEvent::Started {
            remote_id: self.remote_id.clone(),
        });
        println!("  [channel→{}] publishing stream '{}'", self.remote_id, stream);
        Ok(())
    }

    async fn unpublish(&self, stream: &LocalStream) -> P2PResult<()> {
        println!("  [channel→{}] unpublished stream '{}'", self.remote_id, stream);
        Ok(())
    }

    async fn send(&self, message: &str) -> P2PResult<()> {
        self.signaling
            .send_signaling_message(&format!("{}{}", DATA_PREFIX, message), &self.remote_id)
            .await
    }

    async fn stop(&self) -> P2PResult<()> {
        self.signaling
            .send_signaling_message(CHAT_CLOSED_MESSAGE, &self.remote_id)
            .await?;
        self.report(ChannelEvent::Stopped {
            remote_id: self.remote_id.clone(),
        });
        Ok(())
    }

    async fn get_connection_stats(&self) -> P2PResult<ConnectionStats> {
        Ok(ConnectionStats {
            round_trip_time_ms: Some(1),
            ..ConnectionStats::default()
        })
    }

    async fn on_incoming_signaling_message(&self, message: &str) {
        if message == CHAT_CLOSED_MESSAGE {
            self.report(ChannelEvent::Stopped {
                remote_id: self.remote_id.clone(),
            });
        } else if let Some(text) = message.strip_prefix(DATA_PREFIX) {
            self.report(ChannelEvent::DataReceived {
                remote_id: self.remote_id.clone(),
                message: text.to_string(),
            });
        } else if message == INVITATION_MESSAGE {
            self.report(ChannelEvent::Started {
                remote_id: self.remote_id.clone(),
            });
        }
    }
}

#[derive(Debug, Default)]
struct DemoChannelFactory;

impl ChannelFactory for DemoChannelFactory {
    fn create_channel(
        &self,
        _config: ChannelConfiguration,
        remote_id: &RemoteId,
        signaling: Arc<dyn SignalingSender>,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Arc<dyn PeerConnectionChannel> {
        Arc::new(DemoChannel {
            remote_id: remote_id.clone(),
            signaling,
            events,
        })
    }
}

/// Observer printing every event it receives
#[derive(Debug)]
struct PrintObserver {
    name: &'static str,
}

#[async_trait::async_trait]
impl P2PClientObserver for PrintObserver {
    async fn on_chat_started(&self, remote_id: RemoteId) {
        println!("  [{}] 💬 chat started with {}", self.name, remote_id);
    }

    async fn on_chat_stopped(&self, remote_id: RemoteId) {
        println!("  [{}] 👋 chat stopped with {}", self.name, remote_id);
    }

    async fn on_data_received(&self, remote_id: RemoteId, message: String) {
        println!("  [{}] 📨 {} says: {}", self.name, remote_id, message);
    }

    async fn on_server_disconnected(&self) {
        println!("  [{}] ⚡ signaling server disconnected", self.name);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("💬 Basic P2P Chat Example");
    println!("=========================\n");

    let hub = Arc::new(LoopbackHub::default());

    println!("🔧 Building two clients on a loopback signaling hub...");
    let alice = P2PClientBuilder::new()
        .with_ice_server(IceServer::new(vec![
            "stun:stun.example.com:3478".to_string()
        ]))
        .build(hub.transport("alice"), Arc::new(DemoChannelFactory))
        .await?;
    let bob = P2PClientBuilder::new()
        .build(hub.transport("bob"), Arc::new(DemoChannelFactory))
        .await?;

    alice.add_observer(Arc::new(PrintObserver { name: "alice" })).await;
    bob.add_observer(Arc::new(PrintObserver { name: "bob" })).await;

    alice.connect("loopback://hub", "demo-token").await?;
    bob.connect("loopback://hub", "demo-token").await?;

    println!("\n🔑 Authorizing each side...");
    alice.add_allowed_remote_id("bob").await;
    bob.add_allowed_remote_id("alice").await;

    println!("\n✉️  Exchanging messages (sessions are created on first use):");
    alice.send(&"bob".into(), "hi bob!").await?;
    sleep(Duration::from_millis(100)).await;
    bob.send(&"alice".into(), "hi alice!").await?;
    sleep(Duration::from_millis(100)).await;

    println!("\n🚫 Messaging an unauthorized user fails up front:");
    match bob.send(&"mallory".into(), "hello?").await {
        Ok(()) => println!("  unexpected success"),
        Err(err) => println!("  [bob] rejected: {}", err),
    }

    println!("\n🎥 Publishing a stream from alice to bob:");
    let publication = alice
        .publish(&"bob".into(), LocalStream::new("webcam"))
        .await?;
    sleep(Duration::from_millis(100)).await;
    let stats = publication.get_stats().await?;
    println!(
        "  [alice] publication to {} alive, rtt {:?} ms",
        publication.target_id(),
        stats.round_trip_time_ms
    );

    println!("\n🛑 Tearing down from alice's side:");
    alice.stop(&"bob".into()).await?;
    sleep(Duration::from_millis(100)).await;
    // Bob's registries are his own; alice's stop only closed her side and
    // notified bob's channel. Bob cleans up his end explicitly.
    bob.stop(&"alice".into()).await?;
    sleep(Duration::from_millis(100)).await;

    alice.disconnect().await?;
    bob.disconnect().await?;

    println!("\n✅ Done");
    Ok(())
}
