//! Client events, the observer trait and the ordered event dispatcher
//!
//! Everything spontaneous a client learns about - server disconnection,
//! sessions starting and stopping, incoming data, remote streams appearing -
//! is delivered to registered [`P2PClientObserver`]s through one serialized
//! queue. Emission never blocks; a single drain task dequeues events in
//! emission order and awaits every observer in registration order, so an
//! observer is never invoked concurrently with itself and two observers
//! always agree on the order of events. A panicking observer forfeits only
//! that one delivery; later observers and later events still go out.
//!
//! Observers are identified by the opaque [`ObserverId`] returned from
//! registration. An observer removed before an event is dispatched never
//! receives it; an event emitted after `remove_observer` returns can never
//! reach the removed observer.

use peerlink_base::{RemoteId, RemoteStream};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Events a client reports to its observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientEvent {
    /// The connection to the signaling server was lost
    ServerDisconnected,
    /// A session with a remote user became active
    ChatStarted {
        /// The remote user the session is with
        remote_id: RemoteId,
    },
    /// A session with a remote user ended
    ChatStopped {
        /// The remote user the session was with
        remote_id: RemoteId,
    },
    /// A remote user declined to set up a session
    Denied {
        /// The remote user that declined
        remote_id: RemoteId,
    },
    /// A text message arrived over a session
    DataReceived {
        /// The remote user that sent the message
        remote_id: RemoteId,
        /// The message payload
        message: String,
    },
    /// A remote user published a stream to this client
    StreamAdded {
        /// The newly available stream
        stream: RemoteStream,
    },
    /// A previously published remote stream went away
    StreamRemoved {
        /// The stream that is no longer available
        stream: RemoteStream,
    },
}

/// Receives client events
///
/// All methods have empty default implementations; implement only the ones
/// you care about. Methods are awaited one observer at a time on the client's
/// dispatch task, so implementations should hand long-running work off to
/// their own tasks.
#[async_trait::async_trait]
pub trait P2PClientObserver: Send + Sync + std::fmt::Debug {
    /// The connection to the signaling server was lost
    async fn on_server_disconnected(&self) {
        trace!("Server disconnected");
    }

    /// A session with a remote user became active
    async fn on_chat_started(&self, remote_id: RemoteId) {
        trace!("Chat started with {}", remote_id);
    }

    /// A session with a remote user ended
    async fn on_chat_stopped(&self, remote_id: RemoteId) {
        trace!("Chat stopped with {}", remote_id);
    }

    /// A remote user declined to set up a session
    async fn on_denied(&self, remote_id: RemoteId) {
        trace!("Chat denied by {}", remote_id);
    }

    /// A text message arrived over a session
    async fn on_data_received(&self, remote_id: RemoteId, message: String) {
        trace!("Received {} bytes from {}", message.len(), remote_id);
    }

    /// A remote user published a stream to this client
    async fn on_stream_added(&self, stream: RemoteStream) {
        trace!("Stream added: {}", stream);
    }

    /// A previously published remote stream went away
    async fn on_stream_removed(&self, stream: RemoteStream) {
        trace!("Stream removed: {}", stream);
    }
}

/// Opaque handle identifying one observer registration
///
/// Returned by `add_observer`; pass it back to `remove_observer` to
/// unregister. Registering the same observer object twice yields two
/// independent handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct ObserverEntry {
    id: ObserverId,
    observer: Arc<dyn P2PClientObserver>,
}

/// Serialized event delivery to an ordered observer list
///
/// One unbounded queue feeds one drain task. The observer list is snapshotted
/// per event at dispatch time, which is what gives removal its boundary: a
/// removal that returns before an event is enqueued is always visible to that
/// event's dispatch.
#[derive(Debug)]
pub(crate) struct EventDispatcher {
    tx: mpsc::UnboundedSender<ClientEvent>,
    observers: Arc<RwLock<Vec<ObserverEntry>>>,
    drain_handle: JoinHandle<()>,
}

impl EventDispatcher {
    /// Create the dispatcher and spawn its drain task
    pub(crate) fn start() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ClientEvent>();
        let observers: Arc<RwLock<Vec<ObserverEntry>>> = Arc::new(RwLock::new(Vec::new()));

        let drain_observers = observers.clone();
        let drain_handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let snapshot: Vec<ObserverEntry> = drain_observers.read().await.clone();
                for entry in snapshot {
                    // Each delivery gets a task of its own: an observer
                    // panic unwinds that task, not the drain loop. Awaiting
                    // the handle keeps delivery strictly sequential.
                    let observer = entry.observer.clone();
                    let event = event.clone();
                    let delivery =
                        tokio::spawn(async move { deliver(observer.as_ref(), event).await });
                    if delivery.await.is_err() {
                        warn!("Observer {} panicked while handling an event", entry.id);
                    }
                }
            }
            debug!("Event dispatch loop ended");
        });

        Self {
            tx,
            observers,
            drain_handle,
        }
    }

    /// Enqueue an event for delivery; never blocks
    pub(crate) fn emit(&self, event: ClientEvent) {
        match &event {
            ClientEvent::ServerDisconnected => {
                debug!("📡 Emitting event: server disconnected");
            }
            ClientEvent::ChatStarted { remote_id } => {
                debug!("▶️ Emitting event: chat started with {}", remote_id);
            }
            ClientEvent::ChatStopped { remote_id } => {
                debug!("⏹️ Emitting event: chat stopped with {}", remote_id);
            }
            ClientEvent::Denied { remote_id } => {
                debug!("⚠️ Emitting event: chat denied by {}", remote_id);
            }
            ClientEvent::DataReceived { remote_id, .. } => {
                trace!("Emitting event: data received from {}", remote_id);
            }
            ClientEvent::StreamAdded { stream } => {
                debug!("🎵 Emitting event: stream added: {}", stream);
            }
            ClientEvent::StreamRemoved { stream } => {
                debug!("🎵 Emitting event: stream removed: {}", stream);
            }
        }

        if self.tx.send(event).is_err() {
            // Drain task already ended; nothing left to notify.
            debug!("Event dropped, dispatch loop is gone");
        }
    }

    /// Append an observer to the delivery order
    pub(crate) async fn add_observer(&self, observer: Arc<dyn P2PClientObserver>) -> ObserverId {
        let id = ObserverId::new();
        self.observers.write().await.push(ObserverEntry { id, observer });
        debug!("Registered observer {}", id);
        id
    }

    /// Remove an observer registration; returns false for an unknown handle
    pub(crate) async fn remove_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().await;
        let before = observers.len();
        observers.retain(|entry| entry.id != id);
        let removed = observers.len() != before;
        if removed {
            debug!("Removed observer {}", id);
        } else {
            debug!("Ignoring removal of unknown observer {}", id);
        }
        removed
    }

    /// Number of registered observers
    pub(crate) async fn observer_count(&self) -> usize {
        self.observers.read().await.len()
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.drain_handle.abort();
    }
}

async fn deliver(observer: &dyn P2PClientObserver, event: ClientEvent) {
    match event {
        ClientEvent::ServerDisconnected => observer.on_server_disconnected().await,
        ClientEvent::ChatStarted { remote_id } => observer.on_chat_started(remote_id).await,
        ClientEvent::ChatStopped { remote_id } => observer.on_chat_stopped(remote_id).await,
        ClientEvent::Denied { remote_id } => observer.on_denied(remote_id).await,
        ClientEvent::DataReceived { remote_id, message } => {
            observer.on_data_received(remote_id, message).await
        }
        ClientEvent::StreamAdded { stream } => observer.on_stream_added(stream).await,
        ClientEvent::StreamRemoved { stream } => observer.on_stream_removed(stream).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::sleep;

    #[derive(Debug)]
    struct RecordingObserver {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingObserver {
        fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
            Self { label, log }
        }
    }

    #[async_trait::async_trait]
    impl P2PClientObserver for RecordingObserver {
        async fn on_data_received(&self, remote_id: RemoteId, message: String) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", self.label, remote_id, message));
        }

        async fn on_server_disconnected(&self) {
            self.log.lock().unwrap().push(format!("{}:disconnected", self.label));
        }
    }

    fn data_event(message: &str) -> ClientEvent {
        ClientEvent::DataReceived {
            remote_id: RemoteId::new("bob"),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_events_delivered_in_emission_order() {
        let dispatcher = EventDispatcher::start();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher
            .add_observer(Arc::new(RecordingObserver::new("a", log.clone())))
            .await;

        dispatcher.emit(data_event("one"));
        dispatcher.emit(data_event("two"));
        dispatcher.emit(data_event("three"));

        sleep(Duration::from_millis(50)).await;

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["a:bob:one", "a:bob:two", "a:bob:three"]);
    }

    #[tokio::test]
    async fn test_observers_notified_in_registration_order() {
        let dispatcher = EventDispatcher::start();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher
            .add_observer(Arc::new(RecordingObserver::new("first", log.clone())))
            .await;
        dispatcher
            .add_observer(Arc::new(RecordingObserver::new("second", log.clone())))
            .await;

        dispatcher.emit(ClientEvent::ServerDisconnected);
        sleep(Duration::from_millis(50)).await;

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["first:disconnected", "second:disconnected"]);
    }

    #[tokio::test]
    async fn test_removed_observer_gets_no_later_events() {
        let dispatcher = EventDispatcher::start();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = dispatcher
            .add_observer(Arc::new(RecordingObserver::new("a", log.clone())))
            .await;

        dispatcher.emit(data_event("before"));
        sleep(Duration::from_millis(50)).await;

        assert!(dispatcher.remove_observer(id).await);
        // Everything emitted after removal returned must miss the observer.
        dispatcher.emit(data_event("after"));
        dispatcher.emit(ClientEvent::ServerDisconnected);
        sleep(Duration::from_millis(50)).await;

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["a:bob:before"]);
        assert_eq!(dispatcher.observer_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_unknown_observer_reports_false() {
        let dispatcher = EventDispatcher::start();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = dispatcher
            .add_observer(Arc::new(RecordingObserver::new("a", log.clone())))
            .await;
        assert!(dispatcher.remove_observer(id).await);
        assert!(!dispatcher.remove_observer(id).await);
    }

    #[derive(Debug)]
    struct PanickingObserver;

    #[async_trait::async_trait]
    impl P2PClientObserver for PanickingObserver {
        async fn on_data_received(&self, _remote_id: RemoteId, _message: String) {
            panic!("observer failure");
        }

        async fn on_server_disconnected(&self) {
            panic!("observer failure");
        }
    }

    #[tokio::test]
    async fn test_panicking_observer_does_not_stop_dispatch() {
        let dispatcher = EventDispatcher::start();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.add_observer(Arc::new(PanickingObserver)).await;
        dispatcher
            .add_observer(Arc::new(RecordingObserver::new("survivor", log.clone())))
            .await;

        // The first observer panics on every event; the one behind it must
        // still see both, in order.
        dispatcher.emit(data_event("one"));
        dispatcher.emit(data_event("two"));
        sleep(Duration::from_millis(100)).await;

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["survivor:bob:one", "survivor:bob:two"]);
    }

    #[derive(Debug)]
    struct SlowObserver {
        busy: AtomicBool,
        overlaps: Arc<AtomicUsize>,
        seen: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl P2PClientObserver for SlowObserver {
        async fn on_data_received(&self, _remote_id: RemoteId, _message: String) {
            if self.busy.swap(true, Ordering::SeqCst) {
                self.overlaps.fetch_add(1, Ordering::SeqCst);
            }
            sleep(Duration::from_millis(20)).await;
            self.busy.store(false, Ordering::SeqCst);
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_observer_never_invoked_concurrently_with_itself() {
        let dispatcher = EventDispatcher::start();
        let overlaps = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(AtomicUsize::new(0));
        dispatcher
            .add_observer(Arc::new(SlowObserver {
                busy: AtomicBool::new(false),
                overlaps: overlaps.clone(),
                seen: seen.clone(),
            }))
            .await;

        for i in 0..5 {
            dispatcher.emit(data_event(&format!("m{}", i)));
        }

        sleep(Duration::from_millis(300)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 5);
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }
}
