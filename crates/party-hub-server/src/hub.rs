//! Broadcast hub: fans out party events to subscribed connections.
//!
//! Connections register a `Recipient` and bind to exactly one party code.
//! Publishing serializes the payload once and delivers it best-effort,
//! at-most-once per connection.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use actix::prelude::*;
use serde::Serialize;

use crate::models::{PartySnapshot, QueueEntrySnapshot, Track};

/// Outbound text frame for a subscribed websocket connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct PartyOutbound(pub String);

/// Events pushed to party subscribers. Payloads are full snapshots, never
/// diffs; a reconnecting client resyncs via the snapshot endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartyServerMessage {
    /// Subscription acknowledged.
    Subscribed { code: String },
    /// The queue changed (add, vote, advance).
    Queue { queue: Vec<QueueEntrySnapshot> },
    /// The current track changed (or playback stopped).
    NowPlaying { track: Option<Track> },
    /// Full party snapshot (roster or bulk changes).
    Party { party: PartySnapshot },
    /// The party was torn down.
    PartyClosed,
    /// Subscription failed.
    Error { message: String },
}

struct HubConnection {
    code: String,
    name: String,
    recipient: Recipient<PartyOutbound>,
}

#[derive(Default)]
struct HubState {
    connections: HashMap<u64, HubConnection>,
    by_code: HashMap<String, HashSet<u64>>,
}

/// Shared fan-out state for all websocket connections.
#[derive(Clone)]
pub struct BroadcastHub {
    state: Arc<Mutex<HubState>>,
    counter: Arc<AtomicU64>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState::default())),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Allocate a connection id for a new websocket session.
    pub fn next_conn_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Bind a connection to a party topic. A connection subscribes to at
    /// most one party; re-subscribing moves it and the previous binding is
    /// returned so the caller can settle membership accounting.
    pub fn subscribe(
        &self,
        conn_id: u64,
        code: &str,
        name: &str,
        recipient: Recipient<PartyOutbound>,
    ) -> Option<(String, String)> {
        let mut state = self.lock();
        let previous = state.connections.remove(&conn_id).map(|conn| {
            if let Some(set) = state.by_code.get_mut(&conn.code) {
                set.remove(&conn_id);
                if set.is_empty() {
                    state.by_code.remove(&conn.code);
                }
            }
            (conn.code, conn.name)
        });
        state.connections.insert(
            conn_id,
            HubConnection {
                code: code.to_string(),
                name: name.to_string(),
                recipient,
            },
        );
        state
            .by_code
            .entry(code.to_string())
            .or_default()
            .insert(conn_id);
        previous
    }

    /// Drop a connection's binding (socket closed). Returns what it was
    /// bound to, if anything.
    pub fn unsubscribe(&self, conn_id: u64) -> Option<(String, String)> {
        let mut state = self.lock();
        let conn = state.connections.remove(&conn_id)?;
        if let Some(set) = state.by_code.get_mut(&conn.code) {
            set.remove(&conn_id);
            if set.is_empty() {
                state.by_code.remove(&conn.code);
            }
        }
        Some((conn.code, conn.name))
    }

    /// Number of live connections bound to a party code.
    pub fn subscriber_count(&self, code: &str) -> usize {
        self.lock()
            .by_code
            .get(code)
            .map(|set| set.len())
            .unwrap_or(0)
    }

    /// Deliver an event to every connection bound to `code`.
    ///
    /// Callers publish while holding the party lock, which is what keeps
    /// per-party event order aligned with mutation order. Delivery itself
    /// is non-blocking (`do_send` into each actor mailbox).
    pub fn publish(&self, code: &str, message: &PartyServerMessage) {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(code = %code, error = %err, "failed to serialize party event");
                return;
            }
        };
        let state = self.lock();
        let Some(conn_ids) = state.by_code.get(code) else {
            return;
        };
        for conn_id in conn_ids {
            if let Some(conn) = state.connections.get(conn_id) {
                conn.recipient.do_send(PartyOutbound(payload.clone()));
            }
        }
    }

    /// Drop every subscription for a party (teardown or expiry).
    pub fn close_party(&self, code: &str) {
        let mut state = self.lock();
        if let Some(conn_ids) = state.by_code.remove(code) {
            for conn_id in conn_ids {
                state.connections.remove(&conn_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        // Give actor mailboxes a chance to drain on the test runtime.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    struct Probe {
        received: Arc<Mutex<Vec<String>>>,
    }

    impl Actor for Probe {
        type Context = Context<Self>;
    }

    impl Handler<PartyOutbound> for Probe {
        type Result = ();

        fn handle(&mut self, msg: PartyOutbound, _ctx: &mut Self::Context) {
            self.received
                .lock()
                .unwrap_or_else(|err| err.into_inner())
                .push(msg.0);
        }
    }

    #[actix_web::test]
    async fn publish_reaches_only_the_subscribed_party() {
        let hub = BroadcastHub::new();
        let received_a = Arc::new(Mutex::new(Vec::new()));
        let received_b = Arc::new(Mutex::new(Vec::new()));
        let addr_a = Probe { received: received_a.clone() }.start();
        let addr_b = Probe { received: received_b.clone() }.start();

        hub.subscribe(hub.next_conn_id(), "AAAA1111", "Sam", addr_a.recipient());
        hub.subscribe(hub.next_conn_id(), "BBBB2222", "Alex", addr_b.recipient());

        hub.publish("AAAA1111", &PartyServerMessage::PartyClosed);
        settle().await;

        assert_eq!(received_a.lock().unwrap().len(), 1);
        assert!(received_b.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn resubscribing_moves_the_connection() {
        let hub = BroadcastHub::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let addr = Probe { received: received.clone() }.start();
        let conn_id = hub.next_conn_id();

        assert!(hub
            .subscribe(conn_id, "AAAA1111", "Sam", addr.clone().recipient())
            .is_none());
        let previous = hub.subscribe(conn_id, "BBBB2222", "Sam", addr.recipient());
        assert_eq!(previous, Some(("AAAA1111".to_string(), "Sam".to_string())));
        assert_eq!(hub.subscriber_count("AAAA1111"), 0);
        assert_eq!(hub.subscriber_count("BBBB2222"), 1);

        hub.publish("AAAA1111", &PartyServerMessage::PartyClosed);
        settle().await;
        assert!(received.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unsubscribe_returns_previous_binding() {
        let hub = BroadcastHub::new();
        let addr = Probe { received: Arc::new(Mutex::new(Vec::new())) }.start();
        let conn_id = hub.next_conn_id();
        hub.subscribe(conn_id, "AAAA1111", "Sam", addr.recipient());

        let binding = hub.unsubscribe(conn_id);
        assert_eq!(binding, Some(("AAAA1111".to_string(), "Sam".to_string())));
        assert!(hub.unsubscribe(conn_id).is_none());
        assert_eq!(hub.subscriber_count("AAAA1111"), 0);
    }
}
