//! Subscription broker: event fanout to live subscribers
//!
//! Holds the set of open event streams and pushes every published event to
//! each of them. Per-subscriber queues are bounded; a subscriber whose
//! queue overflows or whose receiving half is gone is disconnected
//! permanently and never blocks delivery to the others.
//!
//! The broker is an explicit object owned by the server's top-level
//! lifecycle, constructed at startup and dropped at shutdown. No global
//! state.

use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use dashmap::DashMap;
use futures::Stream;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use types::events::RankingEvent;
use types::ids::SubscriberId;

/// Default per-subscriber queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

type Registry = DashMap<SubscriberId, mpsc::Sender<RankingEvent>>;

/// Fanout hub for ranking events.
pub struct SubscriptionBroker {
    subscribers: Arc<Registry>,
    queue_capacity: usize,
}

impl SubscriptionBroker {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
            queue_capacity,
        }
    }

    /// Register a new subscriber and hand back its stream.
    ///
    /// The subscriber receives events published after this call only; the
    /// broker keeps no replay log. Callers needing the full picture pull a
    /// ranking snapshot before relying on the stream.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let id = SubscriberId::new();
        self.subscribers.insert(id, tx);
        debug!(subscriber = %id, total = self.subscribers.len(), "subscriber registered");
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Remove a subscriber explicitly. Dropping its `Subscription` has the
    /// same effect.
    pub fn unsubscribe(&self, id: &SubscriberId) {
        if self.subscribers.remove(id).is_some() {
            debug!(subscriber = %id, "subscriber removed");
        }
    }

    /// Deliver an event to every live subscriber.
    ///
    /// Best-effort: a full queue means the subscriber is lagging and gets
    /// disconnected rather than retried; a closed queue means it already
    /// went away. Either way it is dropped from the registry and the rest
    /// are unaffected.
    pub fn publish(&self, event: &RankingEvent) {
        let mut disconnected: Vec<SubscriberId> = Vec::new();

        for entry in self.subscribers.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber = %entry.key(), "queue overflow, disconnecting lagging subscriber");
                    disconnected.push(*entry.key());
                }
                Err(TrySendError::Closed(_)) => {
                    disconnected.push(*entry.key());
                }
            }
        }

        // Removal happens after iteration; removing under the iterator
        // would deadlock on the shard lock.
        for id in disconnected {
            self.subscribers.remove(&id);
            debug!(subscriber = %id, "subscriber dropped");
        }
    }

    /// Number of currently live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for SubscriptionBroker {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

/// One subscriber's receiving half.
///
/// Yields events in publish-call order. Dropping the subscription
/// deregisters it from the broker, so an abandoned stream stops receiving
/// promptly instead of lingering until the next failed send.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<RankingEvent>,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Await the next event; None once disconnected.
    pub async fn recv(&mut self) -> Option<RankingEvent> {
        self.rx.recv().await
    }
}

impl Stream for Subscription {
    type Item = RankingEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.id);
        }
    }
}
