//! Change notification for store subscribers.
//!
//! DESIGN
//! ======
//! Each subscriber owns a bounded `mpsc` receiver. Mutations publish with
//! `try_send` while still holding their slice's write lock, so subscribers
//! observe events in commit order and a slow subscriber can never stall a
//! mutation. Full channels drop the event for that subscriber only; closed
//! channels are pruned on the next publish.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use uuid::Uuid;

use crate::net::types::User;

/// A committed change, carrying the new value of the field that changed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    UserChanged(Option<User>),
    ChatToggled(bool),
}

/// Handle returned by `Store::subscribe`.
#[derive(Debug)]
pub struct Subscription {
    pub id: Uuid,
    pub rx: mpsc::Receiver<StoreEvent>,
}

#[derive(Debug)]
pub(crate) struct Notifier {
    buffer: usize,
    subscribers: Mutex<HashMap<Uuid, mpsc::Sender<StoreEvent>>>,
}

impl Notifier {
    pub(crate) fn new(buffer: usize) -> Self {
        Self { buffer: buffer.max(1), subscribers: Mutex::new(HashMap::new()) }
    }

    pub(crate) fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        self.subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id, tx);
        debug!(%id, "store subscriber added");
        Subscription { id, rx }
    }

    /// Returns `false` if `id` was not subscribed.
    pub(crate) fn unsubscribe(&self, id: Uuid) -> bool {
        let removed = self
            .subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            debug!(%id, "store subscriber removed");
        }
        removed
    }

    pub(crate) fn publish(&self, event: &StoreEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        subscribers.retain(|id, tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(%id, "store subscriber lagging; event dropped");
                true
            }
            Err(TrySendError::Closed(_)) => {
                debug!(%id, "store subscriber gone; pruned");
                false
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}
