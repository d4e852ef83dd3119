//! Notification bus for cross-component communication.
//!
//! This module provides [`NotificationBus`], a synchronous in-process
//! publish/subscribe channel. It decouples a publisher (the review form) from
//! its subscribers (the review board) without either holding a reference to
//! the other.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   publish("review-submitted", &review)
//! │ Review Form  │ ─────────────────┐
//! └──────────────┘                  ▼
//!                          ┌─────────────────┐
//!                          │ NotificationBus │
//!                          └────────┬────────┘
//!                       ┌───────────┴───────────┐
//!                       ▼                       ▼
//!               ┌──────────────┐        ┌──────────────┐
//!               │ Review Board │        │ Other        │
//!               │ (subscriber) │        │ subscribers  │
//!               └──────────────┘        └──────────────┘
//! ```
//!
//! # Key Principles
//!
//! - **Synchronous delivery**: handlers run on the publishing thread, in
//!   subscription order, before `publish` returns. No queuing or deferral.
//! - **No ambient state**: a bus handle is injected into each component at
//!   construction. There is no process-wide singleton.
//! - **Scoped subscriptions**: [`subscribe`](NotificationBus::subscribe)
//!   returns a [`Subscription`] guard; dropping it unsubscribes, so handlers
//!   live exactly as long as the component that registered them.
//! - **Zero subscribers is fine**: publishing to an event nobody listens to
//!   is a no-op, never an error.
//!
//! # Example
//!
//! ```
//! use storefront_core::bus::NotificationBus;
//! use std::sync::{Arc, Mutex};
//!
//! let bus: NotificationBus<String> = NotificationBus::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let subscription = bus.subscribe("greeting", move |payload: &String| {
//!     if let Ok(mut seen) = sink.lock() {
//!         seen.push(payload.clone());
//!     }
//! });
//!
//! bus.publish("greeting", &"hello".to_string());
//! drop(subscription);
//! bus.publish("greeting", &"ignored".to_string());
//!
//! assert_eq!(seen.lock().map(|s| s.len()).unwrap_or(0), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A registered handler. Handlers borrow the payload; they may copy what they
/// need but never take ownership.
type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Registry of live subscriptions, keyed by event name.
///
/// Each entry keeps its registration id so a [`Subscription`] can remove
/// exactly its own handler on drop.
struct Registry<E> {
    subscribers: HashMap<String, Vec<(u64, Handler<E>)>>,
    next_id: u64,
}

impl<E> Registry<E> {
    fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            next_id: 0,
        }
    }
}

/// Synchronous in-process publish/subscribe channel.
///
/// The bus is a cheap handle (`Clone` shares the underlying registry) meant
/// to be passed to each component at construction time.
///
/// # Delivery Guarantees
///
/// - Handlers for an event run synchronously, in subscription order, on the
///   thread that called [`publish`](Self::publish).
/// - Every live handler is invoked exactly once per publish.
/// - The handler list is snapshotted before invocation, so a handler may
///   subscribe or unsubscribe without deadlocking; such changes take effect
///   from the next publish.
pub struct NotificationBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> NotificationBus<E> {
    /// Create a new bus with no subscribers
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Register `handler` for every future publish of `event`.
    ///
    /// Handlers are invoked in registration order. The subscription lives
    /// until the returned [`Subscription`] guard is dropped.
    #[must_use = "dropping the Subscription immediately unsubscribes the handler"]
    pub fn subscribe<F>(&self, event: impl Into<String>, handler: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let event = event.into();
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .subscribers
            .entry(event.clone())
            .or_default()
            .push((id, Arc::new(handler)));

        tracing::debug!(event = %event, id, "subscribed to notification");

        Subscription {
            registry: Arc::downgrade(&self.registry),
            event,
            id,
        }
    }

    /// Publish `payload` to every live subscriber of `event`.
    ///
    /// Handlers run synchronously on the calling thread, in subscription
    /// order. Publishing with zero subscribers is a safe no-op.
    pub fn publish(&self, event: &str, payload: &E) {
        let handlers: Vec<Handler<E>> = {
            let registry = self
                .registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            registry
                .subscribers
                .get(event)
                .map(|entries| entries.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };

        tracing::trace!(event, subscribers = handlers.len(), "publishing notification");

        for handler in handlers {
            handler(payload);
        }
    }

    /// Number of live subscriptions for `event`
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl<E> Clone for NotificationBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for NotificationBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for NotificationBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus").finish_non_exhaustive()
    }
}

/// RAII guard for a bus subscription.
///
/// Dropping the guard removes the handler from the bus, so a component that
/// owns its `Subscription` stops receiving notifications when it is torn
/// down. Holds only a weak reference to the registry; dropping after the bus
/// itself is gone is harmless.
#[must_use = "dropping the Subscription immediately unsubscribes the handler"]
pub struct Subscription<E> {
    registry: Weak<Mutex<Registry<E>>>,
    event: String,
    id: u64,
}

impl<E> Subscription<E> {
    /// The event name this subscription listens to
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = registry.subscribers.get_mut(&self.event) {
            entries.retain(|(id, _)| *id != self.id);
            if entries.is_empty() {
                registry.subscribers.remove(&self.event);
            }
        }
        tracing::debug!(event = %self.event, id = self.id, "unsubscribed from notification");
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish()
    }
}
