//! # Storefront Testing
//!
//! Testing utilities and helpers for the Storefront architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A recording bus listener for asserting published notifications
//! - A fluent Given-When-Then harness for reducer tests
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(CartEnvironment::new())
//!     .given_state(CartState::default())
//!     .when_action(CartAction::AddItem(VariantId::new(2234)))
//!     .then_state(|state| assert_eq!(state.size(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::Clock;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};
    use storefront_core::bus::{NotificationBus, Subscription};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Bus listener that records every payload it receives
    ///
    /// Subscribes on construction and stays subscribed for its lifetime, so
    /// tests can publish through the code under test and then assert on what
    /// actually arrived.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_core::bus::NotificationBus;
    /// use storefront_testing::RecordingListener;
    ///
    /// let bus: NotificationBus<u32> = NotificationBus::new();
    /// let listener = RecordingListener::subscribe_to(&bus, "tick");
    ///
    /// bus.publish("tick", &7);
    ///
    /// assert_eq!(listener.received(), vec![7]);
    /// ```
    #[derive(Debug)]
    pub struct RecordingListener<E> {
        received: Arc<Mutex<Vec<E>>>,
        _subscription: Subscription<E>,
    }

    impl<E> RecordingListener<E>
    where
        E: Clone + Send + Sync + 'static,
    {
        /// Subscribe a recording listener to `event` on `bus`
        #[must_use]
        pub fn subscribe_to(bus: &NotificationBus<E>, event: &str) -> Self {
            let received = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&received);
            let subscription = bus.subscribe(event, move |payload: &E| {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(payload.clone());
            });
            Self {
                received,
                _subscription: subscription,
            }
        }

        /// Everything received so far, in delivery order
        #[must_use]
        pub fn received(&self) -> Vec<E> {
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of payloads received so far
        #[must_use]
        pub fn len(&self) -> usize {
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether nothing has been received yet
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RecordingListener, test_clock};
pub use reducer_test::{ReducerTest, assertions};
