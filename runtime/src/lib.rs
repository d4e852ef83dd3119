//! # Storefront Runtime
//!
//! Runtime implementation for the Storefront architecture.
//!
//! This crate provides the [`Store`]: the runtime coordinator that owns a
//! component's state, runs its reducer, and executes the effects the reducer
//! returns.
//!
//! ## Execution model
//!
//! The product page is a single-threaded, event-driven system: every user
//! interaction (click, hover, form submit) becomes one action, and each
//! action runs to completion before the next one is processed. The Store
//! mirrors that model deterministically:
//!
//! 1. `send(action)` acquires the state write lock and runs the reducer.
//! 2. The returned effects are driven to completion *inline*, in order.
//! 3. Actions produced by effects (the feedback loop) are reduced within the
//!    same `send` call, before it returns.
//!
//! There is no background task spawning; when `send` returns, every
//! consequence of the action — including notifications published on the
//! [`NotificationBus`](storefront_core::bus::NotificationBus) — has been
//! observed by its subscribers.

use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use tokio::sync::RwLock;

/// Store error types
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// The store has been shut down and rejects new actions
        #[error("Store is shutting down, action rejected")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

struct StoreInner<S, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    shutdown: AtomicBool,
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for shared read access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(
///     CartState::default(),
///     CartReducer::new(),
///     CartEnvironment::new(),
/// );
///
/// store.send(CartAction::AddItem(VariantId::new(2234))).await?;
/// let size = store.state(CartState::size).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<StoreInner<S, E, R>>,
    _actions: PhantomData<fn(A)>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
            }),
            _actions: PhantomData,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Drives the returned effects to completion, in order
    /// 4. Actions produced by effects feed back through the reducer before
    ///    `send` returns
    ///
    /// Concurrent `send` calls serialize at the state lock; within one call
    /// the processing order is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            tracing::warn!("action rejected: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        let mut pending = VecDeque::new();
        pending.push_back(action);

        while let Some(action) = pending.pop_front() {
            let effects = {
                let mut state = self.inner.state.write().await;
                self.inner
                    .reducer
                    .reduce(&mut state, action, &self.inner.environment)
            };
            metrics::counter!("store.actions.processed").increment(1);

            for effect in effects {
                self.run_effect(effect, &mut pending).await;
            }
        }

        Ok(())
    }

    /// Execute a single effect, queuing any feedback actions it produces.
    fn run_effect<'a>(
        &'a self,
        effect: Effect<A>,
        pending: &'a mut VecDeque<A>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                // Effects run inline, so parallel composition degrades to
                // sequential execution; ordering is preserved either way.
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    for effect in effects {
                        self.run_effect(effect, pending).await;
                    }
                },
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    pending.push_back(*action);
                },
                Effect::Future(future) => {
                    if let Some(action) = future.await {
                        pending.push_back(action);
                    }
                },
            }
        })
    }

    /// Read a projection of the current state
    ///
    /// # Example
    ///
    /// ```ignore
    /// let size = store.state(|s| s.items.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Shut down the store
    ///
    /// Subsequent [`send`](Self::send) calls are rejected with
    /// [`StoreError::ShutdownInProgress`]. Effects run inline within `send`,
    /// so there is never pending work to wait for.
    pub fn shutdown(&self) {
        tracing::info!("initiating store shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);
        self.inner.shutdown.store(true, Ordering::Release);
    }

    /// Whether the store has been shut down
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.load(Ordering::Acquire)
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _actions: PhantomData,
        }
    }
}

impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("shut_down", &self.inner.shutdown.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
