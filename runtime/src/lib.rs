//! # Ticketdock Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling
//! for every marketplace feature.
//!
//! ## Core Components
//!
//! - **Store**: Owns feature state, runs the reducer, executes effects
//! - **`EffectHandle`**: Lets callers (and tests) wait until an action and
//!   everything it caused has settled
//! - **Feedback loop**: Actions produced by effects are sent back through
//!   the same store
//!
//! ## Example
//!
//! ```ignore
//! use ticketdock_runtime::Store;
//!
//! let store = Store::new(SearchState::default(), SearchReducer::new(), env);
//!
//! // Kick off the initial query and wait for the page to land
//! let mut handle = store.send(SearchAction::Refresh).await?;
//! handle.wait().await;
//!
//! let shown = store.state(|s| s.listings.len()).await;
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use ticketdock_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{watch, RwLock};

/// Metric names and descriptions
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. The handle completes once every effect
/// produced by the action has finished, including effects produced by the
/// actions those effects fed back into the store.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(WizardAction::Submit).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The create call has resolved and its outcome has been reduced
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running for this handle
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: tracking context carried through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Keeps the counter honest even if an effect future panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - the runtime for reducers
pub mod store {
    use super::{
        metrics as names, Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard,
        Duration, Effect, EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreError,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` so views can read while effects run)
    /// 2. Reducer (feature logic)
    /// 3. Environment (gateway, notifier, clock)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Each feature instance owns its own store; nothing is shared between
    /// stores except what the environment explicitly shares.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Actions produced by effects, for observers such as the view layer
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel buffers 16 actions; use
        /// [`Store::with_broadcast_capacity`] for chattier features.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new Store with custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Access the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions, then waits for pending effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating store shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns once effects are started, not finished. Await the
        /// returned [`EffectHandle`] to wait for the whole cascade.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            let (handle, tracking) = EffectHandle::new();
            self.send_tracked(action, &tracking).await?;
            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by its effects
        ///
        /// Subscribes before sending, so a fast effect cannot slip past.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action in time
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
            R: Clone,
            E: Clone,
        {
            let mut rx = self.action_broadcast.subscribe();
            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let has_more = store.state(|s| s.has_more).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        async fn send_tracked(&self, action: A, tracking: &EffectTracking) -> Result<(), StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                ::metrics::counter!(names::SHUTDOWN_REJECTED).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            ::metrics::counter!(names::COMMANDS_TOTAL).increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                ::metrics::histogram!(names::REDUCER_DURATION)
                    .record(start.elapsed().as_secs_f64());

                #[allow(clippy::cast_precision_loss)]
                ::metrics::histogram!(names::EFFECTS_COUNT).record(effects.len() as f64);

                effects
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }

            Ok(())
        }

        /// Start a task for an effect and keep it counted until it finishes
        fn spawn_tracked<F>(&self, tracking: EffectTracking, work: F)
        where
            F: std::future::Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            tokio::spawn(async move {
                let _guard = DecrementGuard(tracking);
                let _pending_guard = pending_guard;
                work.await;
            });
        }

        /// Feed an action produced by an effect back into the store
        async fn feedback(&self, action: A, tracking: &EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            let _ = self.action_broadcast.send(action.clone());
            if let Err(error) = self.send_tracked(action, tracking).await {
                tracing::debug!(%error, "Dropped feedback action");
            }
        }

        #[allow(clippy::needless_pass_by_value)]
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    ::metrics::counter!(names::EFFECTS_EXECUTED, "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    ::metrics::counter!(names::EFFECTS_EXECUTED, "type" => "future").increment(1);
                    let store = self.clone();
                    let feedback_tracking = tracking.clone();

                    self.spawn_tracked(tracking, async move {
                        if let Some(action) = fut.await {
                            store.feedback(action, &feedback_tracking).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    ::metrics::counter!(names::EFFECTS_EXECUTED, "type" => "delay").increment(1);
                    let store = self.clone();
                    let feedback_tracking = tracking.clone();

                    self.spawn_tracked(tracking, async move {
                        tokio::time::sleep(duration).await;
                        store.feedback(*action, &feedback_tracking).await;
                    });
                },
                Effect::Parallel(effects) => {
                    ::metrics::counter!(names::EFFECTS_EXECUTED, "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    ::metrics::counter!(names::EFFECTS_EXECUTED, "type" => "sequential")
                        .increment(1);
                    let store = self.clone();

                    self.spawn_tracked(tracking, async move {
                        for effect in effects {
                            let (mut step, step_tracking) = EffectHandle::new();
                            store.execute_effect(effect, step_tracking);
                            step.wait().await;
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;
