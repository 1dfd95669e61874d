//! # Ticketdock Core
//!
//! Core traits and types shared by every Ticketdock feature.
//!
//! Each screen of the marketplace client (browse, sell, my tickets, profile)
//! is modelled as a small state machine:
//!
//! - **State**: Everything the view layer renders for that feature
//! - **Action**: User intents plus the results of remote calls
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of remote work (query, insert, upload)
//! - **Environment**: Data Gateway, notifier, clock, injected via traits
//!
//! Reducers never touch the network. They return effects, the runtime
//! executes them, and whatever the effect resolves to is fed back in as a
//! new action. Failures therefore always come back through the reducer,
//! which decides what the user sees.
//!
//! ## Example
//!
//! ```ignore
//! use ticketdock_core::{effect::Effect, reducer::Reducer, SmallVec, smallvec};
//!
//! impl Reducer for SearchReducer {
//!     type State = SearchState;
//!     type Action = SearchAction;
//!     type Environment = SearchEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SearchState,
//!         action: SearchAction,
//!         env: &SearchEnvironment,
//!     ) -> SmallVec<[Effect<SearchAction>; 4]> {
//!         match action {
//!             SearchAction::Refresh => {
//!                 state.loading = true;
//!                 smallvec![fetch_page(env, state.query())]
//!             }
//!             _ => SmallVec::new(),
//!         }
//!     }
//! }
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - the trait every feature implements
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for feature logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The feature state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// Most reducers return zero or one effect, so the effect list is a
    /// `SmallVec` that stays on the stack for up to four entries.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This function:
        /// 1. Validates the action against current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values. Returning one from a reducer does nothing until the
/// runtime executes it.
pub mod effect {
    use futures::future::BoxFuture;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into the reducer
        Future(BoxFuture<'static, Option<Action>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - dependency injection traits shared by all features
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// The wizard uses it to decide which events are "upcoming" and to name
    /// uploaded images, so tests inject a fixed clock.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock backed by `Utc::now()`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
