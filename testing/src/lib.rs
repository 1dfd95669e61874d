//! # Ticketdock Testing
//!
//! Testing utilities for Ticketdock reducers and stores.
//!
//! This crate provides:
//! - A fixed clock so "upcoming events" and upload names are deterministic
//! - [`ReducerTest`], a Given-When-Then builder for single reducer steps
//! - Assertion helpers for the effects a reducer returns
//!
//! ## Example
//!
//! ```ignore
//! use ticketdock_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(WizardReducer::new())
//!     .with_env(test_environment())
//!     .given_state(WizardState::default())
//!     .when_action(WizardAction::NextStep)
//!     .then_state(|state| assert_eq!(state.step, WizardStep::EventSelection))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ticketdock_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of shared environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use ticketdock_testing::mocks::FixedClock;
    /// use ticketdock_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

pub use mocks::{test_clock, FixedClock};
