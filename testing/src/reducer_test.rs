//! Given-When-Then testing for reducers
//!
//! A reducer step is synchronous, so most feature behavior (wizard guards,
//! filter resets, pagination bookkeeping) is tested here without a runtime.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use ticketdock_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Several actions may be given with [`ReducerTest::when_actions`]; they
/// are reduced in order and the effect assertions see only the effects of
/// the last one.
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions, reduced in order (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use ticketdock_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect would do something when executed.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// Futures nested in `Parallel` or `Sequential` count.
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            count_futures(effects) > 0,
            "Expected at least one Future effect, but none found"
        );
    }

    /// Count Future effects, descending into `Parallel` and `Sequential`
    #[must_use]
    pub fn count_futures<A>(effects: &[Effect<A>]) -> usize {
        effects
            .iter()
            .map(|effect| match effect {
                Effect::Future(_) => 1,
                Effect::Parallel(inner) | Effect::Sequential(inner) => count_futures(inner),
                Effect::None | Effect::Delay { .. } => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::{smallvec, SmallVec};
    use ticketdock_core::async_effect;

    #[derive(Clone, Debug)]
    struct StepState {
        step: u8,
    }

    #[derive(Clone, Debug)]
    enum StepAction {
        Next,
        Back,
        Save,
    }

    struct StepReducer;

    struct StepEnv;

    impl Reducer for StepReducer {
        type State = StepState;
        type Action = StepAction;
        type Environment = StepEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                StepAction::Next => {
                    state.step = (state.step + 1).min(4);
                    smallvec![Effect::None]
                },
                StepAction::Back => {
                    state.step = state.step.saturating_sub(1).max(1);
                    SmallVec::new()
                },
                StepAction::Save => smallvec![Effect::merge(vec![
                    async_effect! { None },
                    async_effect! { None },
                ])],
            }
        }
    }

    #[test]
    fn single_action_updates_state() {
        ReducerTest::new(StepReducer)
            .with_env(StepEnv)
            .given_state(StepState { step: 1 })
            .when_action(StepAction::Next)
            .then_state(|state| assert_eq!(state.step, 2))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn actions_are_reduced_in_order() {
        ReducerTest::new(StepReducer)
            .with_env(StepEnv)
            .given_state(StepState { step: 1 })
            .when_actions([StepAction::Next, StepAction::Next, StepAction::Back])
            .then_state(|state| assert_eq!(state.step, 2))
            .run();
    }

    #[test]
    fn nested_futures_are_counted() {
        ReducerTest::new(StepReducer)
            .with_env(StepEnv)
            .given_state(StepState { step: 4 })
            .when_action(StepAction::Save)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
                assert_eq!(assertions::count_futures(effects), 2);
            })
            .run();
    }
}
