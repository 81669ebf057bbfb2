//! Builder for constructing transition tables.

use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, State};
use crate::table::{self, BuildError, DuplicatePolicy, Transition, TransitionTable};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing transition tables with a fluent API.
///
/// Unlike [`TransitionTable::build`], which stops at the first malformed
/// input, `build` here reports every incomplete row and every duplicate key
/// in one [`BuildError::Invalid`].
pub struct TableBuilder<S: State, E: Event, A> {
    rows: Vec<Result<Transition<S, E, A>, BuildError>>,
    policy: DuplicatePolicy,
}

impl<S: State, E: Event, A: 'static> TableBuilder<S, E, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            policy: DuplicatePolicy::default(),
        }
    }

    /// Add a row from a transition builder.
    /// An incomplete builder is recorded and reported by `build`.
    pub fn transition(mut self, builder: TransitionBuilder<S, E, A>) -> Self {
        self.rows.push(builder.build());
        self
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, E, A>) -> Self {
        self.rows.push(Ok(transition));
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S, E, A>>) -> Self {
        self.rows.extend(transitions.into_iter().map(Ok));
        self
    }

    /// Choose how repeated `(state, event)` pairs are handled.
    pub fn on_duplicate(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the table.
    pub fn build(self) -> Result<TransitionTable<S, E, A>, BuildError> {
        if self.rows.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();
        let mut transitions = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            match row {
                Ok(transition) => transitions.push(transition),
                Err(err) => checks.push(Validation::fail(err)),
            }
        }

        if self.policy == DuplicatePolicy::Reject {
            checks.push(table::validate_unique(&transitions));
        }

        table::into_result(Validation::all_vec(checks).map(|_| ()))?;
        TransitionTable::build_with(transitions, self.policy)
    }
}

impl<S: State, E: Event, A: 'static> Default for TableBuilder<S, E, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::noop_transition;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState {
            Init,
            Up,
            Down,
        }
    }

    event_enum! {
        enum TestEvent {
            Init,
            Down,
        }
    }

    #[test]
    fn builder_requires_transitions() {
        let result = TableBuilder::<TestState, TestEvent, ()>::new().build();
        assert!(matches!(result, Err(BuildError::NoTransitions)));
    }

    #[test]
    fn builder_collects_rows() {
        let table = TableBuilder::<TestState, TestEvent, ()>::new()
            .transition(
                TransitionBuilder::new()
                    .from(TestState::Init)
                    .on(TestEvent::Init)
                    .to(TestState::Up)
                    .noop(),
            )
            .add_transition(noop_transition(
                TestState::Up,
                TestEvent::Down,
                TestState::Down,
            ))
            .transitions(vec![noop_transition(
                TestState::Down,
                TestEvent::Init,
                TestState::Up,
            )])
            .build()
            .unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.contains(&TestState::Down, &TestEvent::Init));
    }

    #[test]
    fn builder_accumulates_incomplete_rows_and_duplicates() {
        let result = TableBuilder::<TestState, TestEvent, ()>::new()
            .transition(TransitionBuilder::new().from(TestState::Init).on(TestEvent::Init))
            .add_transition(noop_transition(TestState::Up, TestEvent::Down, TestState::Down))
            .add_transition(noop_transition(TestState::Up, TestEvent::Down, TestState::Init))
            .build();

        match result {
            Err(BuildError::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains(&BuildError::MissingToState));
                assert!(errors.contains(&BuildError::DuplicateTransition {
                    state: "Up".to_string(),
                    event: "Down".to_string(),
                }));
            }
            Err(other) => panic!("Expected accumulated errors, got {}", other),
            Ok(_) => panic!("Expected accumulated errors, got a table"),
        }
    }

    #[test]
    fn last_wins_policy_is_forwarded() {
        let table = TableBuilder::<TestState, TestEvent, ()>::new()
            .on_duplicate(DuplicatePolicy::LastWins)
            .add_transition(noop_transition(TestState::Up, TestEvent::Down, TestState::Down))
            .add_transition(noop_transition(TestState::Up, TestEvent::Down, TestState::Init))
            .build()
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup(&TestState::Up, &TestEvent::Down).unwrap().to,
            TestState::Init
        );
    }
}
