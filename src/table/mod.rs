//! The state transition table.
//!
//! A [`TransitionTable`] maps `(state, event)` pairs to a [`Transition`].
//! It is built once, validated up front, and read-only afterwards, so an
//! executor can share it behind an `Arc` without locking.
//!
//! # Duplicate keys
//!
//! Two rows with the same `(state, event)` pair are ambiguous. The default
//! [`DuplicatePolicy::Reject`] turns every such pair into a
//! [`BuildError::DuplicateTransition`], all reported at once.
//! [`DuplicatePolicy::LastWins`] keeps the later row and logs the overwrite.

mod error;
mod transition;

pub use error::BuildError;
pub use transition::{Action, ActionError, Transition};

use crate::core::{Event, State};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// How repeated `(state, event)` pairs are resolved at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the build, naming every repeated pair
    #[default]
    Reject,

    /// Keep the row defined last and warn about the one it replaced
    LastWins,
}

/// Immutable lookup table from `(state, event)` to a transition.
pub struct TransitionTable<S: State, E: Event, A> {
    rows: HashMap<S, HashMap<E, Transition<S, E, A>>>,
    len: usize,
}

impl<S: State, E: Event, A> TransitionTable<S, E, A> {
    /// Build a table, rejecting duplicate `(state, event)` pairs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hsm::table::{Transition, TransitionTable};
    /// use hsm::{event_enum, state_enum};
    ///
    /// state_enum! {
    ///     enum Link { Init, Up, Down }
    /// }
    /// event_enum! {
    ///     enum Signal { Init, Down }
    /// }
    ///
    /// let table = TransitionTable::build(vec![
    ///     Transition::new(Link::Init, Signal::Init, Link::Up, |_: &()| Ok(())),
    ///     Transition::new(Link::Up, Signal::Down, Link::Down, |_: &()| Ok(())),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(table.lookup(&Link::Up, &Signal::Down).unwrap().to, Link::Down);
    /// assert!(table.lookup(&Link::Down, &Signal::Down).is_none());
    /// ```
    pub fn build<I>(transitions: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = Transition<S, E, A>>,
    {
        Self::build_with(transitions, DuplicatePolicy::Reject)
    }

    /// Build a table with an explicit duplicate policy.
    pub fn build_with<I>(transitions: I, policy: DuplicatePolicy) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = Transition<S, E, A>>,
    {
        let transitions: Vec<_> = transitions.into_iter().collect();
        if transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        if policy == DuplicatePolicy::Reject {
            into_result(validate_unique(&transitions))?;
        }

        let mut rows: HashMap<S, HashMap<E, Transition<S, E, A>>> = HashMap::new();
        let mut len = 0;
        for transition in transitions {
            let by_event = rows.entry(transition.from.clone()).or_default();
            let from = transition.from.clone();
            let event = transition.event.clone();
            match by_event.insert(event, transition) {
                Some(replaced) => {
                    tracing::warn!(
                        state = from.name(),
                        event = replaced.event.name(),
                        replaced_target = replaced.to.name(),
                        "duplicate transition replaced by later definition"
                    );
                }
                None => len += 1,
            }
        }

        Ok(Self { rows, len })
    }

    /// Find the transition for `(state, event)` (pure).
    pub fn lookup(&self, state: &S, event: &E) -> Option<&Transition<S, E, A>> {
        self.rows.get(state).and_then(|by_event| by_event.get(event))
    }

    pub fn contains(&self, state: &S, event: &E) -> bool {
        self.lookup(state, event).is_some()
    }

    /// Number of distinct `(state, event)` keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct start states that have at least one outgoing transition.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.rows.keys()
    }

    /// All rows, in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<S, E, A>> {
        self.rows.values().flat_map(|by_event| by_event.values())
    }
}

/// Accumulate one failure per repeated `(state, event)` pair.
pub(crate) fn validate_unique<S: State, E: Event, A>(
    transitions: &[Transition<S, E, A>],
) -> Validation<(), NonEmptyVec<BuildError>> {
    let mut seen = HashSet::new();
    let checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = transitions
        .iter()
        .map(|t| {
            if seen.insert((&t.from, &t.event)) {
                Validation::success(())
            } else {
                Validation::fail(BuildError::DuplicateTransition {
                    state: t.from.name().to_string(),
                    event: t.event.name().to_string(),
                })
            }
        })
        .collect();

    Validation::all_vec(checks).map(|_| ())
}

/// Collapse accumulated failures into a single `BuildError`.
pub(crate) fn into_result(
    validation: Validation<(), NonEmptyVec<BuildError>>,
) -> Result<(), BuildError> {
    match validation {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => {
            let mut errors: Vec<BuildError> = errors.iter().cloned().collect();
            if errors.len() == 1 {
                Err(errors.remove(0))
            } else {
                Err(BuildError::Invalid(errors))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

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
            Up,
            Down,
        }
    }

    fn row(
        from: TestState,
        event: TestEvent,
        to: TestState,
    ) -> Transition<TestState, TestEvent, ()> {
        Transition::new(from, event, to, |_| Ok(()))
    }

    #[test]
    fn lookup_finds_defined_pairs() {
        let table = TransitionTable::build(vec![
            row(TestState::Init, TestEvent::Init, TestState::Up),
            row(TestState::Up, TestEvent::Down, TestState::Down),
            row(TestState::Down, TestEvent::Init, TestState::Up),
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.lookup(&TestState::Up, &TestEvent::Down).unwrap().to,
            TestState::Down
        );
        assert!(table.contains(&TestState::Down, &TestEvent::Init));
        assert!(!table.contains(&TestState::Down, &TestEvent::Down));
    }

    #[test]
    fn every_row_is_keyed_by_its_own_pair() {
        let table = TransitionTable::build(vec![
            row(TestState::Init, TestEvent::Init, TestState::Up),
            row(TestState::Up, TestEvent::Up, TestState::Up),
            row(TestState::Up, TestEvent::Down, TestState::Down),
        ])
        .unwrap();

        for transition in table.transitions() {
            let found = table.lookup(&transition.from, &transition.event).unwrap();
            assert!(found.matches(&transition.from, &transition.event));
        }
    }

    #[test]
    fn empty_list_is_rejected() {
        let result = TransitionTable::<TestState, TestEvent, ()>::build(Vec::new());
        assert!(matches!(result, Err(BuildError::NoTransitions)));
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let result = TransitionTable::build(vec![
            row(TestState::Up, TestEvent::Down, TestState::Down),
            row(TestState::Up, TestEvent::Down, TestState::Init),
        ]);

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateTransition {
                state: "Up".to_string(),
                event: "Down".to_string(),
            })
        );
    }

    #[test]
    fn all_duplicates_are_reported_together() {
        let result = TransitionTable::build(vec![
            row(TestState::Up, TestEvent::Down, TestState::Down),
            row(TestState::Up, TestEvent::Down, TestState::Init),
            row(TestState::Init, TestEvent::Init, TestState::Up),
            row(TestState::Init, TestEvent::Init, TestState::Down),
        ]);

        match result {
            Err(BuildError::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .all(|e| matches!(e, BuildError::DuplicateTransition { .. })));
            }
            other => panic!("Expected accumulated duplicates, got {:?}", other.err()),
        }
    }

    #[test]
    fn last_wins_keeps_later_definition() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&first_calls);
        let second = Arc::clone(&second_calls);

        let table = TransitionTable::build_with(
            vec![
                Transition::new(TestState::Up, TestEvent::Down, TestState::Down, move |_: &()| {
                    first.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
                Transition::new(TestState::Up, TestEvent::Down, TestState::Init, move |_: &()| {
                    second.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            ],
            DuplicatePolicy::LastWins,
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        let transition = table.lookup(&TestState::Up, &TestEvent::Down).unwrap();
        assert_eq!(transition.to, TestState::Init);

        transition.run(&()).unwrap();
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn states_lists_distinct_start_states() {
        let table = TransitionTable::build(vec![
            row(TestState::Up, TestEvent::Up, TestState::Up),
            row(TestState::Up, TestEvent::Down, TestState::Down),
            row(TestState::Down, TestEvent::Init, TestState::Up),
        ])
        .unwrap();

        let mut states: Vec<_> = table.states().map(|s| s.name().to_string()).collect();
        states.sort();
        assert_eq!(states, vec!["Down", "Up"]);
    }
}
