//! Read-side views of the executor's committed state.
//!
//! The executor keeps only the single most recent prior state, not a full
//! history. A [`StateSnapshot`] captures that pair together with the last
//! committed [`TransitionRecord`], all taken from one atomic write.

use super::event::Event;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use hsm::core::TransitionRecord;
/// use hsm::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum Link { Down, Up }
/// }
/// event_enum! {
///     enum Signal { Up }
/// }
///
/// let record = TransitionRecord {
///     from: Link::Down,
///     event: Signal::Up,
///     to: Link::Up,
///     at: Utc::now(),
/// };
/// assert!(!record.is_self_loop());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State, E: Event> {
    /// The state the machine was in when the event arrived
    pub from: S,
    /// The event that matched
    pub event: E,
    /// The state the machine moved to
    pub to: S,
    /// When the transition was committed
    pub at: DateTime<Utc>,
}

impl<S: State, E: Event> TransitionRecord<S, E> {
    /// True when the transition re-entered its own start state.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Point-in-time view of an executor.
///
/// `previous` and `current` are `None` until the executor is initialized.
/// `previous` stays `None` until the first committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateSnapshot<S: State, E: Event> {
    /// Identifier of the executor that produced this snapshot
    pub executor: Uuid,
    pub previous: Option<S>,
    pub current: Option<S>,
    pub last_transition: Option<TransitionRecord<S, E>>,
    /// Number of transitions committed since the executor started
    pub transitions_committed: u64,
}

impl<S: State, E: Event> StateSnapshot<S, E> {
    /// Time elapsed since the last committed transition.
    ///
    /// Returns `None` if nothing has been committed yet.
    pub fn since_last_transition(&self) -> Option<Duration> {
        self.last_transition.as_ref().map(|record| {
            Utc::now()
                .signed_duration_since(record.at)
                .to_std()
                .unwrap_or(Duration::ZERO)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState {
            Init,
            Up,
        }
    }

    event_enum! {
        enum TestEvent {
            Init,
            Up,
        }
    }

    fn record(from: TestState, to: TestState) -> TransitionRecord<TestState, TestEvent> {
        TransitionRecord {
            from,
            event: TestEvent::Up,
            to,
            at: Utc::now(),
        }
    }

    #[test]
    fn self_loop_is_detected() {
        assert!(record(TestState::Up, TestState::Up).is_self_loop());
        assert!(!record(TestState::Init, TestState::Up).is_self_loop());
    }

    #[test]
    fn empty_snapshot_has_no_elapsed_time() {
        let snapshot: StateSnapshot<TestState, TestEvent> = StateSnapshot {
            executor: Uuid::new_v4(),
            previous: None,
            current: None,
            last_transition: None,
            transitions_committed: 0,
        };
        assert!(snapshot.since_last_transition().is_none());
    }

    #[test]
    fn elapsed_time_is_measured_from_last_transition() {
        let mut last = record(TestState::Init, TestState::Up);
        last.at = Utc::now() - chrono::Duration::seconds(5);

        let snapshot = StateSnapshot {
            executor: Uuid::new_v4(),
            previous: Some(TestState::Init),
            current: Some(TestState::Up),
            last_transition: Some(last),
            transitions_committed: 1,
        };

        let elapsed = snapshot.since_last_transition().unwrap();
        assert!(elapsed >= Duration::from_secs(5));
    }

    #[test]
    fn snapshot_serializes_correctly() {
        let snapshot = StateSnapshot {
            executor: Uuid::new_v4(),
            previous: Some(TestState::Init),
            current: Some(TestState::Up),
            last_transition: Some(record(TestState::Init, TestState::Up)),
            transitions_committed: 1,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let deserialized: StateSnapshot<TestState, TestEvent> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, deserialized);
    }
}
