//! Transition rows and their actions.

use crate::core::{Event, State};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an action.
///
/// Action failures are advisory: the transition that ran the action has
/// already been committed and is never rolled back.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ActionError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it as the source.
    pub fn from_source<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Type alias for transition actions.
/// Actions receive the argument submitted with the event that matched.
pub type Action<A> = Arc<dyn Fn(&A) -> Result<(), ActionError> + Send + Sync>;

/// One row of the transition table: `(from, event) -> (to, action)`.
pub struct Transition<S: State, E: Event, A> {
    pub from: S,
    pub event: E,
    pub to: S,
    pub action: Action<A>,
}

impl<S: State, E: Event, A> Transition<S, E, A> {
    /// Create a transition row.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hsm::table::Transition;
    /// use hsm::{event_enum, state_enum};
    ///
    /// state_enum! {
    ///     enum Link { Down, Up }
    /// }
    /// event_enum! {
    ///     enum Signal { Up }
    /// }
    ///
    /// let transition = Transition::new(Link::Down, Signal::Up, Link::Up, |_: &()| Ok(()));
    /// assert!(transition.matches(&Link::Down, &Signal::Up));
    /// ```
    pub fn new<F>(from: S, event: E, to: S, action: F) -> Self
    where
        F: Fn(&A) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            from,
            event,
            to,
            action: Arc::new(action),
        }
    }

    /// Check if this row is keyed by the given state and event (pure)
    pub fn matches(&self, state: &S, event: &E) -> bool {
        self.from == *state && self.event == *event
    }

    /// Invoke the action with the submitted argument.
    pub fn run(&self, arg: &A) -> Result<(), ActionError> {
        (self.action)(arg)
    }
}

impl<S: State, E: Event, A> Clone for Transition<S, E, A> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            event: self.event.clone(),
            to: self.to.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<S: State, E: Event, A> fmt::Debug for Transition<S, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("event", &self.event)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}
