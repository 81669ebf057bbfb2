//! Builder for constructing transition rows.

use crate::core::{Event, State};
use crate::table::{Action, ActionError, BuildError, Transition};
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State, E: Event, A> {
    from: Option<S>,
    event: Option<E>,
    to: Option<S>,
    action: Option<Action<A>>,
}

impl<S: State, E: Event, A: 'static> TransitionBuilder<S, E, A> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            event: None,
            to: None,
            action: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the action (required).
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&A) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Use an action that always succeeds and does nothing.
    pub fn noop(self) -> Self {
        self.action(|_| Ok(()))
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, E, A>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let action = self.action.ok_or(BuildError::MissingAction)?;

        Ok(Transition {
            from,
            event,
            to,
            action,
        })
    }
}

impl<S: State, E: Event, A: 'static> Default for TransitionBuilder<S, E, A> {
    fn default() -> Self {
        Self::new()
    }
}
