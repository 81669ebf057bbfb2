//! Builder API for ergonomic table construction.
//!
//! This module provides fluent builders and macros for declaring states,
//! events and transition tables with minimal boilerplate.

pub mod macros;
pub mod table;
pub mod transition;

pub use table::TableBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Event, State};
use crate::table::Transition;

/// Create a transition whose action always succeeds.
///
/// # Example
///
/// ```
/// use hsm::builder::noop_transition;
/// use hsm::{event_enum, state_enum};
///
/// state_enum! {
///     enum Link { Down, Up }
/// }
/// event_enum! {
///     enum Signal { Up }
/// }
///
/// let transition = noop_transition::<_, _, ()>(Link::Down, Signal::Up, Link::Up);
/// assert!(transition.run(&()).is_ok());
/// ```
pub fn noop_transition<S, E, A>(from: S, event: E, to: S) -> Transition<S, E, A>
where
    S: State,
    E: Event,
    A: 'static,
{
    Transition::new(from, event, to, |_| Ok(()))
}
