//! Core identifier types and read-side views.
//!
//! This module contains the pieces every other layer builds on:
//! - State and event identifiers via the `State` and `Event` traits
//! - `TransitionRecord` and `StateSnapshot` for observing an executor

mod event;
mod snapshot;
mod state;

pub use event::Event;
pub use snapshot::{StateSnapshot, TransitionRecord};
pub use state::State;
