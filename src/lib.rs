//! Hsm: a table-driven state machine executor
//!
//! A machine is described by a declarative transition table, a set of
//! `(state, event) -> (target, action)` rows, and driven by an asynchronous
//! stream of events. A single background task processes events in order,
//! runs actions, and records the previous and current state.
//!
//! # Core Concepts
//!
//! - **State** / **Event**: two distinct identifier traits, usually declared
//!   with [`state_enum!`] and [`event_enum!`]
//! - **Transition table**: immutable after build, O(1) lookup
//! - **Executor**: the single-writer event loop and its lifecycle
//!
//! # Example
//!
//! ```rust
//! use hsm::executor::{Executor, ExecutorConfig};
//! use hsm::table::{Transition, TransitionTable};
//! use hsm::{event_enum, state_enum};
//! use tokio_util::sync::CancellationToken;
//!
//! state_enum! {
//!     enum Session { Init, Up, Down }
//! }
//!
//! event_enum! {
//!     enum Packet { Init, Down }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let table = TransitionTable::build(vec![
//!     Transition::new(Session::Init, Packet::Init, Session::Up, |_: &()| Ok(())),
//!     Transition::new(Session::Up, Packet::Down, Session::Down, |_: &()| Ok(())),
//! ])
//! .unwrap();
//!
//! let (machine, _errors) =
//!     Executor::with_error_stream(table, ExecutorConfig::default(), CancellationToken::new());
//!
//! machine.initialize(Session::Init, Packet::Init, ()).await.unwrap();
//! machine.submit_event(Packet::Down, ()).await;
//! machine.settle().await;
//!
//! assert_eq!(machine.query_state(), (Some(Session::Up), Some(Session::Down)));
//! machine.close();
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod executor;
pub mod table;

// Re-export commonly used types
pub use crate::core::{Event, State, StateSnapshot, TransitionRecord};
pub use crate::executor::{ErrorChannel, ErrorHandler, Executor, ExecutorConfig, HsmError};
pub use crate::table::{ActionError, BuildError, DuplicatePolicy, Transition, TransitionTable};
