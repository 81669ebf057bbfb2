//! State identifiers for the transition table.
//!
//! A state is an opaque, comparable name. The executor never inspects a state
//! beyond equality and hashing, so any small enum (or newtype) qualifies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// States are keys into the transition table together with an [`Event`],
/// so they must be hashable and comparable. They are cloned into the
/// executor's previous/current bookkeeping and into error reports.
///
/// # Required Traits
///
/// - `Clone`: the executor keeps the previous and current state by value
/// - `Eq` + `Hash`: states are half of the table key
/// - `Debug`: diagnostics
/// - `Serialize` + `Deserialize`: snapshots are serializable
///
/// # Example
///
/// ```rust
/// use hsm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Session {
///     Down,
///     Init,
///     Up,
/// }
///
/// impl State for Session {
///     fn name(&self) -> &str {
///         match self {
///             Self::Down => "Down",
///             Self::Init => "Init",
///             Self::Up => "Up",
///         }
///     }
/// }
///
/// assert_eq!(Session::Up.name(), "Up");
/// ```
///
/// [`Event`]: crate::core::Event
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
