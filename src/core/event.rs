//! Event identifiers submitted to the executor.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for events that drive transitions.
///
/// `Event` has the same shape as [`State`](crate::core::State) but is a
/// separate trait, so a table is always keyed by one state type and one
/// event type. Even when both are backed by the same names ("Up", "Down")
/// they cannot be swapped at a call site.
///
/// # Example
///
/// ```rust
/// use hsm::core::Event;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Packet {
///     Up,
///     Down,
///     TimedOut,
/// }
///
/// impl Event for Packet {
///     fn name(&self) -> &str {
///         match self {
///             Self::Up => "Up",
///             Self::Down => "Down",
///             Self::TimedOut => "TimedOut",
///         }
///     }
/// }
///
/// assert_eq!(Packet::TimedOut.name(), "TimedOut");
/// ```
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
