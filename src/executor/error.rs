//! Errors reported by a running executor.

use crate::table::ActionError;
use thiserror::Error;

/// Conditions reported to an executor's [`ErrorHandler`].
///
/// None of these stop the executor. State and event names are rendered
/// through `name()` so the error is independent of the table's types.
///
/// [`ErrorHandler`]: crate::executor::ErrorHandler
#[derive(Debug, Error)]
pub enum HsmError {
    /// An action returned an error. The transition stays committed.
    #[error("action for '{from}' -({event})-> '{to}' failed: {source}")]
    Action {
        from: String,
        event: String,
        to: String,
        #[source]
        source: ActionError,
    },

    #[error("no transition defined for state '{state}' on event '{event}'")]
    UnmappedTransition { state: String, event: String },

    /// An event arrived before `initialize` seeded a state.
    #[error("event '{event}' received before the executor was initialized")]
    NotInitialized { event: String },

    #[error("executor already initialized")]
    AlreadyInitialized,
}

impl HsmError {
    pub fn is_unmapped(&self) -> bool {
        matches!(self, Self::UnmappedTransition { .. })
    }

    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_message_names_state_and_event() {
        let err = HsmError::UnmappedTransition {
            state: "Down".to_string(),
            event: "AdminDown".to_string(),
        };
        assert!(err.is_unmapped());
        assert_eq!(
            err.to_string(),
            "no transition defined for state 'Down' on event 'AdminDown'"
        );
    }

    #[test]
    fn action_error_is_forwarded_verbatim() {
        let err = HsmError::Action {
            from: "Up".to_string(),
            event: "Down".to_string(),
            to: "Down".to_string(),
            source: ActionError::new("peer unreachable"),
        };
        assert!(err.is_action());
        assert!(err.to_string().ends_with("failed: peer unreachable"));
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("peer unreachable".to_string())
        );
    }
}
