//! Build errors for transitions and transition tables.

use thiserror::Error;

/// Errors that can occur when building transitions and tables.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition action not specified. Call .action(f) or .noop()")]
    MissingAction,

    #[error("Duplicate transition for state '{state}' on event '{event}'")]
    DuplicateTransition { state: String, event: String },

    #[error("{} problems in transition list: {}", .0.len(), render_all(.0))]
    Invalid(Vec<BuildError>),
}

fn render_all(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_problem() {
        let err = BuildError::Invalid(vec![
            BuildError::MissingAction,
            BuildError::DuplicateTransition {
                state: "Up".to_string(),
                event: "Down".to_string(),
            },
        ]);

        let rendered = err.to_string();
        assert!(rendered.starts_with("2 problems"));
        assert!(rendered.contains("action not specified"));
        assert!(rendered.contains("state 'Up' on event 'Down'"));
    }
}
