//! Executor configuration.

use serde::{Deserialize, Serialize};

/// Settings for a single executor.
///
/// ## Field semantics
/// - `name`: label attached to the executor's tracing span
/// - `queue_capacity`: envelopes that may wait between submitters and the
///   loop (min 1; clamped). At 1 a submitter waits until the loop has taken
///   the previous event, which is as close to a synchronous handoff as a
///   tokio channel gets.
///
/// Deserializes with defaults for missing fields, so it can sit inside a
/// larger application config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub name: String,
    pub queue_capacity: usize,
}

impl ExecutorConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Channel capacity actually used (never 0).
    pub fn capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            name: "hsm".to_string(),
            queue_capacity: 1,
        }
    }
}
