//! Asynchronous executor for a transition table.
//!
//! An [`Executor`] owns the machine's previous/current state and argument
//! and processes submitted events one at a time on a dedicated tokio task.
//!
//! # Key Concepts
//!
//! - **Single writer**: only the processing loop mutates state; readers get
//!   atomic snapshots
//! - **Backpressure**: submission waits on a bounded queue
//! - **Non-halting errors**: action failures and unmapped events go to an
//!   [`ErrorHandler`] and the loop keeps running
//! - **Cancellation**: the cancellation token is consulted only when an event
//!   has no transition; a cancelled token plus a stream of mapped events
//!   keeps the machine running

mod config;
mod error;
mod handler;
mod machine;
mod worker;

pub use config::ExecutorConfig;
pub use error::HsmError;
pub use handler::{ErrorChannel, ErrorHandler};
pub use machine::Executor;
