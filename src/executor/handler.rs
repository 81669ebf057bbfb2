//! Sinks for errors raised inside the processing loop.
//!
//! The loop never stops because of an [`HsmError`]; it hands each one to the
//! executor's [`ErrorHandler`] and moves on to the next event. Handlers run on
//! the loop task, so a slow handler delays the next event.

use super::error::HsmError;
use tokio::sync::mpsc;

/// Receives every error the processing loop reports.
///
/// Implemented for closures, and for [`ErrorChannel`] which turns errors into
/// a stream the caller can await.
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(&self, error: HsmError);
}

impl<F> ErrorHandler for F
where
    F: Fn(HsmError) + Send + Sync + 'static,
{
    fn handle(&self, error: HsmError) {
        self(error)
    }
}

/// Forwards errors into an unbounded channel.
///
/// Errors are dropped silently once the receiver is gone.
#[derive(Clone, Debug)]
pub struct ErrorChannel {
    tx: mpsc::UnboundedSender<HsmError>,
}

impl ErrorChannel {
    /// Create a channel sink and the receiving half of the error stream.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HsmError>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ErrorHandler for ErrorChannel {
    fn handle(&self, error: HsmError) {
        let _ = self.tx.send(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn unmapped() -> HsmError {
        HsmError::UnmappedTransition {
            state: "Down".to_string(),
            event: "AdminDown".to_string(),
        }
    }

    #[test]
    fn closure_handler_is_invoked() {
        let count = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&count);
        let handler = move |_err: HsmError| {
            observed.fetch_add(1, Ordering::SeqCst);
        };

        handler.handle(unmapped());
        handler.handle(unmapped());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn channel_handler_streams_errors() {
        let (sink, mut rx) = ErrorChannel::new();
        sink.handle(unmapped());

        let received = rx.try_recv().unwrap();
        assert!(received.is_unmapped());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_handler_ignores_dropped_receiver() {
        let (sink, rx) = ErrorChannel::new();
        drop(rx);
        sink.handle(unmapped());
    }
}
