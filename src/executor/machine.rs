//! Executor handle: lifecycle and submission API.

use super::config::ExecutorConfig;
use super::error::HsmError;
use super::handler::{ErrorChannel, ErrorHandler};
use super::worker::{self, Envelope, Shared};
use crate::core::{Event, State, StateSnapshot};
use crate::table::{BuildError, Transition, TransitionTable};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Handle to a running state machine.
///
/// The processing loop runs on its own tokio task and is the only writer of
/// the machine's state. Handles are cheap to clone; every clone submits to
/// the same loop.
///
/// Lifecycle: uninitialized until [`initialize`](Self::initialize), then
/// running until [`close`](Self::close) or until the loop sees an unmapped
/// transition while the cancellation token is cancelled. A closed executor
/// silently drops everything submitted to it.
pub struct Executor<S: State, E: Event, A> {
    tx: mpsc::Sender<Envelope<S, E, A>>,
    shared: Arc<Shared<S, E, A>>,
}

impl<S, E, A> Executor<S, E, A>
where
    S: State,
    E: Event,
    A: Clone + Send + Sync + 'static,
{
    /// Build a table from `transitions` and start an executor with the
    /// default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new<H, I>(cancel: CancellationToken, errors: H, transitions: I) -> Result<Self, BuildError>
    where
        H: ErrorHandler,
        I: IntoIterator<Item = Transition<S, E, A>>,
    {
        let table = TransitionTable::build(transitions)?;
        Ok(Self::spawn(table, ExecutorConfig::default(), cancel, errors))
    }

    /// Start an executor over `table`.
    ///
    /// `cancel` is the executor's cancellation context: the loop checks it
    /// when an event has no transition, and [`close`](Self::close) cancels
    /// it. Pass a child token to keep the cancellation from propagating
    /// upward.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<H>(
        table: impl Into<Arc<TransitionTable<S, E, A>>>,
        config: ExecutorConfig,
        cancel: CancellationToken,
        errors: H,
    ) -> Self
    where
        H: ErrorHandler,
    {
        let (tx, rx) = mpsc::channel(config.capacity());
        let shared = Arc::new(Shared::new(cancel));
        let span = tracing::info_span!("hsm", id = %shared.id, name = %config.name);

        tokio::spawn(worker::run(Arc::clone(&shared), table.into(), rx, errors).instrument(span));

        Self { tx, shared }
    }

    /// Start an executor whose errors are delivered as a stream.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn with_error_stream(
        table: impl Into<Arc<TransitionTable<S, E, A>>>,
        config: ExecutorConfig,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<HsmError>) {
        let (sink, rx) = ErrorChannel::new();
        (Self::spawn(table, config, cancel, sink), rx)
    }

    /// Seed the first state and submit the first event.
    ///
    /// `state` becomes current without a table lookup; `event` then goes
    /// through the normal path, so it needs a transition from `state` or it
    /// is reported as unmapped. Both happen on the loop in one step, so the
    /// seed is not visible to [`query_state`](Self::query_state) until the
    /// loop reaches it; await [`settle`](Self::settle) to observe it.
    ///
    /// Returns [`HsmError::AlreadyInitialized`] on a second call or after any
    /// [`submit_event`](Self::submit_event). Does nothing once the executor
    /// is closed.
    pub async fn initialize(&self, state: S, event: E, arg: A) -> Result<(), HsmError> {
        if self.is_closed() {
            return Ok(());
        }
        if self.shared.initialized.swap(true, Ordering::SeqCst) {
            return Err(HsmError::AlreadyInitialized);
        }

        self.send(Envelope::Seed { state, event, arg }).await;
        Ok(())
    }

    /// Submit an event for processing.
    ///
    /// Waits until the queue has room, which gives submitters backpressure
    /// and keeps each submitter's events in order. Dropped without error
    /// once the executor is closed, including while waiting for room.
    pub async fn submit_event(&self, event: E, arg: A) {
        self.shared.initialized.store(true, Ordering::SeqCst);
        self.send(Envelope::Event { event, arg }).await;
    }

    /// Wait until every event submitted before this call has been processed.
    ///
    /// Returns immediately if the executor is closed or closes while waiting.
    pub async fn settle(&self) {
        let (ack, done) = oneshot::channel();
        self.send(Envelope::Settle(ack)).await;
        let _ = done.await;
    }

    /// `(previous, current)` state, read from the latest committed transition.
    ///
    /// Both are `None` before initialization; `previous` stays `None` until
    /// the first transition commits.
    pub fn query_state(&self) -> (Option<S>, Option<S>) {
        let committed = self.shared.read();
        (committed.previous.clone(), committed.current.clone())
    }

    /// Argument submitted with the event that produced the current state.
    pub fn current_arg(&self) -> Option<A> {
        self.shared.read().current_arg.clone()
    }

    /// Argument of the transition before the current one.
    pub fn previous_arg(&self) -> Option<A> {
        self.shared.read().previous_arg.clone()
    }

    /// Current state and its argument, read together.
    pub fn state_with_arg(&self) -> (Option<S>, Option<A>) {
        let committed = self.shared.read();
        (committed.current.clone(), committed.current_arg.clone())
    }

    /// Serializable view of the committed state and the last transition.
    pub fn snapshot(&self) -> StateSnapshot<S, E> {
        self.shared.snapshot()
    }

    /// Close the executor.
    ///
    /// Stops accepting submissions, stops the loop, and cancels the
    /// executor's cancellation token. An action already running finishes;
    /// queued events are discarded. Returns `true` for the call that closed
    /// the executor and `false` for every later call.
    pub fn close(&self) -> bool {
        if !self.shared.mark_closed() {
            return false;
        }
        self.shared.cancel.cancel();
        tracing::info!(id = %self.shared.id, "executor closed");
        true
    }

    /// Whether the executor has stopped accepting submissions.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Resolves once the processing loop has exited.
    pub async fn closed(&self) {
        self.shared.stopped.cancelled().await
    }

    /// Identifier shared by every handle to this executor.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    async fn send(&self, envelope: Envelope<S, E, A>) {
        if self.is_closed() {
            return;
        }

        tokio::select! {
            biased;
            _ = self.shared.shutdown.cancelled() => {}
            result = self.tx.send(envelope) => {
                if result.is_err() {
                    tracing::trace!("executor loop gone, envelope dropped");
                }
            }
        }
    }
}

impl<S: State, E: Event, A> Clone for Executor<S, E, A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}
