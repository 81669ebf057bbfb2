//! The processing loop and the state it owns.
//!
//! Exactly one task runs [`run`]. It is the only writer of [`Committed`];
//! readers on other tasks take the read lock and always see a state together
//! with the argument written in the same critical section.

use super::error::HsmError;
use super::handler::ErrorHandler;
use crate::core::{Event, State, StateSnapshot, TransitionRecord};
use crate::table::TransitionTable;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Messages carried from submitters to the loop.
pub(crate) enum Envelope<S, E, A> {
    /// Set the current state without a lookup, then process `event`.
    Seed { state: S, event: E, arg: A },
    Event { event: E, arg: A },
    /// Acknowledged once everything queued ahead of it has been processed.
    Settle(oneshot::Sender<()>),
}

/// Values written by the loop in one critical section.
pub(crate) struct Committed<S: State, E: Event, A> {
    pub(crate) previous: Option<S>,
    pub(crate) current: Option<S>,
    pub(crate) previous_arg: Option<A>,
    pub(crate) current_arg: Option<A>,
    pub(crate) last: Option<TransitionRecord<S, E>>,
    pub(crate) count: u64,
}

impl<S: State, E: Event, A> Default for Committed<S, E, A> {
    fn default() -> Self {
        Self {
            previous: None,
            current: None,
            previous_arg: None,
            current_arg: None,
            last: None,
            count: 0,
        }
    }
}

/// State shared between the executor handles and the loop.
///
/// The loop holds this but not the channel sender, so dropping every
/// handle ends the loop.
pub(crate) struct Shared<S: State, E: Event, A> {
    pub(crate) id: Uuid,
    pub(crate) committed: RwLock<Committed<S, E, A>>,
    pub(crate) closed: AtomicBool,
    pub(crate) initialized: AtomicBool,
    /// Fires when the executor closes; interrupts the loop and waiting submitters.
    pub(crate) shutdown: CancellationToken,
    /// External cancellation context, released on close.
    pub(crate) cancel: CancellationToken,
    /// Fires after the loop has returned.
    pub(crate) stopped: CancellationToken,
}

impl<S: State, E: Event, A: Clone> Shared<S, E, A> {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            committed: RwLock::new(Committed::default()),
            closed: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            cancel,
            stopped: CancellationToken::new(),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Mark closed and wake the loop. Returns false if already closed.
    pub(crate) fn mark_closed(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.shutdown.cancel();
        true
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Committed<S, E, A>> {
        // The write lock is never held across user code, so a poisoned
        // lock still guards a consistent value.
        self.committed.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> StateSnapshot<S, E> {
        let committed = self.read();
        StateSnapshot {
            executor: self.id,
            previous: committed.previous.clone(),
            current: committed.current.clone(),
            last_transition: committed.last.clone(),
            transitions_committed: committed.count,
        }
    }

    fn seed(&self, state: S) {
        let mut committed = self.committed.write().unwrap_or_else(PoisonError::into_inner);
        committed.current = Some(state);
    }

    fn commit(&self, from: S, event: E, to: S, arg: A) {
        let record = TransitionRecord {
            from,
            event,
            to: to.clone(),
            at: Utc::now(),
        };

        let mut guard = self.committed.write().unwrap_or_else(PoisonError::into_inner);
        let committed = &mut *guard;
        committed.previous = committed.current.replace(to);
        committed.previous_arg = committed.current_arg.replace(arg);
        committed.last = Some(record);
        committed.count += 1;
    }
}

/// Finishes shutdown when the loop returns or unwinds.
///
/// A panicking action must still leave the executor closed, with
/// `closed().await` resolvable.
struct Teardown<'a, S: State, E: Event, A> {
    shared: &'a Shared<S, E, A>,
}

impl<S: State, E: Event, A> Drop for Teardown<'_, S, E, A> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!("executor loop panicked, closing");
        }
        self.shared.closed.store(true, Ordering::SeqCst);
        self.shared.shutdown.cancel();
        self.shared.stopped.cancel();
    }
}

/// Outcome of processing one event.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

/// Run the processing loop until the executor closes.
pub(crate) async fn run<S, E, A, H>(
    shared: Arc<Shared<S, E, A>>,
    table: Arc<TransitionTable<S, E, A>>,
    mut rx: mpsc::Receiver<Envelope<S, E, A>>,
    handler: H,
) where
    S: State,
    E: Event,
    A: Clone + Send + Sync + 'static,
    H: ErrorHandler,
{
    let _teardown = Teardown { shared: &shared };
    tracing::debug!(rows = table.len(), "executor loop started");

    loop {
        let envelope = tokio::select! {
            biased;
            _ = shared.shutdown.cancelled() => break,
            next = rx.recv() => match next {
                Some(envelope) => envelope,
                None => break,
            },
        };

        // Close may have won the race after this envelope was queued.
        if shared.is_closed() {
            break;
        }

        let step = match envelope {
            Envelope::Seed { state, event, arg } => {
                shared.seed(state);
                dispatch(&shared, &table, &handler, event, arg)
            }
            Envelope::Event { event, arg } => dispatch(&shared, &table, &handler, event, arg),
            Envelope::Settle(ack) => {
                let _ = ack.send(());
                Step::Continue
            }
        };

        if step == Step::Stop {
            tracing::info!("cancellation observed on unmapped transition, closing");
            shared.mark_closed();
            break;
        }
    }

    // Dropping the receiver discards anything still queued.
    rx.close();
    drop(rx);
    tracing::info!("executor loop stopped");
}

fn dispatch<S, E, A, H>(
    shared: &Shared<S, E, A>,
    table: &TransitionTable<S, E, A>,
    handler: &H,
    event: E,
    arg: A,
) -> Step
where
    S: State,
    E: Event,
    A: Clone,
    H: ErrorHandler,
{
    let current = shared.read().current.clone();
    let transition = current
        .as_ref()
        .and_then(|state| table.lookup(state, &event));

    let Some(transition) = transition else {
        if shared.cancel.is_cancelled() {
            return Step::Stop;
        }

        let error = match current {
            Some(state) => {
                tracing::warn!(
                    state = state.name(),
                    event = event.name(),
                    "no transition defined"
                );
                HsmError::UnmappedTransition {
                    state: state.name().to_string(),
                    event: event.name().to_string(),
                }
            }
            None => {
                tracing::warn!(event = event.name(), "event before initialization");
                HsmError::NotInitialized {
                    event: event.name().to_string(),
                }
            }
        };
        handler.handle(error);
        return Step::Continue;
    };

    tracing::debug!(
        "{} -({})-> {}",
        transition.from.name(),
        transition.event.name(),
        transition.to.name()
    );
    shared.commit(
        transition.from.clone(),
        event,
        transition.to.clone(),
        arg.clone(),
    );

    if let Err(source) = transition.run(&arg) {
        tracing::warn!(
            from = transition.from.name(),
            event = transition.event.name(),
            to = transition.to.name(),
            error = %source,
            "transition action failed"
        );
        handler.handle(HsmError::Action {
            from: transition.from.name().to_string(),
            event: transition.event.name().to_string(),
            to: transition.to.name().to_string(),
            source,
        });
    }

    Step::Continue
}
