//! BFD Session Simulator
//!
//! This example drives a simplified BFD (Bidirectional Forwarding
//! Detection) session through the executor.
//!
//! Key concepts:
//! - Declaring states and events with `state_enum!` / `event_enum!`
//! - Sharing a counter between actions through an `Arc` argument
//! - Observing unmapped transitions through the error handler
//! - Events submitted after `close` are dropped
//!
//! Run with: RUST_LOG=debug cargo run --example bfd_session

use hsm::executor::{Executor, HsmError};
use hsm::table::{ActionError, Transition};
use hsm::{event_enum, state_enum};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum SessionState {
        AdminDown,
        Down,
        Init,
        Up,
    }
}

event_enum! {
    enum SessionEvent {
        AdminDown,
        Down,
        Exit,
        Init,
        TimedOut,
        Up,
    }
}

/// Down counter shared by the actions that take a session down.
type DownCount = Option<Arc<AtomicU32>>;

fn init_action(_: &DownCount) -> Result<(), ActionError> {
    println!("An [Init] packet is sent to initiate a BFD session.");
    Ok(())
}

fn up_action(_: &DownCount) -> Result<(), ActionError> {
    println!("An [Up] packet is sent. The session is normal.");
    Ok(())
}

fn count_down(arg: &DownCount) -> Result<u32, ActionError> {
    let counter = arg
        .as_ref()
        .ok_or_else(|| ActionError::new("down counter not supplied"))?;
    Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
}

fn down_action(arg: &DownCount) -> Result<(), ActionError> {
    let count = count_down(arg)?;
    println!("A [Down] packet is sent. The session is abnormal. (downCnt={count})");
    Ok(())
}

fn admin_down_action(arg: &DownCount) -> Result<(), ActionError> {
    let count = count_down(arg)?;
    println!(
        "An [Admin down] packet is sent to indicate that it has been down by the administrator. (downCnt={count})"
    );
    Ok(())
}

fn session_transitions() -> Vec<Transition<SessionState, SessionEvent, DownCount>> {
    use SessionEvent as E;
    use SessionState as S;

    vec![
        Transition::new(S::Init, E::Down, S::Init, init_action),
        Transition::new(S::Init, E::TimedOut, S::Down, down_action),
        Transition::new(S::Init, E::Init, S::Up, up_action),
        Transition::new(S::Init, E::Up, S::Up, up_action),
        Transition::new(S::Up, E::Init, S::Up, up_action),
        Transition::new(S::Up, E::Up, S::Up, up_action),
        Transition::new(S::Up, E::Down, S::Down, down_action),
        Transition::new(S::Up, E::TimedOut, S::Down, down_action),
        Transition::new(S::Up, E::AdminDown, S::AdminDown, admin_down_action),
        Transition::new(S::Down, E::Init, S::Up, up_action),
        Transition::new(S::Down, E::Up, S::Down, up_action),
        Transition::new(S::Down, E::Down, S::Init, up_action),
        Transition::new(S::AdminDown, E::Exit, S::Up, up_action),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== BFD Session Example ===\n");

    let cancel = CancellationToken::new();
    let machine = Executor::new(
        cancel.clone(),
        |err: HsmError| println!("Error : {err}"),
        session_transitions(),
    )?;

    let down_count: DownCount = Some(Arc::new(AtomicU32::new(0)));

    machine
        .initialize(SessionState::Init, SessionEvent::Init, down_count.clone())
        .await?;

    machine.submit_event(SessionEvent::Up, None).await;
    machine.submit_event(SessionEvent::Down, down_count.clone()).await;
    machine.submit_event(SessionEvent::Init, None).await;

    for _ in 0..5 {
        machine.submit_event(SessionEvent::Up, None).await;
    }

    machine.submit_event(SessionEvent::Down, down_count.clone()).await;

    // No AdminDown transition from Down: reported as an error.
    machine.submit_event(SessionEvent::AdminDown, down_count.clone()).await;

    // The machine keeps accepting events after the error.
    for _ in 0..4 {
        machine.submit_event(SessionEvent::Up, None).await;
    }

    machine.settle().await;
    let (previous, current) = machine.query_state();
    println!("\nState before close: previous={previous:?} current={current:?}");

    machine.close();
    machine.closed().await;

    // These events are not accepted.
    machine.submit_event(SessionEvent::Init, down_count.clone()).await;
    machine.submit_event(SessionEvent::Up, None).await;
    machine.submit_event(SessionEvent::Down, down_count.clone()).await;
    machine.submit_event(SessionEvent::AdminDown, down_count.clone()).await;

    let (previous, current) = machine.query_state();
    println!("State after close:  previous={previous:?} current={current:?}");
    println!("Cancellation released: {}", cancel.is_cancelled());
    if let Some(counter) = &down_count {
        println!("Total downs: {}", counter.load(Ordering::SeqCst));
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
