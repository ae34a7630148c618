//! Door State Machine
//!
//! This example walks a door through nested open and closed states and
//! prints every hook as it fires.
//!
//! Key concepts:
//! - Composite states (Open and Close each have children)
//! - Allow-lists deciding which moves are legal
//! - Exit hooks innermost first, enter hooks outermost first
//! - Rejected moves reported through the failure hook
//!
//! Run with: RUST_LOG=nested_fsm=trace cargo run --example door

use nested_fsm::builder::{StateBuilder, StateMachineBuilder};
use nested_fsm::state_enum;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Door {
        Initial,
        Open,
        OpenHalf,
        OpenCompletely,
        Close,
        CloseLocked,
        CloseUnlocked,
    }
}

fn announce(state: Door) -> StateBuilder<Door> {
    StateBuilder::new(state)
        .on_enter(|from, to, current| {
            println!("  enter {current:?} (from {from:?} towards {to:?})");
        })
        .on_exit(|_, to, current| {
            println!("  exit  {current:?} (towards {to:?})");
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Door State Machine Example ===\n");

    use Door::*;
    let mut door = StateMachineBuilder::new()
        .state(announce(Initial))
        .state(announce(Open).from([Initial, OpenHalf, OpenCompletely, Close]))
        .state(announce(OpenHalf).parent(Open).from([Initial, OpenCompletely, CloseUnlocked]))
        .state(announce(OpenCompletely).parent(Open).from([OpenHalf]))
        .state(announce(Close).from([Open]))
        .state(announce(CloseUnlocked).parent(Close).from([OpenHalf, CloseLocked]))
        .state(announce(CloseLocked).parent(Close).from([CloseUnlocked]))
        .on_transition_succeeded(|from, to, _| println!("  ok: {from:?} -> {to:?}"))
        .on_transition_failed(|from, to, _| println!("  refused: {from:?} -> {to:?}"))
        .initial(Initial)
        .build()?;

    for target in [OpenHalf, CloseLocked, CloseUnlocked, CloseLocked, OpenCompletely] {
        println!("\nRequest {target:?}:");
        door.transition(&target)?;
    }

    println!("\nCurrent state: {:?}", door.current_state()?);
    println!("Inside Close: {}", door.is_in(&Close));
    println!("Visited: {:?}", door.history().get_path());

    println!("\n=== Example Complete ===");
    Ok(())
}
