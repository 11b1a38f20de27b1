//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's workflows.
//!
//! Use cases:
//! - `FuturesStrategy`: Threshold open/close state machine
//! - `SpotStrategy`: Balance check and buy order
//! - `Driver`: Fixed-interval loop with per-cycle error isolation

pub mod driver;
pub mod futures_strategy;
pub mod spot_strategy;

pub use driver::{
  Cycle, CycleReport, Driver, DriverExit, DriverTiming, StepOutcome, wait_for_exit,
};
pub use futures_strategy::{CycleOutcome, FuturesStrategy, TradeParams};
pub use spot_strategy::{SpotOutcome, SpotParams, SpotStrategy};
