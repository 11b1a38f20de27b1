//! Domain layer - Core business logic and models.
//!
//! Position bookkeeping types and the threshold decision rule. Pure
//! code: no I/O, testable in isolation.

pub mod position;
pub mod threshold;

// Re-export core types for convenience
pub use position::{
    AssetId, Direction, OnChainPosition, OpenedPosition, Position, PositionId,
    PositionRequest, TxHandle, asset_id,
};
pub use threshold::{Action, ThresholdRule};
