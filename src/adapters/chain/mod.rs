//! Chain Adapters - Futures Contract Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - Signing RPC provider shared by every adapter
//! - ABI bindings for the exchange, vault and oracle contracts
//! - The `FuturesExchange` port implementation
//! - The oracle-backed `PriceSource`

pub mod contracts;
pub mod futures_client;
pub mod oracle;
pub mod provider;

pub use contracts::ContractAddresses;
pub use futures_client::FuturesClient;
pub use oracle::OraclePriceSource;
pub use provider::{ChainProvider, SharedProvider};
