//! Spot Backend API Adapter
//!
//! Implements the HTTP client for the spot backend: vault balances,
//! deposits and withdrawals, and order book operations.
//!
//! Sub-modules:
//! - `client`: HTTP client with timeout and typed decoding
//! - `spot`: `SpotExchange` port implementation
//! - `types`: request body definitions

pub mod client;
pub mod spot;
pub mod types;

pub use client::{BackendClient, BackendClientConfig};
pub use spot::SpotClient;
