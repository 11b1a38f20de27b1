//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FuturesExchange`: Position lifecycle on the futures contracts
//! - `PriceSource`: Asset prices for the threshold rule
//! - `SpotExchange`: Vault and order book via the HTTP backend

pub mod futures;
pub mod price;
pub mod spot;
