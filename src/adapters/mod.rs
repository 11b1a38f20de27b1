//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, blockchain RPC). Each
//! sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: Spot backend REST client
//! - `chain`: Futures contracts and oracle via alloy-rs
//! - `metrics`: Prometheus metrics export

pub mod api;
pub mod chain;
pub mod metrics;
