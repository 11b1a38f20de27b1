//! Metrics and Monitoring Adapters
//!
//! Provides Prometheus metrics export on `/metrics` via axum 0.7.

pub mod prometheus;

pub use self::prometheus::MetricsRegistry;
