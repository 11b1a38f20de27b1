//! Prometheus Metrics Registry - Driver Observability
//!
//! Registers the bot's counters and gauges and serves them on
//! `/metrics`. All metrics follow the naming convention
//! `threshold_bot_*`.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use prometheus::{Encoder, Gauge, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::domain::threshold::Action;
use crate::error::ErrorKind;

/// Centralized Prometheus metrics for the trading bot.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Driver cycles by result (`ok` / `error`).
    pub cycles: IntCounterVec,
    /// Failed cycles by error kind.
    pub errors: IntCounterVec,
    /// Strategy decisions by action.
    pub actions: IntCounterVec,
    /// Last observed price.
    pub last_price: Gauge,
    /// 1 while a position is tracked.
    pub position_open: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let cycles = IntCounterVec::new(
            Opts::new("threshold_bot_cycles_total", "Driver cycles by result"),
            &["result"],
        )?;

        let errors = IntCounterVec::new(
            Opts::new("threshold_bot_errors_total", "Failed cycles by error kind"),
            &["kind"],
        )?;

        let actions = IntCounterVec::new(
            Opts::new("threshold_bot_actions_total", "Strategy decisions by action"),
            &["action"],
        )?;

        let last_price = Gauge::new("threshold_bot_last_price", "Last observed asset price")?;

        let position_open = IntGauge::new(
            "threshold_bot_position_open",
            "Whether a position is currently tracked (1=yes, 0=no)",
        )?;

        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(errors.clone()))?;
        registry.register(Box::new(actions.clone()))?;
        registry.register(Box::new(last_price.clone()))?;
        registry.register(Box::new(position_open.clone()))?;

        Ok(Self {
            registry,
            cycles,
            errors,
            actions,
            last_price,
            position_open,
        })
    }

    pub fn record_success(&self, action: Option<Action>) {
        self.cycles.with_label_values(&["ok"]).inc();
        if let Some(action) = action {
            self.actions.with_label_values(&[action.as_str()]).inc();
        }
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        self.cycles.with_label_values(&["error"]).inc();
        self.errors.with_label_values(&[kind.as_str()]).inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder.encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move { metrics.render() }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
