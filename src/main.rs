//! Threshold Bot — Entry Point
//!
//! Initializes configuration, logging, the exchange adapter for the
//! configured mode, and the driver loop. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Apply `.env`, load config.toml (defaults if absent) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Load RPC / key / contract addresses from env
//! 4. Spawn Prometheus metrics server (if enabled)
//! 5. Futures mode: connect signing provider, build FuturesClient
//!    (+ oracle price source when configured) and FuturesStrategy
//!    Spot mode: build BackendClient, SpotClient and SpotStrategy
//! 6. Spawn the driver loop
//! 7. Wait for SIGINT → stop driver after its current cycle → exit 0;
//!    if the driver task ends first, exit non-zero

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use threshold_bot::adapters::api::{BackendClient, BackendClientConfig, SpotClient};
use threshold_bot::adapters::chain::{
  ChainProvider, ContractAddresses, FuturesClient, OraclePriceSource,
};
use threshold_bot::adapters::metrics::MetricsRegistry;
use threshold_bot::config::{self, AppConfig, BotMode, Secrets};
use threshold_bot::domain::position::asset_id;
use threshold_bot::domain::threshold::ThresholdRule;
use threshold_bot::usecases::{
  Cycle, Driver, DriverExit, DriverTiming, FuturesStrategy, SpotParams, SpotStrategy,
  TradeParams, wait_for_exit,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  // ── 1. Load configuration ───────────────────────────────
  dotenvy::dotenv().ok();
  let config = config::loader::load_config("config.toml")
    .context("Failed to load configuration")?;

  // ── 2. Initialize structured JSON logging ───────────────
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.bot.log_level)),
    )
    .json()
    .init();

  info!(
    name = %config.bot.name,
    version = env!("CARGO_PKG_VERSION"),
    mode = ?config.bot.mode,
    "Starting threshold bot"
  );

  // ── 3. Secrets and endpoints from env ───────────────────
  let secrets = Secrets::from_env().context("Failed to load environment")?;

  let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

  // ── 4. Metrics server ───────────────────────────────────
  let metrics = Arc::new(MetricsRegistry::new().context("Failed to create metrics")?);
  let metrics_handle = if config.metrics.enabled {
    let server = Arc::clone(&metrics);
    let bind = config.metrics.bind_address.clone();
    let rx = shutdown_tx.subscribe();
    Some(tokio::spawn(async move {
      if let Err(e) = server.serve(bind, rx).await {
        error!(error = %e, "Metrics server failed");
      }
    }))
  } else {
    None
  };

  // ── 5/6. Build the strategy and spawn the driver ────────
  let timing = DriverTiming {
    interval: Duration::from_secs(config.driver.interval_seconds),
    fallback: Duration::from_secs(config.driver.fallback_seconds),
  };
  let driver_rx = shutdown_tx.subscribe();

  let mut driver_handle = match config.bot.mode {
    BotMode::Futures => {
      let strategy = build_futures_strategy(&config, &secrets).await?;
      spawn_driver(strategy, timing, Arc::clone(&metrics), driver_rx)
    }
    BotMode::Spot => {
      let strategy = build_spot_strategy(&config, &secrets)?;
      spawn_driver(strategy, timing, Arc::clone(&metrics), driver_rx)
    }
  };

  info!("Driver running");

  // ── 7. Wait for SIGINT, or the driver dying on its own ──
  let sigint = async {
    if let Err(e) = signal::ctrl_c().await {
      error!(error = %e, "Failed to listen for SIGINT");
      std::future::pending::<()>().await;
    }
  };

  let exit = wait_for_exit(&mut driver_handle, sigint).await;
  let _ = shutdown_tx.send(());

  match exit {
    DriverExit::Shutdown => {
      info!("SIGINT received, initiating shutdown");
      // The driver only observes shutdown between cycles.
      if tokio::time::timeout(Duration::from_secs(30), driver_handle)
        .await
        .is_err()
      {
        warn!("Driver did not stop within 30s");
      }
    }
    DriverExit::Stopped => error!("Driver stopped unexpectedly"),
    DriverExit::Crashed(ref reason) => error!(reason = %reason, "Driver task crashed"),
  }

  if let Some(handle) = metrics_handle {
    handle.abort();
  }

  if exit != DriverExit::Shutdown {
    anyhow::bail!("driver exited before shutdown was requested");
  }

  info!("Shutdown complete");
  Ok(())
}

async fn build_futures_strategy(
  config: &AppConfig,
  secrets: &Secrets,
) -> Result<FuturesStrategy<FuturesClient>> {
  let chain = ChainProvider::connect(&secrets.rpc_url, &secrets.private_key).await?;

  let addresses = ContractAddresses {
    exchange: secrets.futures_exchange,
    order_book: secrets.futures_order_book,
    vault: secrets.futures_vault,
  };
  let mut client = FuturesClient::new(&chain, addresses);

  match secrets.price_oracle {
    Some(router) => {
      info!(router = %router, "Using on-chain price oracle");
      client = client.with_price_source(Arc::new(OraclePriceSource::new(
        chain.inner(),
        router,
        config.strategy.price_decimals,
      )));
    }
    None => warn!("PRICE_ORACLE_ROUTER not set: price lookups will fail every cycle"),
  }

  let s = &config.strategy;
  let params = TradeParams {
    asset: asset_id(&s.asset_symbol),
    size: U256::from_str_radix(&s.size, 10).context("Invalid strategy.size")?,
    collateral_token: secrets.collateral_token,
    collateral_amount: U256::from_str_radix(&s.collateral_amount, 10)
      .context("Invalid strategy.collateral_amount")?,
  };

  info!(
    asset = %s.asset_symbol,
    asset_id = %params.asset,
    collateral = %params.collateral_token,
    "Futures strategy configured"
  );

  Ok(FuturesStrategy::new(
    Arc::new(client),
    ThresholdRule::new(s.drop_threshold, s.rise_threshold),
    params,
  ))
}

fn build_spot_strategy(config: &AppConfig, secrets: &Secrets) -> Result<SpotStrategy<SpotClient>> {
  let backend = Arc::new(BackendClient::new(BackendClientConfig {
    base_url: secrets.backend_url.clone(),
    timeout: Duration::from_secs(config.api.timeout_seconds),
  })?);

  let user = match &secrets.user_address {
    Some(user) => user.clone(),
    None => {
      let signer: PrivateKeySigner = secrets
        .private_key
        .trim()
        .parse()
        .context("Invalid PRIVATE_KEY")?;
      signer.address().to_string()
    }
  };

  let s = &config.strategy;
  info!(backend = %backend.base_url(), user = %user, "Spot strategy configured");

  Ok(SpotStrategy::new(
    Arc::new(SpotClient::new(backend)),
    user,
    SpotParams {
      base: s.spot_base.clone(),
      quote: s.spot_quote.clone(),
      amount: s.spot_amount.clone(),
      limit_price: s.spot_limit_price.clone(),
    },
  ))
}

fn spawn_driver<C: Cycle + 'static>(
  cycle: C,
  timing: DriverTiming,
  metrics: Arc<MetricsRegistry>,
  shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
  let driver = Driver::new(cycle, timing).with_metrics(metrics);
  tokio::spawn(async move {
    driver.run(shutdown_rx).await;
    info!("Driver stopped");
  })
}
