//! Configuration Module - TOML Tuning plus Environment Secrets
//!
//! Non-secret tuning (thresholds, sizes, intervals) comes from an
//! optional `config.toml`; every field has a default. Endpoints, the
//! signing key and contract addresses come from the environment
//! (`.env` honoured) via [`Secrets::from_env`]. Both are built once in
//! `main` and passed down explicitly.

pub mod loader;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Bot identity and mode.
  pub bot: BotConfig,
  /// Strategy parameters.
  pub strategy: StrategyConfig,
  /// Driver loop timing.
  pub driver: DriverConfig,
  /// HTTP client settings.
  pub api: ApiConfig,
  /// Metrics and monitoring.
  pub metrics: MetricsConfig,
}

/// Which strategy the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
  /// Threshold strategy on the futures contracts.
  #[default]
  Futures,
  /// Balance check + buy order on the spot backend.
  Spot,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
  /// Human-readable bot name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
  /// Strategy to run.
  pub mode: BotMode,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      name: "threshold-bot".to_string(),
      log_level: default_log_level(),
      mode: BotMode::Futures,
    }
  }
}

/// Strategy parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
  /// Market symbol hashed into the bytes32 asset key.
  pub asset_symbol: String,
  /// Position size in the smallest unit (decimal string, fits U256).
  pub size: String,
  /// Collateral amount in the smallest unit (decimal string).
  pub collateral_amount: String,
  /// Fractional drop that opens a long.
  pub drop_threshold: f64,
  /// Fractional rise that closes it.
  pub rise_threshold: f64,
  /// Decimals of the oracle's fixed-point price.
  pub price_decimals: u8,
  /// Spot: base token symbol.
  pub spot_base: String,
  /// Spot: quote token symbol.
  pub spot_quote: String,
  /// Spot: order amount (decimal string).
  pub spot_amount: String,
  /// Spot: limit price for the buy order (decimal string).
  pub spot_limit_price: String,
}

impl Default for StrategyConfig {
  fn default() -> Self {
    Self {
      asset_symbol: "ETH-USDT".to_string(),
      size: ONE_TOKEN.to_string(),
      collateral_amount: ONE_TOKEN.to_string(),
      drop_threshold: crate::domain::threshold::DEFAULT_THRESHOLD,
      rise_threshold: crate::domain::threshold::DEFAULT_THRESHOLD,
      price_decimals: 8,
      spot_base: "ETH".to_string(),
      spot_quote: "USDT".to_string(),
      spot_amount: ONE_TOKEN.to_string(),
      spot_limit_price: "10000".to_string(),
    }
  }
}

/// 1e18, one whole token at 18 decimals.
const ONE_TOKEN: &str = "1000000000000000000";

/// Driver loop timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
  /// Sleep after a successful cycle (seconds).
  pub interval_seconds: u64,
  /// Sleep after a failed cycle (seconds).
  pub fallback_seconds: u64,
}

impl Default for DriverConfig {
  fn default() -> Self {
    Self {
      interval_seconds: 10,
      fallback_seconds: 5,
    }
  }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Request timeout in seconds.
  pub timeout_seconds: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      timeout_seconds: default_timeout(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  pub enabled: bool,
  /// Metrics server bind address.
  pub bind_address: String,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: "0.0.0.0:9090".to_string(),
    }
  }
}

/// Endpoints, signing key and contract addresses from the environment.
#[derive(Clone)]
pub struct Secrets {
  /// JSON-RPC endpoint.
  pub rpc_url: String,
  /// Hex private key of the trading wallet (never logged).
  pub private_key: String,
  /// FuturesExchange contract.
  pub futures_exchange: Address,
  /// FuturesOrderBook contract.
  pub futures_order_book: Address,
  /// FuturesVault contract.
  pub futures_vault: Address,
  /// Collateral token.
  pub collateral_token: Address,
  /// Optional PriceOracleRouter contract.
  pub price_oracle: Option<Address>,
  /// Spot backend base URL.
  pub backend_url: String,
  /// Spot user address; defaults to the wallet when unset.
  pub user_address: Option<String>,
}

impl std::fmt::Debug for Secrets {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Secrets")
      .field("rpc_url", &self.rpc_url)
      .field("private_key", &"<redacted>")
      .field("futures_exchange", &self.futures_exchange)
      .field("futures_order_book", &self.futures_order_book)
      .field("futures_vault", &self.futures_vault)
      .field("collateral_token", &self.collateral_token)
      .field("price_oracle", &self.price_oracle)
      .field("backend_url", &self.backend_url)
      .finish_non_exhaustive()
  }
}

impl Secrets {
  /// Load from process environment (after `.env` has been applied).
  ///
  /// Required: RPC_URL, PRIVATE_KEY, FUTURES_EXCHANGE,
  /// FUTURES_ORDER_BOOK, FUTURES_VAULT, TOKEN_ETH.
  /// Optional: PRICE_ORACLE_ROUTER, BE_URL, USER_ADDRESS.
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Load through an arbitrary key lookup (tests pass a map).
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let required = |key: &str| -> Result<String> {
      lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .with_context(|| format!("{key} not set"))
    };
    let address = |key: &str| -> Result<Address> {
      required(key)?
        .parse()
        .with_context(|| format!("Invalid address in {key}"))
    };

    let price_oracle = match lookup("PRICE_ORACLE_ROUTER").filter(|v| !v.trim().is_empty()) {
      Some(v) => Some(
        v.trim()
          .parse()
          .context("Invalid address in PRICE_ORACLE_ROUTER")?,
      ),
      None => None,
    };

    Ok(Self {
      rpc_url: required("RPC_URL")?,
      private_key: required("PRIVATE_KEY")?,
      futures_exchange: address("FUTURES_EXCHANGE")?,
      futures_order_book: address("FUTURES_ORDER_BOOK")?,
      futures_vault: address("FUTURES_VAULT")?,
      collateral_token: address("TOKEN_ETH")?,
      price_oracle,
      backend_url: lookup("BE_URL")
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(default_backend_url),
      user_address: lookup("USER_ADDRESS").filter(|v| !v.trim().is_empty()),
    })
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_timeout() -> u64 {
  30
}

fn default_backend_url() -> String {
  "http://localhost:3000".to_string()
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn env() -> HashMap<&'static str, &'static str> {
    HashMap::from([
      ("RPC_URL", "http://127.0.0.1:8545"),
      (
        "PRIVATE_KEY",
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
      ),
      ("FUTURES_EXCHANGE", "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
      ("FUTURES_ORDER_BOOK", "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
      ("FUTURES_VAULT", "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"),
      ("TOKEN_ETH", "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9"),
    ])
  }

  #[test]
  fn test_secrets_from_lookup_defaults_backend_url() {
    let vars = env();
    let secrets = Secrets::from_lookup(|k| vars.get(k).map(ToString::to_string)).unwrap();
    assert_eq!(secrets.backend_url, "http://localhost:3000");
    assert!(secrets.price_oracle.is_none());
    assert!(secrets.user_address.is_none());
  }

  #[test]
  fn test_secrets_missing_key_fails() {
    let mut vars = env();
    vars.remove("FUTURES_VAULT");
    let err = Secrets::from_lookup(|k| vars.get(k).map(ToString::to_string)).unwrap_err();
    assert!(err.to_string().contains("FUTURES_VAULT"));
  }

  #[test]
  fn test_secrets_bad_address_fails() {
    let mut vars = env();
    vars.insert("TOKEN_ETH", "not-an-address");
    assert!(Secrets::from_lookup(|k| vars.get(k).map(ToString::to_string)).is_err());
  }

  #[test]
  fn test_debug_redacts_private_key() {
    let vars = env();
    let secrets = Secrets::from_lookup(|k| vars.get(k).map(ToString::to_string)).unwrap();
    let printed = format!("{secrets:?}");
    assert!(!printed.contains("ac0974bec39a17e3"));
    assert!(printed.contains("<redacted>"));
  }
}
