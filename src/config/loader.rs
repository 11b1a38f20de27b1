//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.
//! A missing file is not an error: every field has a default.

use std::path::Path;

use alloy::primitives::U256;
use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let config = if path.exists() {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
      .with_context(|| format!("Failed to parse {}", path.display()))?
  } else {
    info!(path = %path.display(), "No config file, using defaults");
    AppConfig::default()
  };

  validate_config(&config)?;

  info!(
    mode = ?config.bot.mode,
    asset = %config.strategy.asset_symbol,
    drop = config.strategy.drop_threshold,
    rise = config.strategy.rise_threshold,
    interval_s = config.driver.interval_seconds,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse a TOML document into an `AppConfig` without validating it.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  Ok(toml::from_str(content)?)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Thresholds in (0, 1)
/// - Integer amounts that parse as U256
/// - Non-zero loop intervals
pub fn validate_config(config: &AppConfig) -> Result<()> {
  let s = &config.strategy;

  anyhow::ensure!(
    !s.asset_symbol.is_empty(),
    "strategy.asset_symbol must not be empty"
  );
  anyhow::ensure!(
    s.drop_threshold > 0.0 && s.drop_threshold < 1.0,
    "strategy.drop_threshold must be in (0, 1), got {}",
    s.drop_threshold
  );
  anyhow::ensure!(
    s.rise_threshold > 0.0 && s.rise_threshold < 1.0,
    "strategy.rise_threshold must be in (0, 1), got {}",
    s.rise_threshold
  );

  for (name, value) in [
    ("strategy.size", &s.size),
    ("strategy.collateral_amount", &s.collateral_amount),
  ] {
    let parsed = U256::from_str_radix(value, 10)
      .with_context(|| format!("{name} must be an unsigned integer, got {value:?}"))?;
    anyhow::ensure!(!parsed.is_zero(), "{name} must be non-zero");
  }

  anyhow::ensure!(
    config.driver.interval_seconds > 0,
    "driver.interval_seconds must be positive"
  );
  anyhow::ensure!(
    config.driver.fallback_seconds > 0,
    "driver.fallback_seconds must be positive"
  );
  anyhow::ensure!(
    config.api.timeout_seconds > 0,
    "api.timeout_seconds must be positive"
  );

  Ok(())
}
