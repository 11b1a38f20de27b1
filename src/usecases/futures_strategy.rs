//! Futures Strategy - Threshold State Machine
//!
//! Holds the last observed price and at most one open position.
//! Each cycle:
//! 1. Fetch the asset price from the exchange adapter
//! 2. Decide open / close / hold against the previous sample
//! 3. Invoke the adapter for open or close
//! 4. Record the new position state and the price
//!
//! Any adapter error aborts the cycle before step 4, so a failed
//! cycle leaves the state exactly as it was.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::domain::position::{AssetId, Direction, Position, PositionId, PositionRequest};
use crate::domain::threshold::{Action, ThresholdRule};
use crate::error::{ExchangeError, ExchangeResult};
use crate::ports::futures::FuturesExchange;

use super::driver::{Cycle, CycleReport};

/// What the strategy trades each time it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeParams {
  /// Asset key (keccak of the market symbol).
  pub asset: AssetId,
  /// Position size in the smallest unit.
  pub size: U256,
  /// Token posted as collateral.
  pub collateral_token: Address,
  /// Collateral amount in the smallest unit.
  pub collateral_amount: U256,
}

/// Result of one strategy evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
  /// Price observed this cycle.
  pub price: f64,
  /// Action taken.
  pub action: Action,
}

/// Single-asset, single-position threshold strategy.
pub struct FuturesStrategy<E: FuturesExchange> {
  exchange: Arc<E>,
  rule: ThresholdRule,
  params: TradeParams,
  /// Price seen on the previous successful cycle.
  last_price: Option<f64>,
  /// The one position we track, if any.
  position: Option<Position>,
}

impl<E: FuturesExchange> FuturesStrategy<E> {
  pub fn new(exchange: Arc<E>, rule: ThresholdRule, params: TradeParams) -> Self {
    Self {
      exchange,
      rule,
      params,
      last_price: None,
      position: None,
    }
  }

  pub const fn last_price(&self) -> Option<f64> {
    self.last_price
  }

  pub const fn position(&self) -> Option<&Position> {
    self.position.as_ref()
  }

  pub fn position_id(&self) -> Option<PositionId> {
    self.position.as_ref().map(|p| p.id)
  }

  /// Run one evaluation. Errors propagate; state is only mutated
  /// once every adapter call of the cycle has succeeded.
  #[instrument(skip(self), name = "futures_cycle")]
  pub async fn evaluate(&mut self) -> ExchangeResult<CycleOutcome> {
    let price = self.exchange.get_price(self.params.asset).await?;
    if !price.is_finite() || price <= 0.0 {
      return Err(ExchangeError::Application(format!(
        "price source returned unusable value {price}"
      )));
    }

    info!(price, last_price = ?self.last_price, "Current price");

    let action = self
      .rule
      .decide(price, self.last_price, self.position.is_some());

    match action {
      Action::Open => self.open_long().await?,
      Action::Close => self.close().await?,
      Action::Hold => debug!("Holding"),
    }

    self.last_price = Some(price);
    Ok(CycleOutcome { price, action })
  }

  async fn open_long(&mut self) -> ExchangeResult<()> {
    let request = PositionRequest {
      asset: self.params.asset,
      size: self.params.size,
      direction: Direction::Long,
      collateral_token: self.params.collateral_token,
      collateral_amount: self.params.collateral_amount,
    };

    info!(size = %request.size, "Opening long position");
    let opened = self
      .exchange
      .open_position(
        request.asset,
        request.size,
        request.direction.is_long(),
        request.collateral_token,
        request.collateral_amount,
      )
      .await?;

    info!(
      position_id = %opened.position_id,
      tx = %opened.tx,
      "Position opened"
    );
    self.position = Some(Position::from_request(opened.position_id, &request));
    Ok(())
  }

  async fn close(&mut self) -> ExchangeResult<()> {
    let position = self
      .position
      .as_ref()
      .ok_or_else(|| ExchangeError::Logic("close decided with no open position".into()))?;

    info!(position_id = %position.id, "Closing position");
    let tx = self
      .exchange
      .close_position(
        position.id,
        position.collateral_token,
        position.collateral_amount,
      )
      .await?;

    info!(position_id = %position.id, tx = %tx, "Position closed");
    self.position = None;
    Ok(())
  }
}

#[async_trait]
impl<E: FuturesExchange> Cycle for FuturesStrategy<E> {
  async fn run_cycle(&mut self) -> ExchangeResult<CycleReport> {
    let outcome = self.evaluate().await?;
    Ok(CycleReport {
      price: Some(outcome.price),
      action: Some(outcome.action),
      position_open: self.position.is_some(),
    })
  }
}
