//! Spot Strategy - Balance Check and Buy Order
//!
//! Reads the user's balance of the base token, then places a buy order
//! at the configured limit price. Nothing is kept between cycles.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::error::ExchangeResult;
use crate::ports::spot::{SpotExchange, SpotOrderId};

use super::driver::{Cycle, CycleReport};

/// Pair, size and limit price of the order placed each cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotParams {
  pub base: String,
  pub quote: String,
  pub amount: String,
  pub limit_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotOutcome {
  /// Base-token balance before the order.
  pub balance: String,
  /// Id of the order just placed.
  pub order_id: SpotOrderId,
}

pub struct SpotStrategy<S: SpotExchange> {
  exchange: Arc<S>,
  user: String,
  params: SpotParams,
}

impl<S: SpotExchange> SpotStrategy<S> {
  pub fn new(exchange: Arc<S>, user: String, params: SpotParams) -> Self {
    Self {
      exchange,
      user,
      params,
    }
  }

  #[instrument(skip(self), name = "spot_cycle", fields(base = %self.params.base))]
  pub async fn place_buy(&mut self) -> ExchangeResult<SpotOutcome> {
    let p = &self.params;

    let balance = self.exchange.get_balance(&p.base, &self.user).await?;
    info!(token = %balance.token, balance = %balance.balance, "Spot balance");

    let order = self
      .exchange
      .create_order(&p.base, &p.quote, &p.limit_price, &p.amount, true)
      .await?;
    info!(
      order_id = order.order_id,
      amount = %p.amount,
      price = %p.limit_price,
      quote = %p.quote,
      "Created BUY order"
    );

    Ok(SpotOutcome {
      balance: balance.balance,
      order_id: order.order_id,
    })
  }
}

#[async_trait]
impl<S: SpotExchange> Cycle for SpotStrategy<S> {
  async fn run_cycle(&mut self) -> ExchangeResult<CycleReport> {
    self.place_buy().await?;
    Ok(CycleReport::default())
  }
}
