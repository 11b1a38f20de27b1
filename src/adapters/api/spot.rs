//! Spot Client - Backend Vault and Order Book Adapter
//!
//! Implements the `SpotExchange` port on top of the shared
//! `BackendClient`. One request per call, typed response per endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::client::BackendClient;
use super::types::{CreateOrderRequest, TokenAmountRequest};
use crate::error::ExchangeResult;
use crate::ports::spot::{
  BalanceResponse, OrderIdResponse, SpotExchange, SpotOrder, SpotOrderId, TxHashResponse,
};

/// Spot adapter backed by the shared HTTP client.
pub struct SpotClient {
  client: Arc<BackendClient>,
}

impl SpotClient {
  pub fn new(client: Arc<BackendClient>) -> Self {
    Self { client }
  }
}

#[async_trait]
impl SpotExchange for SpotClient {
  #[instrument(skip(self))]
  async fn get_balance(&self, token: &str, user: &str) -> ExchangeResult<BalanceResponse> {
    let mut resp: BalanceResponse = self
      .client
      .get("/spot/balance", &[("token", token), ("user", user)])
      .await?;
    if resp.token.is_empty() {
      resp.token = token.to_string();
    }
    Ok(resp)
  }

  #[instrument(skip(self))]
  async fn deposit(&self, token: &str, amount: &str) -> ExchangeResult<TxHashResponse> {
    let body = TokenAmountRequest { token, amount };
    let resp: TxHashResponse = self.client.post("/spot/deposit", Some(&body)).await?;
    info!(tx = %resp.hash, "Spot deposit submitted");
    Ok(resp)
  }

  #[instrument(skip(self))]
  async fn withdraw(&self, token: &str, amount: &str) -> ExchangeResult<TxHashResponse> {
    let body = TokenAmountRequest { token, amount };
    let resp: TxHashResponse = self.client.post("/spot/withdraw", Some(&body)).await?;
    info!(tx = %resp.hash, "Spot withdraw submitted");
    Ok(resp)
  }

  #[instrument(skip(self))]
  async fn create_order(
    &self,
    base: &str,
    quote: &str,
    price: &str,
    amount: &str,
    is_buy: bool,
  ) -> ExchangeResult<OrderIdResponse> {
    let body = CreateOrderRequest {
      base,
      quote,
      price,
      amount,
      is_buy,
    };
    let resp: OrderIdResponse = self.client.post("/spot/order", Some(&body)).await?;
    info!(order_id = resp.order_id, "Spot order created");
    Ok(resp)
  }

  #[instrument(skip(self))]
  async fn cancel_order(&self, order_id: SpotOrderId) -> ExchangeResult<TxHashResponse> {
    let path = format!("/spot/cancel/{order_id}");
    self.client.post::<(), _>(&path, None).await
  }

  #[instrument(skip(self))]
  async fn get_order(&self, order_id: SpotOrderId) -> ExchangeResult<SpotOrder> {
    let path = format!("/spot/order/{order_id}");
    self.client.get(&path, &[]).await
  }
}
