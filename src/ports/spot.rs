//! Spot Exchange Port - Backend REST Interface
//!
//! Defines the trait for the spot vault and order book exposed by the
//! HTTP backend, together with the typed response bodies each endpoint
//! must decode into.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ExchangeResult;

/// Backend order identifier.
pub type SpotOrderId = u64;

/// `GET /spot/balance` body.
///
/// Accepts the backend's bare decimal string (`"1500"`) or the object
/// form `{"token": .., "balance": ..}`. A bare body leaves `token`
/// empty; the adapter fills it from the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BalanceWire")]
pub struct BalanceResponse {
  /// Token symbol or address echoed back.
  pub token: String,
  /// Balance in the token's smallest unit, as a decimal string.
  pub balance: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BalanceWire {
  Bare(String),
  Object {
    #[serde(default)]
    token: String,
    balance: String,
  },
}

impl From<BalanceWire> for BalanceResponse {
  fn from(wire: BalanceWire) -> Self {
    match wire {
      BalanceWire::Bare(balance) => Self {
        token: String::new(),
        balance,
      },
      BalanceWire::Object { token, balance } => Self { token, balance },
    }
  }
}

/// `POST /spot/deposit`, `/spot/withdraw` and `/spot/cancel/{id}` body.
///
/// Bare hash string (`"0xabc.."`) or `{"hash": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TxHashWire")]
pub struct TxHashResponse {
  /// Hash of the transaction the backend broadcast.
  pub hash: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TxHashWire {
  Bare(String),
  Object { hash: String },
}

impl From<TxHashWire> for TxHashResponse {
  fn from(wire: TxHashWire) -> Self {
    match wire {
      TxHashWire::Bare(hash) | TxHashWire::Object { hash } => Self { hash },
    }
  }
}

/// `POST /spot/order` body.
///
/// Bare number (`7`) or `{"orderId": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OrderIdWire")]
pub struct OrderIdResponse {
  /// Id assigned by the on-chain order book.
  #[serde(rename = "orderId")]
  pub order_id: SpotOrderId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderIdWire {
  Bare(SpotOrderId),
  Object {
    #[serde(rename = "orderId")]
    order_id: SpotOrderId,
  },
}

impl From<OrderIdWire> for OrderIdResponse {
  fn from(wire: OrderIdWire) -> Self {
    match wire {
      OrderIdWire::Bare(order_id) | OrderIdWire::Object { order_id } => Self { order_id },
    }
  }
}

/// `GET /spot/order/{id}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotOrder {
  pub id: SpotOrderId,
  pub user: String,
  pub base: String,
  pub quote: String,
  pub price: String,
  pub amount: String,
  #[serde(default)]
  pub filled: String,
  pub is_buy: bool,
  pub active: bool,
}

/// Trait for the spot backend.
///
/// Amounts and prices travel as decimal strings, as the backend
/// expects them; the adapter does not interpret them.
#[async_trait]
pub trait SpotExchange: Send + Sync + 'static {
  async fn get_balance(&self, token: &str, user: &str) -> ExchangeResult<BalanceResponse>;

  async fn deposit(&self, token: &str, amount: &str) -> ExchangeResult<TxHashResponse>;

  async fn withdraw(&self, token: &str, amount: &str) -> ExchangeResult<TxHashResponse>;

  /// Place a limit order; returns the backend-assigned id.
  async fn create_order(
    &self,
    base: &str,
    quote: &str,
    price: &str,
    amount: &str,
    is_buy: bool,
  ) -> ExchangeResult<OrderIdResponse>;

  async fn cancel_order(&self, order_id: SpotOrderId) -> ExchangeResult<TxHashResponse>;

  async fn get_order(&self, order_id: SpotOrderId) -> ExchangeResult<SpotOrder>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_balance_accepts_bare_string_and_object() {
    let bare: BalanceResponse = serde_json::from_str(r#""1500""#).unwrap();
    assert_eq!(bare.balance, "1500");
    assert!(bare.token.is_empty());

    let object: BalanceResponse =
      serde_json::from_str(r#"{"token":"ETH","balance":"42"}"#).unwrap();
    assert_eq!(object.token, "ETH");
    assert_eq!(object.balance, "42");
  }

  #[test]
  fn test_tx_hash_accepts_bare_string_and_object() {
    let bare: TxHashResponse = serde_json::from_str(r#""0xabc""#).unwrap();
    let object: TxHashResponse = serde_json::from_str(r#"{"hash":"0xabc"}"#).unwrap();
    assert_eq!(bare, object);
  }

  #[test]
  fn test_order_id_accepts_bare_number_and_object() {
    let bare: OrderIdResponse = serde_json::from_str("7").unwrap();
    let object: OrderIdResponse = serde_json::from_str(r#"{"orderId":7}"#).unwrap();
    assert_eq!(bare.order_id, 7);
    assert_eq!(bare, object);
  }

  #[test]
  fn test_wrong_shapes_still_rejected() {
    assert!(serde_json::from_str::<OrderIdResponse>(r#""seven""#).is_err());
    assert!(serde_json::from_str::<TxHashResponse>("12").is_err());
    assert!(serde_json::from_str::<BalanceResponse>(r#"{"amount":"1"}"#).is_err());
  }
}
