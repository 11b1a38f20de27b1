//! Spot Backend Request Types
//!
//! Serialization types for request bodies sent to the backend. The
//! response schemas live with the port in `crate::ports::spot`.

use serde::Serialize;

/// `POST /spot/deposit` and `POST /spot/withdraw` payload.
#[derive(Debug, Clone, Serialize)]
pub struct TokenAmountRequest<'a> {
  pub token: &'a str,
  /// Smallest-unit amount as a decimal string.
  pub amount: &'a str,
}

/// `POST /spot/order` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest<'a> {
  pub base: &'a str,
  pub quote: &'a str,
  pub price: &'a str,
  pub amount: &'a str,
  pub is_buy: bool,
}
