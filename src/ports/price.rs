//! Price Source Port
//!
//! Where the futures adapter gets its prices from. Kept separate so a
//! deployment without an oracle fails loudly instead of trading on a
//! made-up number.

use async_trait::async_trait;

use crate::domain::position::AssetId;
use crate::error::ExchangeResult;

#[async_trait]
pub trait PriceSource: Send + Sync + 'static {
  /// Latest price for `asset`, scaled to a float.
  async fn price(&self, asset: AssetId) -> ExchangeResult<f64>;
}
