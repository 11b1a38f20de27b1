//! Futures Exchange Port - On-chain Position Interface
//!
//! Defines the trait the strategy uses to reach the futures exchange,
//! order book and vault contracts. Mutating operations return the hash
//! of the broadcast transaction; confirmation is the chain's concern.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::domain::position::{
  AssetId, OnChainPosition, OpenedPosition, PositionId, TxHandle,
};
use crate::error::ExchangeResult;

/// Trait for on-chain futures interactions via alloy-rs.
///
/// Implementors sign with a single held wallet. Nothing is retried and
/// revert reasons are passed through untouched.
#[async_trait]
pub trait FuturesExchange: Send + Sync + 'static {
  /// Deposit collateral into the vault on behalf of the wallet.
  async fn deposit_collateral(&self, token: Address, amount: U256) -> ExchangeResult<TxHandle>;

  /// Open a position and return the id the exchange assigned to it.
  async fn open_position(
    &self,
    asset: AssetId,
    size: U256,
    is_long: bool,
    collateral_token: Address,
    collateral_amount: U256,
  ) -> ExchangeResult<OpenedPosition>;

  /// Close a position previously returned by `open_position`.
  async fn close_position(
    &self,
    position_id: PositionId,
    collateral_token: Address,
    collateral_amount: U256,
  ) -> ExchangeResult<TxHandle>;

  /// Read a position as stored by the exchange contract.
  async fn get_position(&self, position_id: PositionId) -> ExchangeResult<OnChainPosition>;

  /// Free (unlocked) vault balance of the wallet for `token`.
  async fn get_balance(&self, token: Address) -> ExchangeResult<U256>;

  /// Current price of `asset`.
  ///
  /// # Errors
  /// `ExchangeError::NotImplemented` when no price oracle is wired.
  async fn get_price(&self, asset: AssetId) -> ExchangeResult<f64>;
}
