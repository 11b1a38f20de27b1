//! Core futures position types.
//!
//! A position is identified by an opaque 32-byte id assigned by the
//! exchange contract at open time. The bot tracks at most one of them,
//! in memory only; nothing here is reconciled against chain state.
//!
//! Amounts are raw `U256` integers in the token's smallest unit.

use alloy::primitives::{Address, B256, U256, keccak256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque position identifier returned by `openPosition`.
pub type PositionId = B256;

/// Asset key as the exchange contract expects it (bytes32).
pub type AssetId = B256;

/// Hash of a broadcast transaction. Not a confirmation of execution.
pub type TxHandle = B256;

/// Derive the bytes32 asset key for a market symbol such as `"ETH-USDT"`.
pub fn asset_id(symbol: &str) -> AssetId {
    keccak256(symbol.as_bytes())
}

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Maps to the contract's `isLong` flag.
    pub const fn is_long(self) -> bool {
        matches!(self, Self::Long)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// Parameters of a position the strategy wants opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRequest {
    /// Asset key.
    pub asset: AssetId,
    /// Size in the smallest on-chain unit.
    pub size: U256,
    /// Long or short.
    pub direction: Direction,
    /// Token locked as collateral.
    pub collateral_token: Address,
    /// Collateral amount in the token's smallest unit.
    pub collateral_amount: U256,
}

/// Result of a successful open: the assigned id and the broadcast tx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedPosition {
    /// Position id the contract assigned.
    pub position_id: PositionId,
    /// Transaction that opened it.
    pub tx: TxHandle,
}

/// A position the strategy currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Exchange-assigned id.
    pub id: PositionId,
    /// Asset key.
    pub asset: AssetId,
    /// Size in the smallest on-chain unit.
    pub size: U256,
    /// Long or short.
    pub direction: Direction,
    /// Collateral token.
    pub collateral_token: Address,
    /// Collateral amount.
    pub collateral_amount: U256,
    /// When the bot recorded the open. Diagnostic only.
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Build the tracked position from the request that produced it.
    pub fn from_request(id: PositionId, request: &PositionRequest) -> Self {
        Self {
            id,
            asset: request.asset,
            size: request.size,
            direction: request.direction,
            collateral_token: request.collateral_token,
            collateral_amount: request.collateral_amount,
            opened_at: Utc::now(),
        }
    }
}

/// Decoded `getPosition` result as stored by the exchange contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnChainPosition {
    pub owner: Address,
    pub asset: AssetId,
    pub size: U256,
    pub is_long: bool,
    pub collateral_token: Address,
    pub collateral_amount: U256,
    pub entry_price: U256,
    pub is_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_is_keccak_of_symbol() {
        let id = asset_id("ETH-USDT");
        assert_eq!(id, keccak256(b"ETH-USDT"));
        assert_ne!(id, asset_id("BTC-USDT"));
    }

    #[test]
    fn test_position_from_request_copies_fields() {
        let request = PositionRequest {
            asset: asset_id("ETH-USDT"),
            size: U256::from(10u64).pow(U256::from(18u64)),
            direction: Direction::Long,
            collateral_token: Address::repeat_byte(0x11),
            collateral_amount: U256::from(5u64),
        };
        let id = B256::repeat_byte(0xab);
        let position = Position::from_request(id, &request);

        assert_eq!(position.id, id);
        assert_eq!(position.size, request.size);
        assert!(position.direction.is_long());
        assert_eq!(position.collateral_token, request.collateral_token);
    }
}
