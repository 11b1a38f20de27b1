//! Futures Contract Bindings - ABI Encoding for Exchange, Vault, Oracle
//!
//! Only the method signatures the bot consumes are declared. Calldata
//! is built with the `sol!` generated call structs and sent as raw
//! `TransactionRequest`s through the shared provider.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::domain::position::{AssetId, OnChainPosition, PositionId};
use crate::error::ExchangeResult;

sol! {
    #[derive(Debug)]
    interface IFuturesExchange {
        struct Position {
            address owner;
            bytes32 asset;
            uint256 size;
            bool isLong;
            address collateralToken;
            uint256 collateralAmount;
            uint256 entryPrice;
            bool isOpen;
        }

        function openPosition(
            bytes32 asset,
            uint256 size,
            bool isLong,
            address collateralToken,
            uint256 collateralAmount
        ) external returns (bytes32 positionId);

        function closePosition(
            bytes32 positionId,
            address collateralToken,
            uint256 collateralAmount
        ) external;

        function getPosition(bytes32 positionId) external view returns (Position memory);
    }

    #[derive(Debug)]
    interface IFuturesVault {
        function deposit(address user, address token, uint256 amount) external;

        function freeBalanceOf(address user, address token) external view returns (uint256);
    }

    #[derive(Debug)]
    interface IPriceOracleRouter {
        function getPrice(bytes32 priceId) external view returns (uint256);
    }
}

/// Futures contract addresses loaded from the environment.
///
/// The order book is part of the deployment and kept with the other
/// bindings, but the bot never calls it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    /// FuturesExchange: open / close / getPosition.
    pub exchange: Address,
    /// FuturesOrderBook.
    pub order_book: Address,
    /// FuturesVault: deposit / freeBalanceOf.
    pub vault: Address,
}

pub fn encode_deposit(user: Address, token: Address, amount: U256) -> Bytes {
    IFuturesVault::depositCall {
        user,
        token,
        amount,
    }
    .abi_encode()
    .into()
}

pub fn encode_open_position(
    asset: AssetId,
    size: U256,
    is_long: bool,
    collateral_token: Address,
    collateral_amount: U256,
) -> Bytes {
    IFuturesExchange::openPositionCall {
        asset,
        size,
        isLong: is_long,
        collateralToken: collateral_token,
        collateralAmount: collateral_amount,
    }
    .abi_encode()
    .into()
}

pub fn encode_close_position(
    position_id: PositionId,
    collateral_token: Address,
    collateral_amount: U256,
) -> Bytes {
    IFuturesExchange::closePositionCall {
        positionId: position_id,
        collateralToken: collateral_token,
        collateralAmount: collateral_amount,
    }
    .abi_encode()
    .into()
}

pub fn encode_get_position(position_id: PositionId) -> Bytes {
    IFuturesExchange::getPositionCall {
        positionId: position_id,
    }
    .abi_encode()
    .into()
}

pub fn encode_free_balance_of(user: Address, token: Address) -> Bytes {
    IFuturesVault::freeBalanceOfCall { user, token }
        .abi_encode()
        .into()
}

pub fn encode_get_price(price_id: AssetId) -> Bytes {
    IPriceOracleRouter::getPriceCall { priceId: price_id }
        .abi_encode()
        .into()
}

/// Decode the position id from a static `openPosition` call.
pub fn decode_open_position(data: &[u8]) -> ExchangeResult<PositionId> {
    Ok(IFuturesExchange::openPositionCall::abi_decode_returns(data, true)?.positionId)
}

/// Decode `getPosition`. Assumes the eight-field `Position` layout
/// declared above; any other struct shape is a decode error.
pub fn decode_get_position(data: &[u8]) -> ExchangeResult<OnChainPosition> {
    let p = IFuturesExchange::getPositionCall::abi_decode_returns(data, true)?._0;
    Ok(OnChainPosition {
        owner: p.owner,
        asset: p.asset,
        size: p.size,
        is_long: p.isLong,
        collateral_token: p.collateralToken,
        collateral_amount: p.collateralAmount,
        entry_price: p.entryPrice,
        is_open: p.isOpen,
    })
}

pub fn decode_free_balance_of(data: &[u8]) -> ExchangeResult<U256> {
    Ok(IFuturesVault::freeBalanceOfCall::abi_decode_returns(data, true)?._0)
}

pub fn decode_get_price(data: &[u8]) -> ExchangeResult<U256> {
    Ok(IPriceOracleRouter::getPriceCall::abi_decode_returns(data, true)?._0)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{B256, keccak256};
    use alloy::sol_types::SolValue;

    use super::*;
    use crate::error::ErrorKind;

    fn selector(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    #[test]
    fn test_selectors_match_contract_signatures() {
        let open = encode_open_position(
            B256::ZERO,
            U256::from(1u64),
            true,
            Address::ZERO,
            U256::from(1u64),
        );
        assert_eq!(
            open[..4],
            selector("openPosition(bytes32,uint256,bool,address,uint256)")
        );

        let close = encode_close_position(B256::ZERO, Address::ZERO, U256::ZERO);
        assert_eq!(close[..4], selector("closePosition(bytes32,address,uint256)"));

        let deposit = encode_deposit(Address::ZERO, Address::ZERO, U256::ZERO);
        assert_eq!(deposit[..4], selector("deposit(address,address,uint256)"));

        let balance = encode_free_balance_of(Address::ZERO, Address::ZERO);
        assert_eq!(balance[..4], selector("freeBalanceOf(address,address)"));

        assert_eq!(encode_get_position(B256::ZERO)[..4], selector("getPosition(bytes32)"));
        assert_eq!(encode_get_price(B256::ZERO)[..4], selector("getPrice(bytes32)"));
    }

    #[test]
    fn test_open_position_calldata_length() {
        // selector + five 32-byte words
        let data = encode_open_position(
            B256::repeat_byte(1),
            U256::from(10u64),
            false,
            Address::repeat_byte(2),
            U256::from(3u64),
        );
        assert_eq!(data.len(), 4 + 5 * 32);
    }

    #[test]
    fn test_decode_position_id() {
        let id = B256::repeat_byte(0x42);
        let encoded = id.abi_encode();
        assert_eq!(decode_open_position(&encoded).unwrap(), id);
    }

    #[test]
    fn test_decode_balance() {
        let encoded = U256::from(123_456u64).abi_encode();
        assert_eq!(decode_free_balance_of(&encoded).unwrap(), U256::from(123_456u64));
    }

    #[test]
    fn test_decode_get_position() {
        let on_chain = IFuturesExchange::Position {
            owner: Address::repeat_byte(0xaa),
            asset: keccak256("ETH-USDT"),
            size: U256::from(5u64),
            isLong: true,
            collateralToken: Address::repeat_byte(0xee),
            collateralAmount: U256::from(7u64),
            entryPrice: U256::from(2_000u64),
            isOpen: true,
        };
        let encoded = IFuturesExchange::getPositionCall::abi_encode_returns(&(on_chain,));

        let position = decode_get_position(&encoded).unwrap();
        assert_eq!(position.owner, Address::repeat_byte(0xaa));
        assert!(position.is_long);
        assert!(position.is_open);
        assert_eq!(position.entry_price, U256::from(2_000u64));
    }

    #[test]
    fn test_decode_get_position_other_layout_is_decode_error() {
        // three words instead of eight
        let encoded = (Address::repeat_byte(0xaa), U256::from(5u64), true).abi_encode_params();
        let err = decode_get_position(&encoded).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
    }

    #[test]
    fn test_decode_short_payload_is_decode_error() {
        let err = decode_free_balance_of(&[0u8; 7]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
        assert!(err.to_string().contains("decode"));
    }
}
