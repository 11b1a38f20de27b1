//! Futures Client - Exchange and Vault Contract Adapter
//!
//! Implements the `FuturesExchange` port. Every mutating call fetches
//! the wallet nonce live, builds a `TransactionRequest` to the target
//! contract, lets the provider's wallet sign it, broadcasts it and
//! returns the hash. Reads go through `eth_call`.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::contracts::{
    ContractAddresses, decode_free_balance_of, decode_get_position, decode_open_position,
    encode_close_position, encode_deposit, encode_free_balance_of, encode_get_position,
    encode_open_position,
};
use super::provider::{ChainProvider, SharedProvider};
use crate::domain::position::{
    AssetId, OnChainPosition, OpenedPosition, PositionId, TxHandle,
};
use crate::error::{ExchangeError, ExchangeResult};
use crate::ports::futures::FuturesExchange;
use crate::ports::price::PriceSource;

/// Futures adapter bound to one wallet and one contract deployment.
pub struct FuturesClient {
    /// Signing provider.
    provider: SharedProvider,
    /// Sender of every transaction.
    wallet: Address,
    /// Exchange / order book / vault.
    addresses: ContractAddresses,
    /// Where `get_price` reads from; `None` means not wired.
    price_source: Option<Arc<dyn PriceSource>>,
}

impl FuturesClient {
    pub fn new(chain: &ChainProvider, addresses: ContractAddresses) -> Self {
        Self::from_provider(chain.inner(), chain.wallet(), addresses)
    }

    /// Build from an already connected provider. `wallet` must be the
    /// account the provider signs for.
    pub fn from_provider(
        provider: SharedProvider,
        wallet: Address,
        addresses: ContractAddresses,
    ) -> Self {
        Self {
            provider,
            wallet,
            addresses,
            price_source: None,
        }
    }

    /// Attach a price source for `get_price`.
    #[must_use]
    pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.price_source = Some(source);
        self
    }

    pub const fn addresses(&self) -> &ContractAddresses {
        &self.addresses
    }

    /// Base request from the trading wallet to `to` carrying `input`.
    fn request(&self, to: Address, input: Bytes) -> TransactionRequest {
        TransactionRequest::default()
            .from(self.wallet)
            .to(to)
            .input(input.into())
    }

    /// Sign and broadcast; nonce is fetched right before sending.
    async fn send(&self, to: Address, input: Bytes) -> ExchangeResult<TxHandle> {
        let nonce = self.provider.get_transaction_count(self.wallet).await?;
        let tx = self.request(to, input).nonce(nonce);

        let pending = self.provider.send_transaction(tx).await?;
        let hash = *pending.tx_hash();

        debug!(nonce, tx = %hash, "Transaction broadcast");
        Ok(hash)
    }

    async fn read(&self, to: Address, input: Bytes) -> ExchangeResult<Bytes> {
        Ok(self.provider.call(&self.request(to, input)).await?)
    }
}

#[async_trait]
impl FuturesExchange for FuturesClient {
    #[instrument(skip(self), fields(token = %token, amount = %amount))]
    async fn deposit_collateral(&self, token: Address, amount: U256) -> ExchangeResult<TxHandle> {
        let calldata = encode_deposit(self.wallet, token, amount);
        let tx = self.send(self.addresses.vault, calldata).await?;
        info!(tx = %tx, "Collateral deposit submitted");
        Ok(tx)
    }

    #[instrument(skip(self), fields(asset = %asset, size = %size, is_long))]
    async fn open_position(
        &self,
        asset: AssetId,
        size: U256,
        is_long: bool,
        collateral_token: Address,
        collateral_amount: U256,
    ) -> ExchangeResult<OpenedPosition> {
        let calldata =
            encode_open_position(asset, size, is_long, collateral_token, collateral_amount);

        // Simulate first: the return value is the id the contract will
        // assign, and a revert surfaces here before anything is signed.
        let simulated = self.read(self.addresses.exchange, calldata.clone()).await?;
        let position_id = decode_open_position(&simulated)?;

        let tx = self.send(self.addresses.exchange, calldata).await?;
        info!(position_id = %position_id, tx = %tx, "Open position submitted");

        Ok(OpenedPosition { position_id, tx })
    }

    #[instrument(skip(self), fields(position_id = %position_id))]
    async fn close_position(
        &self,
        position_id: PositionId,
        collateral_token: Address,
        collateral_amount: U256,
    ) -> ExchangeResult<TxHandle> {
        let calldata = encode_close_position(position_id, collateral_token, collateral_amount);
        let tx = self.send(self.addresses.exchange, calldata).await?;
        info!(tx = %tx, "Close position submitted");
        Ok(tx)
    }

    #[instrument(skip(self), fields(position_id = %position_id))]
    async fn get_position(&self, position_id: PositionId) -> ExchangeResult<OnChainPosition> {
        let data = self
            .read(self.addresses.exchange, encode_get_position(position_id))
            .await?;
        decode_get_position(&data)
    }

    #[instrument(skip(self), fields(token = %token))]
    async fn get_balance(&self, token: Address) -> ExchangeResult<U256> {
        let data = self
            .read(self.addresses.vault, encode_free_balance_of(self.wallet, token))
            .await?;
        decode_free_balance_of(&data)
    }

    async fn get_price(&self, asset: AssetId) -> ExchangeResult<f64> {
        match &self.price_source {
            Some(source) => source.price(asset).await,
            None => Err(ExchangeError::NotImplemented(
                "price source (set PRICE_ORACLE_ROUTER)",
            )),
        }
    }
}
