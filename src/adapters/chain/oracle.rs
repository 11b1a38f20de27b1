//! Price Oracle Router - On-chain Price Source
//!
//! Implements the `PriceSource` port by calling
//! `getPrice(bytes32)` on the configured oracle router. Prices come
//! back as fixed-point integers and are scaled by `decimals`.

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::contracts::{decode_get_price, encode_get_price};
use super::provider::SharedProvider;
use crate::domain::position::AssetId;
use crate::error::{ExchangeError, ExchangeResult};
use crate::ports::price::PriceSource;

pub struct OraclePriceSource {
    provider: SharedProvider,
    router: Address,
    decimals: u8,
}

impl OraclePriceSource {
    pub fn new(provider: SharedProvider, router: Address, decimals: u8) -> Self {
        Self {
            provider,
            router,
            decimals,
        }
    }
}

/// Scale a fixed-point oracle answer to a float.
pub fn scale_price(raw: U256, decimals: u8) -> ExchangeResult<f64> {
    let raw = u128::try_from(raw)
        .map_err(|_| ExchangeError::decode("oracle price", format!("{raw} exceeds u128")))?;
    #[allow(clippy::cast_precision_loss)]
    let value = raw as f64 / 10f64.powi(i32::from(decimals));
    Ok(value)
}

#[async_trait]
impl PriceSource for OraclePriceSource {
    #[instrument(skip(self), fields(asset = %asset))]
    async fn price(&self, asset: AssetId) -> ExchangeResult<f64> {
        let tx = TransactionRequest::default()
            .to(self.router)
            .input(encode_get_price(asset).into());

        let data = self.provider.call(&tx).await?;
        let raw = decode_get_price(&data)?;
        let price = scale_price(raw, self.decimals)?;

        debug!(raw = %raw, price, "Oracle price");
        Ok(price)
    }
}
