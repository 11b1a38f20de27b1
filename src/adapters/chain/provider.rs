//! Signing RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Builds the single provider every chain adapter shares: HTTP
//! transport, recommended fillers (gas, chain id), and the trading
//! wallet for signing. Validates RPC connectivity at startup.
//!
//! In alloy 0.9 the filler stack produces a deeply nested generic type.
//! We store it as a type-erased `dyn Provider` over `BoxTransport`,
//! which `on_builtin` gives us.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use tracing::{info, instrument};

/// Type-erased provider shared by all chain adapters.
pub type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Connected, signing provider plus the wallet it signs for.
pub struct ChainProvider {
    /// Signing provider (type-erased).
    provider: SharedProvider,
    /// Address derived from the private key.
    wallet: Address,
    /// Chain id reported by the node at connect time.
    chain_id: u64,
}

impl ChainProvider {
    /// Connect to the RPC endpoint and attach the signing wallet.
    ///
    /// The key is parsed here and never stored outside the signer.
    #[instrument(skip_all)]
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .context("Invalid PRIVATE_KEY")?;
        let wallet = signer.address();

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::from(signer))
            .on_builtin(rpc_url)
            .await
            .context("Failed to connect to RPC endpoint")?;

        let provider: SharedProvider = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        info!(chain_id, wallet = %wallet, "Connected to RPC");

        Ok(Self {
            provider,
            wallet,
            chain_id,
        })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> SharedProvider {
        Arc::clone(&self.provider)
    }

    /// Address transactions are sent from.
    pub const fn wallet(&self) -> Address {
        self.wallet
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
