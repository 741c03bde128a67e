// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::providers::fillers::BlobGasFiller;
use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, Bytes, B256, U256},
    providers::fillers::{
        ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
    },
    providers::{Identity, Provider, ProviderBuilder, RootProvider},
    signers::local::PrivateKeySigner,
    sol,
};
use async_trait::async_trait;
use eyre::Result;
use once_cell::sync::Lazy;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

static NONCE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub async fn next_pending_nonce<P>(provider: &P) -> eyre::Result<u64>
where
    P: Provider<Ethereum> + Send + Sync,
{
    let from = provider.get_accounts().await?[0];
    provider
        .get_transaction_count(from)
        .pending()
        .await
        .map_err(Into::into)
}

sol! {
    #[derive(Debug)]
    struct BusinessData {
        string name;
        string description;
        uint256 publicValue1;
        uint256 publicValue2;
        address creator;
        uint256 timestamp;
        bool isVerified;
        uint256 decryptedValue;
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract GiftRegistry {
        function getAllBusinessIds() external view returns (string[] memory ids);
        function getBusinessData(string memory businessId) external view returns (BusinessData memory data);
        function getEncryptedValue(string memory businessId) external view returns (bytes32 handle);
        function createBusinessData(string memory businessId, string memory name, bytes memory encryptedData, bytes memory proof, uint256 publicValue1, uint256 publicValue2, string memory description) external returns (bool success);
        function verifyDecryption(string memory businessId, bytes memory clearValues, bytes memory proof) external returns (bool success);
        function isAvailable() external view returns (bool available);
    }
}

/// Trait for read-only operations on the GiftRegistry contract
#[async_trait]
pub trait RegistryRead {
    /// Get every gift id known to the registry, in enumeration order
    async fn get_all_business_ids(&self) -> Result<Vec<String>>;

    /// Get the public record for a gift
    async fn get_business_data(&self, business_id: &str) -> Result<BusinessData>;

    /// Get the ciphertext handle for a gift's encrypted amount
    async fn get_encrypted_value(&self, business_id: &str) -> Result<B256>;

    /// Read the registry availability flag.
    ///
    /// Note this flag is contract-global, not keyed by gift id.
    async fn is_available(&self) -> Result<bool>;

    /// Get the latest block number
    async fn get_latest_block(&self) -> Result<u64>;
}

/// Trait for write operations on the GiftRegistry contract
#[async_trait]
pub trait RegistryWrite {
    /// Store a new gift record with its encrypted amount and correctness proof.
    /// Resolves once the transaction receipt confirms.
    #[allow(clippy::too_many_arguments)]
    async fn create_business_data(
        &self,
        business_id: &str,
        name: &str,
        encrypted_data: Bytes,
        proof: Bytes,
        public_value1: U256,
        public_value2: U256,
        description: &str,
    ) -> Result<B256>;

    /// Submit the clear values and decryption proof for a gift.
    /// The registry accepts this at most once per handle.
    async fn verify_decryption(
        &self,
        business_id: &str,
        clear_values: Bytes,
        proof: Bytes,
    ) -> Result<B256>;
}

/// Generic type to represent different provider types
pub trait ProviderType: Send {
    type Provider: Provider + Send + Sync + 'static;
}

/// Marker type for read-only provider
#[derive(Clone)]
pub struct ReadOnly;
impl ProviderType for ReadOnly {
    type Provider = RegistryReadOnlyProvider;
}
/// Marker type for read-write provider
#[derive(Clone)]
pub struct ReadWrite;
impl ProviderType for ReadWrite {
    type Provider = RegistryWriteProvider;
}

/// Generic GiftRegistry contract
#[derive(Clone)]
pub struct RegistryContract<T: ProviderType> {
    pub provider: Arc<T::Provider>,
    pub contract_address: Address,
    _marker: PhantomData<T>,
}

impl RegistryContract<ReadWrite> {
    pub async fn new(
        http_rpc_url: &str,
        private_key: &str,
        contract_address: &str,
    ) -> Result<RegistryContract<ReadWrite>> {
        RegistryContractFactory::create_write(http_rpc_url, contract_address, private_key).await
    }

    pub fn get_provider(&self) -> Arc<RegistryWriteProvider> {
        self.provider.clone()
    }

    pub fn address(&self) -> &Address {
        &self.contract_address
    }
}

impl RegistryContract<ReadOnly> {
    pub async fn read_only(
        http_rpc_url: &str,
        contract_address: &str,
    ) -> Result<RegistryContract<ReadOnly>> {
        RegistryContractFactory::create_read(http_rpc_url, contract_address).await
    }

    pub fn get_provider(&self) -> Arc<RegistryReadOnlyProvider> {
        self.provider.clone()
    }

    pub fn address(&self) -> &Address {
        &self.contract_address
    }
}

/// Type alias for read-only provider
pub type RegistryReadOnlyProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
>;

/// Type alias for read-write provider
pub type RegistryWriteProvider = FillProvider<
    JoinFill<
        JoinFill<
            JoinFill<
                Identity,
                JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
            >,
            WalletFiller<EthereumWallet>,
        >,
        NonceFiller,
    >,
    RootProvider<Ethereum>,
    Ethereum,
>;

/// Type aliases for the two contract variants
pub type RegistryReadContract = RegistryContract<ReadOnly>;
pub type RegistryWriteContract = RegistryContract<ReadWrite>;

// Factory for creating contract instances
pub struct RegistryContractFactory;

impl RegistryContractFactory {
    /// Create a write-capable contract
    pub async fn create_write(
        http_rpc_url: &str,
        contract_address: &str,
        private_key: &str,
    ) -> Result<RegistryContract<ReadWrite>> {
        let contract_address = contract_address.parse()?;

        let signer: PrivateKeySigner = private_key.parse()?;
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .with_cached_nonce_management()
            .connect(http_rpc_url)
            .await?;

        Ok(RegistryContract::<ReadWrite> {
            provider: Arc::new(provider),
            contract_address,
            _marker: PhantomData,
        })
    }

    /// Create a read-only contract
    pub async fn create_read(
        http_rpc_url: &str,
        contract_address: &str,
    ) -> Result<RegistryContract<ReadOnly>> {
        let contract_address = contract_address.parse()?;

        let provider = ProviderBuilder::new().connect(http_rpc_url).await?;

        Ok(RegistryContract::<ReadOnly> {
            provider: Arc::new(provider),
            contract_address,
            _marker: PhantomData,
        })
    }
}

// Implement RegistryRead for any RegistryContract regardless of provider type
#[async_trait]
impl<T: Send + Sync> RegistryRead for RegistryContract<T>
where
    T: ProviderType,
{
    async fn get_all_business_ids(&self) -> Result<Vec<String>> {
        let contract = GiftRegistry::new(self.contract_address, &self.provider);
        let ids = contract.getAllBusinessIds().call().await?;
        Ok(ids)
    }

    async fn get_business_data(&self, business_id: &str) -> Result<BusinessData> {
        let contract = GiftRegistry::new(self.contract_address, &self.provider);
        let data = contract
            .getBusinessData(business_id.to_string())
            .call()
            .await?;
        Ok(data)
    }

    async fn get_encrypted_value(&self, business_id: &str) -> Result<B256> {
        let contract = GiftRegistry::new(self.contract_address, &self.provider);
        let handle = contract
            .getEncryptedValue(business_id.to_string())
            .call()
            .await?;
        Ok(handle)
    }

    async fn is_available(&self) -> Result<bool> {
        let contract = GiftRegistry::new(self.contract_address, &self.provider);
        let available = contract.isAvailable().call().await?;
        Ok(available)
    }

    async fn get_latest_block(&self) -> Result<u64> {
        let block = self.provider.get_block_number().await?;
        Ok(block)
    }
}

// Implement RegistryWrite only for contracts with ReadWrite marker
#[async_trait]
impl RegistryWrite for RegistryContract<ReadWrite> {
    async fn create_business_data(
        &self,
        business_id: &str,
        name: &str,
        encrypted_data: Bytes,
        proof: Bytes,
        public_value1: U256,
        public_value2: U256,
        description: &str,
    ) -> Result<B256> {
        let _guard = NONCE_LOCK.lock().await;
        let nonce = next_pending_nonce(&*self.provider).await?;

        let contract = GiftRegistry::new(self.contract_address, &self.provider);
        let builder = contract
            .createBusinessData(
                business_id.to_string(),
                name.to_string(),
                encrypted_data,
                proof,
                public_value1,
                public_value2,
                description.to_string(),
            )
            .nonce(nonce);
        let receipt = builder.send().await?.get_receipt().await?;

        Ok(receipt.transaction_hash)
    }

    async fn verify_decryption(
        &self,
        business_id: &str,
        clear_values: Bytes,
        proof: Bytes,
    ) -> Result<B256> {
        let _guard = NONCE_LOCK.lock().await;
        let nonce = next_pending_nonce(&*self.provider).await?;

        let contract = GiftRegistry::new(self.contract_address, &self.provider);
        let builder = contract
            .verifyDecryption(business_id.to_string(), clear_values, proof)
            .nonce(nonce);
        let receipt = builder.send().await?.get_receipt().await?;

        Ok(receipt.transaction_hash)
    }
}
