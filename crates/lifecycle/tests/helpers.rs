// helpers.rs
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;
use eyre::{eyre, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use veil_evm_helpers::contracts::{BusinessData, RegistryRead, RegistryWrite};
use veil_lifecycle::{GiftLifecycleManager, StaticSession};
use veil_relayer_client::{DecryptionResult, EncryptedInput, EncryptionOracle, OracleError};

pub const CONTRACT: Address = Address::repeat_byte(0x42);
pub const SUBMITTER: Address = Address::repeat_byte(0x11);

#[derive(Debug, Clone)]
pub struct StoredGift {
    pub name: String,
    pub description: String,
    pub creator: Address,
    pub timestamp: u64,
    pub public_value2: u64,
    pub is_verified: bool,
    pub decrypted_value: u64,
    pub handle: B256,
}

#[derive(Default)]
pub struct LedgerState {
    pub records: Vec<(String, StoredGift)>,
    pub available: bool,
    pub fail_all_ids: bool,
    pub fail_data_for: Option<String>,
    pub fail_available: bool,
    pub fail_create: Option<String>,
    pub fail_verify: Option<String>,
    /// When the injected verify failure is the benign "already verified"
    /// rejection, mark the record verified with this value, as if another
    /// client's submission had won the race.
    pub race_winner_value: Option<u64>,
    pub create_calls: usize,
    pub verify_calls: usize,
}

/// In-memory stand-in for the GiftRegistry contract. Cloning shares the
/// underlying ledger so a reader and a writer view observe the same state.
#[derive(Clone, Default)]
pub struct MockLedger {
    pub state: Arc<Mutex<LedgerState>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_for(id: &str) -> B256 {
        keccak256(id.as_bytes())
    }

    pub fn seed_gift(&self, id: &str, name: &str, is_verified: bool, decrypted_value: u64) {
        self.state.lock().unwrap().records.push((
            id.to_string(),
            StoredGift {
                name: name.to_string(),
                description: String::new(),
                creator: SUBMITTER,
                timestamp: 1_700_000_000,
                public_value2: 0,
                is_verified,
                decrypted_value,
                handle: Self::handle_for(id),
            },
        ));
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn verify_calls(&self) -> usize {
        self.state.lock().unwrap().verify_calls
    }
}

#[async_trait]
impl RegistryRead for MockLedger {
    async fn get_all_business_ids(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_all_ids {
            return Err(eyre!("registry unreachable"));
        }
        Ok(state.records.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn get_business_data(&self, business_id: &str) -> Result<BusinessData> {
        let state = self.state.lock().unwrap();
        if state.fail_data_for.as_deref() == Some(business_id) {
            return Err(eyre!("record fetch failed"));
        }
        let gift = state
            .records
            .iter()
            .find(|(id, _)| id == business_id)
            .map(|(_, gift)| gift)
            .ok_or_else(|| eyre!("unknown gift: {business_id}"))?;
        Ok(BusinessData {
            name: gift.name.clone(),
            description: gift.description.clone(),
            publicValue1: U256::ZERO,
            publicValue2: U256::from(gift.public_value2),
            creator: gift.creator,
            timestamp: U256::from(gift.timestamp),
            isVerified: gift.is_verified,
            decryptedValue: U256::from(gift.decrypted_value),
        })
    }

    async fn get_encrypted_value(&self, business_id: &str) -> Result<B256> {
        let state = self.state.lock().unwrap();
        state
            .records
            .iter()
            .find(|(id, _)| id == business_id)
            .map(|(_, gift)| gift.handle)
            .ok_or_else(|| eyre!("unknown gift: {business_id}"))
    }

    async fn is_available(&self) -> Result<bool> {
        let state = self.state.lock().unwrap();
        if state.fail_available {
            return Err(eyre!("availability read failed"));
        }
        Ok(state.available)
    }

    async fn get_latest_block(&self) -> Result<u64> {
        Ok(0)
    }
}

#[async_trait]
impl RegistryWrite for MockLedger {
    async fn create_business_data(
        &self,
        business_id: &str,
        name: &str,
        _encrypted_data: Bytes,
        _proof: Bytes,
        _public_value1: U256,
        public_value2: U256,
        description: &str,
    ) -> Result<B256> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        if let Some(msg) = &state.fail_create {
            return Err(eyre!("{}", msg.clone()));
        }
        state.records.push((
            business_id.to_string(),
            StoredGift {
                name: name.to_string(),
                description: description.to_string(),
                creator: SUBMITTER,
                timestamp: 1_700_000_000,
                public_value2: u64::try_from(public_value2).unwrap_or(0),
                is_verified: false,
                decrypted_value: 0,
                handle: Self::handle_for(business_id),
            },
        ));
        Ok(B256::ZERO)
    }

    async fn verify_decryption(
        &self,
        business_id: &str,
        clear_values: Bytes,
        _proof: Bytes,
    ) -> Result<B256> {
        let mut state = self.state.lock().unwrap();
        state.verify_calls += 1;
        if let Some(msg) = state.fail_verify.clone() {
            if msg.to_lowercase().contains("already verified") {
                if let Some(value) = state.race_winner_value {
                    if let Some((_, gift)) = state
                        .records
                        .iter_mut()
                        .find(|(id, _)| id == business_id)
                    {
                        gift.is_verified = true;
                        gift.decrypted_value = value;
                    }
                }
            }
            return Err(eyre!("{msg}"));
        }
        let gift = state
            .records
            .iter_mut()
            .find(|(id, _)| id == business_id)
            .map(|(_, gift)| gift)
            .ok_or_else(|| eyre!("unknown gift: {business_id}"))?;
        if gift.is_verified {
            return Err(eyre!("Data already verified"));
        }
        gift.is_verified = true;
        gift.decrypted_value = decode_clear_value(&clear_values);
        Ok(B256::ZERO)
    }
}

/// Scripted encryption oracle with call counters.
#[derive(Clone, Default)]
pub struct MockOracle {
    pub encrypt_calls: Arc<AtomicUsize>,
    pub decrypt_calls: Arc<AtomicUsize>,
    pub fail_encrypt: Arc<AtomicBool>,
    pub clear_value: Arc<Mutex<u64>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clear_value(value: u64) -> Self {
        let oracle = Self::default();
        *oracle.clear_value.lock().unwrap() = value;
        oracle
    }

    pub fn encrypt_count(&self) -> usize {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_count(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EncryptionOracle for MockOracle {
    async fn encrypt(
        &self,
        _contract: Address,
        _submitter: Address,
        value: u64,
    ) -> Result<EncryptedInput, OracleError> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_encrypt.load(Ordering::SeqCst) {
            return Err(OracleError::Unavailable("oracle offline".into()));
        }
        Ok(EncryptedInput {
            encrypted_data: Bytes::from(value.to_be_bytes().to_vec()),
            proof: Bytes::from_static(b"input-proof"),
        })
    }

    async fn request_decryption(
        &self,
        handles: &[B256],
        _contract: Address,
    ) -> Result<DecryptionResult, OracleError> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        let value = *self.clear_value.lock().unwrap();
        let clear_values: HashMap<B256, u64> =
            handles.iter().map(|handle| (*handle, value)).collect();
        Ok(DecryptionResult {
            clear_values,
            encoded_values: encode_clear_value(value),
            proof: Bytes::from_static(b"decryption-proof"),
        })
    }
}

/// ABI-style single-word encoding used between the mock oracle and ledger.
pub fn encode_clear_value(value: u64) -> Bytes {
    Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec())
}

pub fn decode_clear_value(encoded: &Bytes) -> u64 {
    let mut word = [0u8; 32];
    let len = encoded.len().min(32);
    word[32 - len..].copy_from_slice(&encoded[..len]);
    u64::try_from(U256::from_be_bytes(word)).unwrap_or(0)
}

pub type MockManager = GiftLifecycleManager<MockLedger, MockLedger, MockOracle, StaticSession>;

pub fn manager_with(ledger: &MockLedger, oracle: &MockOracle, connected: bool) -> MockManager {
    let session = if connected {
        StaticSession::connected(SUBMITTER)
    } else {
        StaticSession::disconnected()
    };
    GiftLifecycleManager::new(
        ledger.clone(),
        ledger.clone(),
        oracle.clone(),
        session,
        CONTRACT,
    )
}
