// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Address, U256};
use chrono::Utc;
use tracing::{info, warn};
use veil_evm_helpers::contracts::{RegistryRead, RegistryWrite};
use veil_relayer_client::EncryptionOracle;

use crate::error::classify_write_error;
use crate::models::{u64_or_zero, GiftRecord};
use crate::{
    DecryptError, DecryptionVerifier, GiftRepository, InMemoryStore, LifecycleError, Session,
    SharedStore, StatusTracker,
};

/// Orchestrates the encrypted-value lifecycle of a gift:
/// created-encrypted, verification-requested, verified-plaintext.
///
/// The manager is the only component that talks to all collaborators. The
/// oracle and the verifier are stateless request/response services, the
/// registry contract is the system of record, and the status tracker is a
/// passive observer. The local snapshot it keeps is display-only; every
/// correctness decision is made against a fresh ledger read.
pub struct GiftLifecycleManager<R, W, O, S>
where
    R: RegistryRead + Send + Sync,
    W: RegistryWrite + Send + Sync,
    O: EncryptionOracle,
    S: Session,
{
    reader: R,
    writer: W,
    oracle: O,
    session: S,
    contract_address: Address,
    store: SharedStore<InMemoryStore>,
    status: StatusTracker,
}

impl<R, W, O, S> GiftLifecycleManager<R, W, O, S>
where
    R: RegistryRead + Send + Sync,
    W: RegistryWrite + Send + Sync,
    O: EncryptionOracle,
    S: Session,
{
    pub fn new(reader: R, writer: W, oracle: O, session: S, contract_address: Address) -> Self {
        Self {
            reader,
            writer,
            oracle,
            session,
            contract_address,
            store: SharedStore::in_mem(),
            status: StatusTracker::new(),
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// Observable status feed for the current operation
    pub fn status(&self) -> &StatusTracker {
        &self.status
    }

    /// Last cached ledger snapshot, for display only
    pub async fn gifts(&self) -> eyre::Result<Vec<GiftRecord>> {
        self.repo().gifts().await
    }

    /// Activity log of creates, decrypts and claims issued by this session
    pub async fn activity(&self) -> eyre::Result<Vec<String>> {
        self.repo().activity().await
    }

    /// Register a gift whose amount is stored encrypted on the ledger.
    ///
    /// The amount is coerced upstream via [`crate::models::coerce_amount`];
    /// here it is already a non-negative integer. An oracle failure aborts
    /// before any ledger write, and a ledger failure leaves the local
    /// snapshot untouched.
    pub async fn create_gift(
        &self,
        name: &str,
        description: &str,
        amount: u64,
    ) -> Result<GiftRecord, LifecycleError> {
        let Some(submitter) = self.session.identity() else {
            self.status.set_error("Please connect wallet first");
            return Err(LifecycleError::NotConnected);
        };

        let business_id = format!("gift-{}", Utc::now().timestamp_millis());
        info!(gift_id = %business_id, "creating gift");
        self.status
            .set_pending("Creating gift with FHE encryption...");

        let encrypted = match self
            .oracle
            .encrypt(self.contract_address, submitter, amount)
            .await
        {
            Ok(encrypted) => encrypted,
            Err(e) => {
                self.status.set_error(format!("Creation failed: {e}"));
                return Err(LifecycleError::EncryptionFailed(e));
            }
        };

        self.status.set_pending("Waiting for transaction...");
        if let Err(e) = self
            .writer
            .create_business_data(
                &business_id,
                name,
                encrypted.encrypted_data,
                encrypted.proof,
                U256::ZERO,
                U256::ZERO,
                description,
            )
            .await
        {
            let kind = classify_write_error(&e);
            self.status.set_error(kind.to_string());
            return Err(kind);
        }

        if let Err(e) = self.repo().push_activity(format!("Created gift: {name}")).await {
            warn!(error = %e, "could not record activity entry");
        }
        self.status.set_success("Gift created successfully!");

        let _ = self.list_gifts().await;

        // Ledger enumeration may lag the confirmed write; fall back to the
        // fields we just submitted.
        let record = match self.repo().find(&business_id).await {
            Ok(Some(record)) => record,
            _ => GiftRecord {
                id: business_id.clone(),
                name: name.to_string(),
                description: description.to_string(),
                encrypted_amount_handle: business_id,
                public_value1: 0,
                public_value2: 0,
                creator: submitter.to_string(),
                created_at: Utc::now().timestamp() as u64,
                is_verified: false,
                decrypted_value: 0,
            },
        };
        Ok(record)
    }

    /// Fetch a fresh snapshot of every gift the ledger knows about.
    ///
    /// A record that fails to load is logged and skipped; a partial list is
    /// a degraded result, not a failure. Ordering is ledger enumeration
    /// order and every call is a full re-fetch.
    pub async fn list_gifts(&self) -> eyre::Result<Vec<GiftRecord>> {
        let ids = match self.reader.get_all_business_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                self.status.set_error("Failed to load gifts");
                return Err(e);
            }
        };

        let mut gifts = Vec::with_capacity(ids.len());
        for id in ids {
            match self.reader.get_business_data(&id).await {
                Ok(data) => gifts.push(GiftRecord::from_business_data(&id, data)),
                Err(e) => {
                    warn!(gift_id = %id, error = %e, "skipping gift record that failed to load")
                }
            }
        }

        self.repo().set_gifts(gifts.clone()).await?;
        Ok(gifts)
    }

    /// Open a gift's encrypted amount under proof.
    ///
    /// Proof submission consumes the ciphertext handle at most once across
    /// all clients, so the manager short-circuits on a fresh ledger read
    /// when the record is already verified, and treats a rejection due to a
    /// concurrent verification as convergence rather than failure.
    pub async fn decrypt_gift(&self, gift_id: &str) -> Result<u64, LifecycleError> {
        if self.session.identity().is_none() {
            self.status.set_error("Please connect wallet first");
            return Err(LifecycleError::NotConnected);
        }

        let data = self
            .reader
            .get_business_data(gift_id)
            .await
            .map_err(|e| self.decryption_failed(e.to_string()))?;

        if data.isVerified {
            // Already opened; skip the oracle round-trip entirely
            let stored = u64_or_zero(data.decryptedValue);
            info!(gift_id, value = stored, "gift already verified");
            self.status.set_success("Gift amount already verified");
            return Ok(stored);
        }

        let handle = self
            .reader
            .get_encrypted_value(gift_id)
            .await
            .map_err(|e| self.decryption_failed(e.to_string()))?;

        self.status.set_pending("Verifying decryption...");
        let verifier = DecryptionVerifier::new(&self.oracle, self.contract_address);
        let outcome = verifier
            .verify(&[handle], |clear_values, proof| {
                self.writer.verify_decryption(gift_id, clear_values, proof)
            })
            .await;

        match outcome {
            Ok(clear_values) => {
                let value = clear_values
                    .get(&handle)
                    .copied()
                    .ok_or_else(|| self.decryption_failed("missing clear value".into()))?;

                let _ = self.list_gifts().await;
                if let Err(e) = self
                    .repo()
                    .push_activity(format!("Decrypted gift: {}", data.name))
                    .await
                {
                    warn!(error = %e, "could not record activity entry");
                }
                self.status
                    .set_success("Gift amount decrypted successfully!");
                Ok(value)
            }
            Err(DecryptError::AlreadyVerified) => {
                // Another client consumed the handle between our read and
                // our submission. Converge on the ledger's value.
                info!(gift_id, "handle consumed by concurrent verification");
                let _ = self.list_gifts().await;
                let refreshed = self
                    .reader
                    .get_business_data(gift_id)
                    .await
                    .map_err(|e| self.decryption_failed(e.to_string()))?;
                self.status.set_success("Gift amount is already verified");
                Ok(u64_or_zero(refreshed.decryptedValue))
            }
            Err(e) => Err(self.decryption_failed(e.to_string())),
        }
    }

    /// Claim an available gift, recording it in the activity log.
    ///
    /// The availability flag the registry exposes is contract-global rather
    /// than keyed by gift id; this mirrors the deployed contract surface.
    pub async fn claim_gift(&self, gift_id: &str) -> Result<(), LifecycleError> {
        if self.session.identity().is_none() {
            self.status.set_error("Please connect wallet first");
            return Err(LifecycleError::NotConnected);
        }

        self.status.set_pending("Claiming gift...");
        match self.reader.is_available().await {
            Ok(true) => {
                let name = self
                    .repo()
                    .find(gift_id)
                    .await
                    .ok()
                    .flatten()
                    .map(|g| g.name)
                    .unwrap_or_else(|| gift_id.to_string());
                if let Err(e) = self
                    .repo()
                    .push_activity(format!("Claimed gift: {name}"))
                    .await
                {
                    warn!(error = %e, "could not record activity entry");
                }
                self.status.set_success("Gift claimed successfully!");
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                self.status.set_error("Claim failed");
                Err(LifecycleError::ClaimFailed(e.to_string()))
            }
        }
    }

    fn repo(&self) -> GiftRepository<InMemoryStore> {
        GiftRepository::new(self.store.clone())
    }

    fn decryption_failed(&self, message: String) -> LifecycleError {
        self.status
            .set_error(format!("Decryption failed: {message}"));
        LifecycleError::DecryptionFailed(message)
    }
}
