// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Address, Bytes, B256};
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;
use veil_relayer_client::{EncryptionOracle, OracleError};

#[derive(Error, Debug)]
pub enum DecryptError {
    /// The oracle denied the request or produced a malformed proof
    #[error("Oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// The ledger rejected the submission because the handle was already
    /// consumed by a prior verification. Benign from the protocol's point of
    /// view: the plaintext is now on the ledger.
    #[error("Data already verified")]
    AlreadyVerified,

    /// Any other ledger rejection
    #[error("Ledger rejected decryption proof: {0}")]
    Ledger(String),
}

/// Drives one decryption round: oracle opening, proof submission, and the
/// handle-to-plaintext mapping after the ledger confirms.
pub struct DecryptionVerifier<'a, O: EncryptionOracle> {
    oracle: &'a O,
    contract: Address,
}

impl<'a, O: EncryptionOracle> DecryptionVerifier<'a, O> {
    pub fn new(oracle: &'a O, contract: Address) -> Self {
        Self { oracle, contract }
    }

    /// Open `handles` and submit the resulting proof to the ledger via
    /// `submit_to_ledger`.
    ///
    /// The callback is invoked exactly once per call (enforced by `FnOnce`)
    /// with the ABI-encoded clear values and the decryption proof. The
    /// mapping of handle to clear integer is returned only after the ledger
    /// confirms the submission.
    pub async fn verify<F, Fut>(
        &self,
        handles: &[B256],
        submit_to_ledger: F,
    ) -> Result<HashMap<B256, u64>, DecryptError>
    where
        F: FnOnce(Bytes, Bytes) -> Fut + Send,
        Fut: Future<Output = eyre::Result<B256>> + Send,
    {
        let result = self
            .oracle
            .request_decryption(handles, self.contract)
            .await?;

        match submit_to_ledger(result.encoded_values.clone(), result.proof.clone()).await {
            Ok(_tx_hash) => Ok(result.clear_values),
            Err(e) => {
                let message = format!("{e:#}");
                if message.to_lowercase().contains("already verified") {
                    Err(DecryptError::AlreadyVerified)
                } else {
                    Err(DecryptError::Ledger(message))
                }
            }
        }
    }
}
