// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error;
use veil_relayer_client::OracleError;

/// Failures surfaced by the lifecycle manager's mutating operations.
///
/// None of these is fatal: each resolves to an error status the caller can
/// retry from. The benign "already verified" ledger rejection is recovered
/// inside `decrypt_gift` and never appears here; see
/// [`DecryptError::AlreadyVerified`](crate::DecryptError::AlreadyVerified).
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// No identity available; precondition for every mutating operation
    #[error("Please connect wallet first")]
    NotConnected,

    /// Oracle-side failure; nothing was written to the ledger
    #[error("Encryption failed: {0}")]
    EncryptionFailed(#[from] OracleError),

    /// The user declined to sign the transaction
    #[error("Transaction rejected")]
    SignerRejected,

    /// Any other ledger write failure
    #[error("Ledger write failed: {0}")]
    LedgerWriteFailed(String),

    /// Oracle or proof failure while opening a ciphertext
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// The availability check for a claim could not be read
    #[error("Claim failed: {0}")]
    ClaimFailed(String),
}

/// Classify a ledger write error: a signer refusal gets its own kind so the
/// surfaced message can distinguish it from other transaction failures.
pub(crate) fn classify_write_error(error: &eyre::Report) -> LifecycleError {
    let message = format!("{error:#}");
    if message.to_lowercase().contains("rejected") {
        LifecycleError::SignerRejected
    } else {
        LifecycleError::LedgerWriteFailed(message)
    }
}
