// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod client;
mod types;

pub use client::RelayerClient;
pub use types::*;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

/// Client interface to the encryption oracle.
///
/// The oracle performs the actual FHE operations remotely; this crate only
/// carries requests and responses. Both operations bind their output to a
/// registry contract address so a ciphertext or proof produced for one
/// contract cannot be replayed against another.
#[async_trait]
pub trait EncryptionOracle: Send + Sync {
    /// Encrypt `value` for `contract`, attributed to `submitter`.
    ///
    /// The returned proof attests the ciphertext was correctly formed for
    /// exactly this contract and submitter. Purely computational: nothing is
    /// written to the ledger.
    async fn encrypt(
        &self,
        contract: Address,
        submitter: Address,
        value: u64,
    ) -> Result<EncryptedInput, OracleError>;

    /// Open the ciphertexts behind `handles` in the context of `contract`.
    ///
    /// Returns the clear values together with an ABI encoding of them and a
    /// decryption proof the ledger can check.
    async fn request_decryption(
        &self,
        handles: &[B256],
        contract: Address,
    ) -> Result<DecryptionResult, OracleError>;
}
