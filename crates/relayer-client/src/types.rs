// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
    #[error("Oracle rejected the input: {0}")]
    InvalidInput(String),
    #[error("Oracle response was malformed: {0}")]
    MalformedResponse(String),
}

/// A ciphertext plus the proof that it was correctly formed for the
/// registry contract and submitter it was requested for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedInput {
    pub encrypted_data: Bytes,
    pub proof: Bytes,
}

/// Result of opening one or more ciphertext handles.
///
/// `encoded_values` is the ABI encoding of the clear values in handle order,
/// ready to hand to the ledger alongside `proof`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptionResult {
    pub clear_values: HashMap<B256, u64>,
    pub encoded_values: Bytes,
    pub proof: Bytes,
}

impl DecryptionResult {
    pub fn clear_value(&self, handle: &B256) -> Option<u64> {
        self.clear_values.get(handle).copied()
    }
}
