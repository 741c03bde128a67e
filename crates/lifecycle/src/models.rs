// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use veil_evm_helpers::contracts::BusinessData;

/// Whether a gift has been taken, derived from the public counter and never
/// from the encrypted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimState {
    Available,
    Claimed,
}

// This correlates with the information the registry contract holds for a
// gift, keyed by a creation-time-derived id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Opaque reference to the ciphertext; the registry keys the encrypted
    /// amount by gift id.
    pub encrypted_amount_handle: String,
    pub public_value1: u64,
    pub public_value2: u64,
    pub creator: String,
    /// Creation timestamp in seconds
    pub created_at: u64,
    pub is_verified: bool,
    /// Only trustworthy once `is_verified` is true; treated as unknown
    /// before that.
    pub decrypted_value: u64,
}

impl GiftRecord {
    pub fn from_business_data(id: &str, data: BusinessData) -> Self {
        Self {
            id: id.to_string(),
            name: data.name,
            description: data.description,
            encrypted_amount_handle: id.to_string(),
            public_value1: u64_or_zero(data.publicValue1),
            public_value2: u64_or_zero(data.publicValue2),
            creator: data.creator.to_string(),
            created_at: u64_or_zero(data.timestamp),
            is_verified: data.isVerified,
            decrypted_value: u64_or_zero(data.decryptedValue),
        }
    }

    pub fn claim_state(&self) -> ClaimState {
        if self.public_value2 > 0 {
            ClaimState::Claimed
        } else {
            ClaimState::Available
        }
    }
}

/// Coerce user input to a non-negative integer amount; anything that does not
/// parse (including empty input) becomes 0, matching the registry's input
/// handling.
pub fn coerce_amount(input: &str) -> u64 {
    input.trim().parse::<u64>().unwrap_or(0)
}

pub(crate) fn u64_or_zero(input: U256) -> u64 {
    u64::try_from(input).unwrap_or(0)
}
