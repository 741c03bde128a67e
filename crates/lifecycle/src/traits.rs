// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;

/// Wallet/session surface consumed by the lifecycle manager.
///
/// A disconnected session fails every mutating operation up front; read-only
/// queries do not require one.
pub trait Session: Send + Sync {
    /// The currently connected identity, if any
    fn identity(&self) -> Option<Address>;

    fn is_connected(&self) -> bool {
        self.identity().is_some()
    }
}

/// Fixed session, useful for command-line tools and tests.
#[derive(Debug, Clone)]
pub struct StaticSession {
    identity: Option<Address>,
}

impl StaticSession {
    pub fn connected(identity: Address) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn disconnected() -> Self {
        Self { identity: None }
    }
}

impl Session for StaticSession {
    fn identity(&self) -> Option<Address> {
        self.identity
    }
}
