// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

#[cfg(feature = "evm")]
pub use veil_evm_helpers as evm_helpers;

#[cfg(feature = "lifecycle")]
pub use veil_lifecycle as lifecycle;

#[cfg(feature = "relayer")]
pub use veil_relayer_client as relayer_client;
