// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod error;
mod manager;
pub mod models;
mod repo;
mod status;
mod store;
mod traits;
mod verifier;

pub use error::*;
pub use manager::*;
pub use repo::*;
pub use status::*;
pub use store::*;
pub use traits::*;
pub use verifier::*;
