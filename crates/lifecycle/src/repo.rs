// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::models::GiftRecord;
use crate::{DataStore, SharedStore};
use eyre::Result;

const GIFTS_KEY: &str = "_gifts";
const ACTIVITY_KEY: &str = "_activity";

/// Keyed access to the manager's local state: the last ledger snapshot and
/// the activity log. The snapshot is display-only; the ledger stays the
/// source of truth.
pub struct GiftRepository<S: DataStore> {
    store: SharedStore<S>,
}

impl<S: DataStore> GiftRepository<S> {
    pub fn new(store: SharedStore<S>) -> Self {
        Self { store }
    }

    pub async fn set_gifts(&mut self, gifts: Vec<GiftRecord>) -> Result<()> {
        self.store
            .insert(GIFTS_KEY, &gifts)
            .await
            .map_err(|e| eyre::eyre!("Could not store gift snapshot due to error: {e}"))?;
        Ok(())
    }

    pub async fn gifts(&self) -> Result<Vec<GiftRecord>> {
        let gifts = self
            .store
            .get::<Vec<GiftRecord>>(GIFTS_KEY)
            .await
            .map_err(|e| eyre::eyre!("Could not read gift snapshot due to error: {e}"))?
            .unwrap_or_default();
        Ok(gifts)
    }

    pub async fn find(&self, gift_id: &str) -> Result<Option<GiftRecord>> {
        Ok(self.gifts().await?.into_iter().find(|g| g.id == gift_id))
    }

    pub async fn push_activity(&mut self, entry: String) -> Result<()> {
        self.store
            .modify(ACTIVITY_KEY, |log: Option<Vec<String>>| {
                let mut log = log.unwrap_or_default();
                log.push(entry.clone());
                Some(log)
            })
            .await
            .map_err(|e| eyre::eyre!("Could not append activity entry due to error: {e}"))?;
        Ok(())
    }

    pub async fn activity(&self) -> Result<Vec<String>> {
        let log = self
            .store
            .get::<Vec<String>>(ACTIVITY_KEY)
            .await
            .map_err(|e| eyre::eyre!("Could not read activity log due to error: {e}"))?
            .unwrap_or_default();
        Ok(log)
    }
}
