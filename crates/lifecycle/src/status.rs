// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

/// How long a success status stays visible before auto-clearing
pub const SUCCESS_CLEAR_MS: u64 = 2000;
/// How long an error status stays visible before auto-clearing
pub const ERROR_CLEAR_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusPhase {
    Pending,
    Success,
    Error,
}

/// Human-readable lifecycle status for the current async operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub phase: StatusPhase,
    pub message: String,
    pub visible: bool,
}

impl TransactionStatus {
    pub fn idle() -> Self {
        Self {
            phase: StatusPhase::Pending,
            message: String::new(),
            visible: false,
        }
    }
}

/// Single-slot status feed: idle -> pending -> success|error -> idle.
///
/// A new update overwrites the slot immediately (no queue). Success and
/// error schedule an auto-clear; the generation counter lets a newer update
/// win over any expiry already scheduled for an older one.
#[derive(Clone)]
pub struct StatusTracker {
    slot: watch::Sender<TransactionStatus>,
    generation: Arc<AtomicU64>,
}

impl StatusTracker {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(TransactionStatus::idle());
        Self {
            slot,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionStatus> {
        self.slot.subscribe()
    }

    pub fn current(&self) -> TransactionStatus {
        self.slot.borrow().clone()
    }

    pub fn set_pending(&self, message: impl Into<String>) {
        self.set(StatusPhase::Pending, message.into());
    }

    pub fn set_success(&self, message: impl Into<String>) {
        self.set(StatusPhase::Success, message.into());
        self.schedule_clear(SUCCESS_CLEAR_MS);
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.set(StatusPhase::Error, message.into());
        self.schedule_clear(ERROR_CLEAR_MS);
    }

    fn set(&self, phase: StatusPhase, message: String) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.slot.send_replace(TransactionStatus {
            phase,
            message,
            visible: true,
        });
    }

    fn schedule_clear(&self, after_ms: u64) {
        let scheduled_for = self.generation.load(Ordering::SeqCst);
        let slot = self.slot.clone();
        let generation = self.generation.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(after_ms)).await;
            // A newer update owns the slot now; leave it alone
            if generation.load(Ordering::SeqCst) == scheduled_for {
                slot.send_replace(TransactionStatus::idle());
            }
        });
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
