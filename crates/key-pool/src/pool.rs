//! Round-robin credential pool
//!
//! Membership is fixed at construction. The active cursor is an `AtomicUsize`
//! shared by every in-flight call; each `rotate()` is one atomic step, but
//! retry sequences of concurrent calls may interleave and skip or repeat keys.

use std::sync::atomic::{AtomicUsize, Ordering};

use common::Secret;
use tracing::info;

use crate::error::{Error, Result};

pub struct CredentialPool {
    credentials: Vec<Secret<String>>,
    active_index: AtomicUsize,
}

impl CredentialPool {
    /// Build a pool with the cursor on the first credential.
    ///
    /// An empty pool is allowed to exist so that configuration problems
    /// surface as `PoolEmpty` on the first call rather than at startup.
    pub fn new(credentials: Vec<Secret<String>>) -> Self {
        info!(keys = credentials.len(), "credential pool initialized");
        Self {
            credentials,
            active_index: AtomicUsize::new(0),
        }
    }

    /// Credential under the cursor.
    pub fn active_credential(&self) -> Result<&Secret<String>> {
        if self.credentials.is_empty() {
            return Err(Error::PoolEmpty);
        }
        let idx = self.active_index.load(Ordering::SeqCst) % self.credentials.len();
        Ok(&self.credentials[idx])
    }

    /// Advance the cursor to the next credential, wrapping at the end.
    ///
    /// No-op on an empty pool.
    pub fn rotate(&self) {
        let n = self.credentials.len();
        if n == 0 {
            return;
        }
        let previous = self
            .active_index
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |i| Some((i + 1) % n))
            .unwrap_or_else(|i| i);
        let next = (previous + 1) % n;
        info!(
            key_number = next + 1,
            keys = n,
            "API key exhausted, rotating to next key"
        );
        metrics::counter!("key_rotations_total").increment(1);
    }

    /// Zero-based position of the cursor.
    pub fn active_index(&self) -> usize {
        self.active_index.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Pool summary for the health endpoint. Never includes key material.
    pub fn health(&self) -> serde_json::Value {
        let total = self.credentials.len();
        let status = if total > 0 { "healthy" } else { "degraded" };
        let active_key = if total > 0 {
            serde_json::json!(self.active_index() + 1)
        } else {
            serde_json::Value::Null
        };
        serde_json::json!({
            "status": status,
            "keys_total": total,
            "active_key": active_key,
        })
    }
}

impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field("keys", &self.credentials.len())
            .field("active_index", &self.active_index())
            .finish()
    }
}
