//! In-memory storage for API keys and their usage log.
//!
//! The store is the only shared mutable state in the service. It holds:
//! - API key records keyed by `id`
//! - a secondary index from credential fingerprint to `id`
//! - the insertion order of ids, so listings enumerate deterministically
//! - an append-only usage log per key
//!
//! Everything sits behind a single [`parking_lot::RwLock`]. Writers take the
//! lock exclusively, so a `put` updates the record and its credential index
//! entry in one critical section and no reader sees one without the other.
//! No I/O happens under the lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::models::api_key::ApiKey;
use crate::models::usage::{ApiUsage, NewApiUsage};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("API key with ID {0} not found")]
    NotFound(String),

    #[error("API key {0} already exists")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage contract used by the key usecases.
///
/// Lookups signal a miss with `Ok(None)`; only operations that target a
/// specific existing record (`revoke`, `delete`) report `NotFound`.
pub trait ApiKeyStore: Send + Sync {
    /// Inserts or replaces a record under both its id and its credential.
    fn put(&self, key: ApiKey) -> Result<(), StoreError>;

    /// Inserts a record only if neither its id nor its credential is taken.
    /// The check and the insert happen under one write lock.
    fn insert(&self, key: ApiKey) -> Result<(), StoreError>;

    /// Number of records, revoked ones included.
    fn count(&self) -> Result<usize, StoreError>;

    fn get_by_id(&self, id: &str) -> Result<Option<ApiKey>, StoreError>;

    fn get_by_credential(&self, credential: &str) -> Result<Option<ApiKey>, StoreError>;

    /// Snapshot of every record in insertion order.
    fn list_all(&self) -> Result<Vec<ApiKey>, StoreError>;

    /// Records that have no expiration or expire after `now`.
    fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<ApiKey>, StoreError>;

    /// Stamps `expires_at = when` on the record.
    fn revoke(&self, id: &str, when: DateTime<Utc>) -> Result<(), StoreError>;

    /// Removes the record from both indexes and returns it. Usage is kept.
    fn delete(&self, id: &str) -> Result<ApiKey, StoreError>;

    /// Appends a usage event, assigning the next sequence for its key.
    fn record_usage(&self, usage: NewApiUsage) -> Result<ApiUsage, StoreError>;

    /// Usage log of one key in insertion order.
    fn get_usage(&self, api_id: &str) -> Result<Vec<ApiUsage>, StoreError>;

    /// The usage event with the latest `validated_at`, if any.
    fn get_latest_usage(&self, api_id: &str) -> Result<Option<ApiUsage>, StoreError>;

    fn all_usage(&self) -> Result<HashMap<String, Vec<ApiUsage>>, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    keys: HashMap<String, ApiKey>,
    by_credential: HashMap<String, String>,
    order: Vec<String>,
    usage: HashMap<String, Vec<ApiUsage>>,
}

/// Process-lifetime store. Construct one at startup and share it via `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApiKeyStore for MemoryStore {
    fn put(&self, key: ApiKey) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let previous_credential = inner.keys.get(&key.id).map(|old| old.credential.clone());
        match previous_credential {
            Some(old_credential) if old_credential != key.credential => {
                if inner.by_credential.get(&old_credential) == Some(&key.id) {
                    inner.by_credential.remove(&old_credential);
                }
            }
            Some(_) => {}
            None => inner.order.push(key.id.clone()),
        }

        if !key.credential.is_empty() {
            inner
                .by_credential
                .insert(key.credential.clone(), key.id.clone());
        }
        inner.keys.insert(key.id.clone(), key);
        Ok(())
    }

    fn insert(&self, key: ApiKey) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.keys.contains_key(&key.id) || inner.by_credential.contains_key(&key.credential)
        {
            return Err(StoreError::Duplicate(key.id));
        }

        inner.order.push(key.id.clone());
        inner
            .by_credential
            .insert(key.credential.clone(), key.id.clone());
        inner.keys.insert(key.id.clone(), key);
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().keys.len())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<ApiKey>, StoreError> {
        Ok(self.inner.read().keys.get(id).cloned())
    }

    fn get_by_credential(&self, credential: &str) -> Result<Option<ApiKey>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .by_credential
            .get(credential)
            .and_then(|id| inner.keys.get(id))
            .cloned())
    }

    fn list_all(&self) -> Result<Vec<ApiKey>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.keys.get(id))
            .cloned()
            .collect())
    }

    fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<ApiKey>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.keys.get(id))
            .filter(|key| !key.is_expired_at(now))
            .cloned()
            .collect())
    }

    fn revoke(&self, id: &str, when: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let key = inner
            .keys
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        key.expires_at = Some(when);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<ApiKey, StoreError> {
        let mut inner = self.inner.write();
        let key = inner
            .keys
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        // The index entry may already point at another record; only drop ours.
        if inner.by_credential.get(&key.credential).map(String::as_str) == Some(id) {
            inner.by_credential.remove(&key.credential);
        }
        inner.order.retain(|existing| existing != id);
        Ok(key)
    }

    fn record_usage(&self, usage: NewApiUsage) -> Result<ApiUsage, StoreError> {
        let mut inner = self.inner.write();
        let log = inner.usage.entry(usage.api_id.clone()).or_default();

        // Append-only and dense, so the last entry carries the maximum.
        let next = log.last().map_or(0, |last| last.sequence) + 1;
        let record = usage.with_sequence(next);
        log.push(record.clone());
        Ok(record)
    }

    fn get_usage(&self, api_id: &str) -> Result<Vec<ApiUsage>, StoreError> {
        Ok(self
            .inner
            .read()
            .usage
            .get(api_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_latest_usage(&self, api_id: &str) -> Result<Option<ApiUsage>, StoreError> {
        Ok(self
            .inner
            .read()
            .usage
            .get(api_id)
            .and_then(|log| log.iter().max_by_key(|usage| usage.validated_at))
            .cloned())
    }

    fn all_usage(&self) -> Result<HashMap<String, Vec<ApiUsage>>, StoreError> {
        Ok(self.inner.read().usage.clone())
    }
}
