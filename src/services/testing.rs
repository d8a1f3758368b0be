//! Store doubles for exercising failure paths.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::api_key::ApiKey;
use crate::models::usage::{ApiUsage, NewApiUsage};
use crate::store::{ApiKeyStore, MemoryStore, StoreError};

/// Delegates to a [`MemoryStore`] but fails the configured operations.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_puts: bool,
    pub fail_usage: bool,
    pub fail_lookups: bool,
    /// Every insert reports its id or credential as already taken.
    pub collide: bool,
}

impl ApiKeyStore for FlakyStore {
    fn put(&self, key: ApiKey) -> Result<(), StoreError> {
        if self.fail_puts {
            return Err(StoreError::Unavailable("put rejected".into()));
        }
        self.inner.put(key)
    }

    fn insert(&self, key: ApiKey) -> Result<(), StoreError> {
        if self.collide {
            return Err(StoreError::Duplicate(key.id));
        }
        if self.fail_puts {
            return Err(StoreError::Unavailable("insert rejected".into()));
        }
        self.inner.insert(key)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }

    fn get_by_id(&self, id: &str) -> Result<Option<ApiKey>, StoreError> {
        self.inner.get_by_id(id)
    }

    fn get_by_credential(&self, credential: &str) -> Result<Option<ApiKey>, StoreError> {
        if self.fail_lookups {
            return Err(StoreError::Unavailable("lookup failed".into()));
        }
        self.inner.get_by_credential(credential)
    }

    fn list_all(&self) -> Result<Vec<ApiKey>, StoreError> {
        self.inner.list_all()
    }

    fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<ApiKey>, StoreError> {
        self.inner.list_active(now)
    }

    fn revoke(&self, id: &str, when: DateTime<Utc>) -> Result<(), StoreError> {
        self.inner.revoke(id, when)
    }

    fn delete(&self, id: &str) -> Result<ApiKey, StoreError> {
        self.inner.delete(id)
    }

    fn record_usage(&self, usage: NewApiUsage) -> Result<ApiUsage, StoreError> {
        if self.fail_usage {
            return Err(StoreError::Unavailable("usage log full".into()));
        }
        self.inner.record_usage(usage)
    }

    fn get_usage(&self, api_id: &str) -> Result<Vec<ApiUsage>, StoreError> {
        self.inner.get_usage(api_id)
    }

    fn get_latest_usage(&self, api_id: &str) -> Result<Option<ApiUsage>, StoreError> {
        self.inner.get_latest_usage(api_id)
    }

    fn all_usage(&self) -> Result<HashMap<String, Vec<ApiUsage>>, StoreError> {
        self.inner.all_usage()
    }
}
