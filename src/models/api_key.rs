//! API Key model.
//!
//! An API key is issued to an organization and identified by two values: a
//! random `id` used as the external reference, and a `credential` fingerprint
//! derived from the public half of the keypair. The caller holds the secret
//! half; only the fingerprint is ever stored.

use chrono::{DateTime, Utc};

/// Represents an issued API key as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Unique identifier (UUID v4 string), immutable after creation
    pub id: String,

    /// Address-style fingerprint of the public key (`0x` + 40 hex characters)
    ///
    /// When a request comes in with "Bearer <secret>", we:
    /// 1. Decode the secret into a signing key
    /// 2. Derive the fingerprint of its verifying key
    /// 3. Look up this fingerprint in the store
    pub credential: String,

    /// Free-text owner label
    pub organization_name: String,

    /// Timestamp when this API key was created
    pub created_at: DateTime<Utc>,

    /// When this key stops being valid
    ///
    /// `None` means the key never expires. Revocation stamps it with the
    /// revocation instant instead of removing the record.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    pub fn new(
        id: impl Into<String>,
        credential: impl Into<String>,
        organization_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            credential: credential.into(),
            organization_name: organization_name.into(),
            created_at,
            expires_at: None,
        }
    }

    /// A key is expired once its expiration instant is not after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}
