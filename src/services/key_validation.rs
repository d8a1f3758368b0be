//! Credential validation with best-effort usage recording.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::api_key::ApiKey;
use crate::models::usage::NewApiUsage;
use crate::services::keypair::fingerprint_from_credential;
use crate::store::ApiKeyStore;

/// Resolve a presented credential to its API key and record the usage.
///
/// # Flow
///
/// 1. Decode the credential and derive its fingerprint
/// 2. Look the fingerprint up in the store
/// 3. Reject keys whose expiration is not after `now`
/// 4. Append a usage record for `ip_address`
///
/// A failure in step 4 is logged and ignored: the authentication decision
/// stands regardless of usage telemetry.
///
/// # Errors
///
/// `InvalidCredentialFormat`, `InvalidCredential` or `CredentialExpired`.
/// Callers must not expose which one occurred. A failed lookup surfaces as
/// `Storage`.
pub fn validate_api_key(
    store: &dyn ApiKeyStore,
    credential: &str,
    ip_address: &str,
    now: DateTime<Utc>,
) -> Result<ApiKey, AppError> {
    let fingerprint = fingerprint_from_credential(credential)?;

    let api_key = store
        .get_by_credential(&fingerprint)?
        .ok_or(AppError::InvalidCredential)?;

    if api_key.is_expired_at(now) {
        return Err(AppError::CredentialExpired);
    }

    match store.record_usage(NewApiUsage::new(&api_key.id, ip_address, now)) {
        Ok(usage) => {
            tracing::debug!(api_id = %api_key.id, sequence = usage.sequence, "Usage recorded");
        }
        Err(e) => {
            tracing::warn!(api_id = %api_key.id, error = %e, "Failed to store API usage");
        }
    }

    Ok(api_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::key_generation::generate_api_key;
    use crate::services::keypair::generate_keypair;
    use crate::services::testing::FlakyStore;
    use crate::store::MemoryStore;
    use chrono::Duration;

    #[test]
    fn issued_credential_validates_and_records_usage() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let issued = generate_api_key(&store, "Acme", now).unwrap();

        let key = validate_api_key(&store, &issued.api_key, "1.2.3.4", now).unwrap();
        assert_eq!(key.id, issued.api_id);
        assert_eq!(key.organization_name, "Acme");

        let usage = store.get_usage(&issued.api_id).unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].ip_address, "1.2.3.4");
        assert_eq!(usage[0].sequence, 1);
        assert_eq!(usage[0].validated_at, now);
    }

    #[test]
    fn malformed_credential_is_a_format_error() {
        let store = MemoryStore::new();
        let result = validate_api_key(&store, "zz-not-hex", "ip", Utc::now());
        assert!(matches!(result, Err(AppError::InvalidCredentialFormat)));
    }

    #[test]
    fn unknown_credential_is_rejected() {
        let store = MemoryStore::new();
        generate_api_key(&store, "Acme", Utc::now()).unwrap();
        let stranger = generate_keypair().unwrap();

        let result = validate_api_key(&store, &stranger.credential, "ip", Utc::now());
        assert!(matches!(result, Err(AppError::InvalidCredential)));
        assert!(store.all_usage().unwrap().is_empty());
    }

    #[test]
    fn expired_key_is_rejected_without_usage() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let issued = generate_api_key(&store, "Acme", now).unwrap();
        store.revoke(&issued.api_id, now).unwrap();

        let result = validate_api_key(&store, &issued.api_key, "ip", now);
        assert!(matches!(result, Err(AppError::CredentialExpired)));
        assert!(store.get_usage(&issued.api_id).unwrap().is_empty());
    }

    #[test]
    fn future_expiration_still_validates() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let issued = generate_api_key(&store, "Acme", now).unwrap();
        store
            .revoke(&issued.api_id, now + Duration::minutes(5))
            .unwrap();

        assert!(validate_api_key(&store, &issued.api_key, "ip", now).is_ok());
    }

    #[test]
    fn lookup_failure_is_a_storage_error() {
        let store = FlakyStore {
            fail_lookups: true,
            ..FlakyStore::default()
        };
        let issued = generate_api_key(&store, "Acme", Utc::now()).unwrap();

        let result = validate_api_key(&store, &issued.api_key, "ip", Utc::now());
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(store.get_usage(&issued.api_id).unwrap().is_empty());
    }

    #[test]
    fn usage_failure_does_not_block_validation() {
        let store = FlakyStore {
            fail_usage: true,
            ..FlakyStore::default()
        };
        let issued = generate_api_key(&store, "Acme", Utc::now()).unwrap();

        let key = validate_api_key(&store, &issued.api_key, "ip", Utc::now()).unwrap();
        assert_eq!(key.id, issued.api_id);
        assert!(store.get_usage(&issued.api_id).unwrap().is_empty());
    }
}
