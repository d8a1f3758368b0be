//! API key issuance.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::api_key::ApiKey;
use crate::models::requests::GenerateApiKeyResponse;
use crate::services::keypair::generate_keypair;
use crate::store::{ApiKeyStore, StoreError};

/// Issue a new API key for an organization.
///
/// # Process
///
/// 1. Generate an Ed25519 keypair from the OS random source
/// 2. Assign a random UUID as the key ID
/// 3. Store the record (fingerprint only, no expiration)
/// 4. Return the ID and the secret credential (only time it's shown)
///
/// # Errors
///
/// - `Generation` if the random source fails, or if the new ID or
///   fingerprint is already taken
/// - `Storage` if the store rejects the write
pub fn generate_api_key(
    store: &dyn ApiKeyStore,
    organization_name: &str,
    now: DateTime<Utc>,
) -> Result<GenerateApiKeyResponse, AppError> {
    let keypair = generate_keypair()?;
    let api_id = Uuid::new_v4().to_string();

    let api_key = ApiKey::new(&api_id, keypair.fingerprint, organization_name, now);
    match store.insert(api_key) {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::Generation(
                "generated key collides with an existing key".into(),
            ));
        }
        Err(e) => {
            tracing::error!(organization = %organization_name, error = %e, "Failed to store API key");
            return Err(e.into());
        }
    }

    tracing::info!(api_id = %api_id, organization = %organization_name, "API key issued");

    Ok(GenerateApiKeyResponse {
        api_id,
        api_key: keypair.credential,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::keypair::fingerprint_from_credential;
    use crate::services::testing::FlakyStore;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    #[test]
    fn stores_fingerprint_not_credential() {
        let store = MemoryStore::new();
        let issued = generate_api_key(&store, "Acme", Utc::now()).unwrap();

        let record = store.get_by_id(&issued.api_id).unwrap().unwrap();
        assert_eq!(record.organization_name, "Acme");
        assert_eq!(record.expires_at, None);
        assert_ne!(record.credential, issued.api_key);
        assert_eq!(
            record.credential,
            fingerprint_from_credential(&issued.api_key).unwrap()
        );
    }

    #[test]
    fn empty_organization_is_allowed() {
        let store = MemoryStore::new();
        let issued = generate_api_key(&store, "", Utc::now()).unwrap();
        assert!(!issued.api_id.is_empty());
        let record = store.get_by_id(&issued.api_id).unwrap().unwrap();
        assert_eq!(record.organization_name, "");
    }

    #[test]
    fn ids_and_credentials_never_repeat() {
        let store = MemoryStore::new();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let issued = generate_api_key(&store, "Acme", Utc::now()).unwrap();
            assert!(!issued.api_id.is_empty());
            assert!(seen.insert(issued.api_id));
            assert!(seen.insert(issued.api_key));
        }
        assert_eq!(store.count().unwrap(), 200);
    }

    #[test]
    fn storage_failure_surfaces_as_storage_error() {
        let store = FlakyStore {
            fail_puts: true,
            ..FlakyStore::default()
        };
        let result = generate_api_key(&store, "Acme", Utc::now());
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(store.inner.count().unwrap(), 0);
    }

    #[test]
    fn taken_id_or_fingerprint_is_a_generation_error() {
        let store = FlakyStore {
            collide: true,
            ..FlakyStore::default()
        };
        let result = generate_api_key(&store, "Acme", Utc::now());
        assert!(matches!(result, Err(AppError::Generation(_))));
        assert_eq!(store.inner.count().unwrap(), 0);
    }
}
