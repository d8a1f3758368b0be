//! Revocation (soft delete) and hard deletion of API keys.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::api_key::ApiKey;
use crate::store::ApiKeyStore;

/// Expire an API key immediately.
///
/// # Process
///
/// 1. Verify the key exists
/// 2. Stamp its expiration with `now`
///
/// Revoking an already expired key re-stamps the expiration and succeeds.
/// The record and its usage history stay in the store.
pub fn revoke_api_key(
    store: &dyn ApiKeyStore,
    api_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if store.get_by_id(api_id)?.is_none() {
        return Err(AppError::NotFound(api_id.to_string()));
    }

    store.revoke(api_id, now)?;
    tracing::info!(api_id = %api_id, "API key revoked");
    Ok(())
}

/// Remove an API key from the store entirely.
///
/// The credential stops resolving and the key disappears from listings.
/// Usage history for the ID is retained.
pub fn purge_api_key(store: &dyn ApiKeyStore, api_id: &str) -> Result<ApiKey, AppError> {
    let removed = store.delete(api_id)?;
    tracing::info!(api_id = %api_id, "API key purged");
    Ok(removed)
}
