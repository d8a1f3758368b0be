//! Reporting view over all API keys and their usage.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::listing::{ApiKeyListResponse, ApiKeyWithStats, UsageStats};
use crate::models::usage::ApiUsage;
use crate::store::ApiKeyStore;

/// List every API key with its usage statistics, newest first.
///
/// Expired keys are included and flagged with `is_expired`.
pub fn list_api_keys(
    store: &dyn ApiKeyStore,
    now: DateTime<Utc>,
) -> Result<ApiKeyListResponse, AppError> {
    let keys = store.list_all()?;
    let usage = store.all_usage()?;

    let api_keys: Vec<ApiKeyWithStats> = keys
        .into_iter()
        .rev()
        .map(|key| {
            let usage_stats = usage
                .get(&key.id)
                .map(|records| calculate_usage_stats(records))
                .unwrap_or_default();

            ApiKeyWithStats {
                is_expired: key.is_expired_at(now),
                api_id: key.id,
                organization_name: key.organization_name,
                created_at: key.created_at,
                expiration_date: key.expires_at,
                usage_stats,
            }
        })
        .collect();

    Ok(ApiKeyListResponse {
        total: api_keys.len(),
        api_keys,
    })
}

/// Aggregate one key's usage log.
pub fn calculate_usage_stats(usage: &[ApiUsage]) -> UsageStats {
    let Some(most_recent) = usage.iter().max_by_key(|record| record.validated_at) else {
        return UsageStats::default();
    };

    let unique_ips: HashSet<&str> = usage
        .iter()
        .map(|record| record.ip_address.as_str())
        .collect();

    UsageStats {
        total_requests: usage.iter().map(|record| record.sequence).max().unwrap_or(0),
        last_used: Some(most_recent.validated_at),
        unique_ip_count: unique_ips.len(),
        most_recent_ip: Some(most_recent.ip_address.clone()),
    }
}
