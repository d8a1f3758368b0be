//! Reporting view joining every API key with its usage aggregate.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response body for `GET /keys`.
///
/// # Example
///
/// ```json
/// {
///   "api_keys": [
///     {
///       "api_id": "550e8400-e29b-41d4-a716-446655440000",
///       "organization_name": "Acme",
///       "created_at": "2026-01-15T10:30:00Z",
///       "expiration_date": null,
///       "is_expired": false,
///       "usage_stats": { "total_requests": 2, "unique_ip_count": 2, ... }
///     }
///   ],
///   "total": 1
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyListResponse {
    pub api_keys: Vec<ApiKeyWithStats>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyWithStats {
    pub api_id: String,
    pub organization_name: String,
    pub created_at: DateTime<Utc>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub usage_stats: UsageStats,
}

/// Aggregate over one key's usage log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub total_requests: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,

    pub unique_ip_count: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_ip: Option<String>,
}
