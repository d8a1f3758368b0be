//! Usage records written on every successful validation.

use chrono::{DateTime, Utc};

/// One validation event as stored.
///
/// `sequence` is assigned by the store: it starts at 1 for each key and
/// grows by exactly one per recorded validation, so the highest sequence of a
/// key equals its validation count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUsage {
    pub api_id: String,
    pub ip_address: String,
    pub sequence: u64,
    pub validated_at: DateTime<Utc>,
}

/// A usage event before the store has assigned its sequence.
#[derive(Debug, Clone)]
pub struct NewApiUsage {
    pub api_id: String,
    pub ip_address: String,
    pub validated_at: DateTime<Utc>,
}

impl NewApiUsage {
    pub fn new(
        api_id: impl Into<String>,
        ip_address: impl Into<String>,
        validated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            api_id: api_id.into(),
            ip_address: ip_address.into(),
            validated_at,
        }
    }

    pub(crate) fn with_sequence(self, sequence: u64) -> ApiUsage {
        ApiUsage {
            api_id: self.api_id,
            ip_address: self.ip_address,
            sequence,
            validated_at: self.validated_at,
        }
    }
}
