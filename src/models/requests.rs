//! Request and response bodies for the key management endpoints.

use serde::{Deserialize, Serialize};

/// Request to issue a new API key.
///
/// # Example
///
/// ```json
/// { "organization_name": "Acme" }
/// ```
///
/// The name is not validated; an empty string is accepted.
#[derive(Debug, Deserialize)]
pub struct GenerateApiKeyRequest {
    #[serde(default)]
    pub organization_name: String,
}

/// Returned once at issuance. `api_key` is the secret the caller must keep.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateApiKeyResponse {
    pub api_id: String,
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResponse {
    pub fn valid(api_id: String, organization_name: String) -> Self {
        Self {
            valid: true,
            api_id: Some(api_id),
            organization_name: Some(organization_name),
            message: Some("API key is valid".to_string()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            api_id: None,
            organization_name: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevocationResponse {
    pub success: bool,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
}
