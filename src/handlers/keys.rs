//! API key management HTTP handlers.
//!
//! This module implements the key endpoints:
//! - POST /keys - Issue a new API key
//! - POST /keys/validate - Validate the bearer credential and record usage
//! - GET /keys - List all keys with usage statistics
//! - DELETE /keys/{key_id} - Revoke (expire) a key

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{Extensions, HeaderMap, StatusCode, header::AUTHORIZATION},
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        listing::ApiKeyListResponse,
        requests::{
            GenerateApiKeyRequest, GenerateApiKeyResponse, RevocationResponse, ValidationResponse,
        },
    },
    routes::AppState,
    services::{key_generation, key_listing, key_revocation, key_validation},
};

/// Reported to callers for every rejected credential, whatever the cause.
const UNAUTHORIZED_MESSAGE: &str = "Invalid API key";

/// Issue a new API key.
///
/// # Endpoint
///
/// `POST /keys`
///
/// # Request Body
///
/// ```json
/// { "organization_name": "Acme" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "api_id": "550e8400-e29b-41d4-a716-446655440000",
///   "api_key": "9f2c...64 hex characters"
/// }
/// ```
///
/// The `api_key` is only ever returned here.
pub async fn generate_key(
    State(state): State<AppState>,
    Json(request): Json<GenerateApiKeyRequest>,
) -> Result<Json<GenerateApiKeyResponse>, AppError> {
    tracing::info!("Received a request to create an API key");

    let issued = key_generation::generate_api_key(
        state.store.as_ref(),
        &request.organization_name,
        Utc::now(),
    )?;

    Ok(Json(issued))
}

/// Validate the credential carried in `Authorization: Bearer <api_key>`.
///
/// # Response
///
/// - **200**: `{"valid": true, "api_id", "organization_name", "message"}`
/// - **401**: `{"valid": false, "message"}` for a missing header, a malformed
///   header, or any credential rejection
/// - **500**: `{"valid": false, "message"}` when the store fails
pub async fn validate_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
) -> (StatusCode, Json<ValidationResponse>) {
    tracing::info!("Received a request to validate an API key");

    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return unauthorized("Missing Authorization header");
    };

    let Some(credential) = auth_header.to_str().ok().and_then(bearer_token) else {
        return unauthorized("Invalid Authorization header format");
    };

    let ip_address = client_ip(&headers, &extensions);

    match key_validation::validate_api_key(
        state.store.as_ref(),
        credential,
        &ip_address,
        Utc::now(),
    ) {
        Ok(api_key) => (
            StatusCode::OK,
            Json(ValidationResponse::valid(
                api_key.id,
                api_key.organization_name,
            )),
        ),
        Err(e) if e.is_unauthorized() => {
            tracing::debug!(reason = %e, ip = %ip_address, "API key rejected");
            unauthorized(UNAUTHORIZED_MESSAGE)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to validate API key");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ValidationResponse::rejected("Failed to validate API key")),
            )
        }
    }
}

/// List every API key with its usage statistics, newest first.
pub async fn list_keys(
    State(state): State<AppState>,
) -> Result<Json<ApiKeyListResponse>, AppError> {
    tracing::info!("Received a request to list API keys");

    let listing = key_listing::list_api_keys(state.store.as_ref(), Utc::now())?;

    Ok(Json(listing))
}

/// Revoke an API key by setting its expiration to now.
///
/// # Response
///
/// - **200**: `{"success": true, "message", "api_id"}`
/// - **404**: `{"success": false, "message": "API key not found", "api_id"}`
/// - **500**: any other failure
pub async fn revoke_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> (StatusCode, Json<RevocationResponse>) {
    tracing::info!(api_id = %key_id, "Received a request to expire an API key");

    let (status, success, message) =
        match key_revocation::revoke_api_key(state.store.as_ref(), &key_id, Utc::now()) {
            Ok(()) => (StatusCode::OK, true, "API key successfully expired"),
            Err(AppError::NotFound(_)) => (StatusCode::NOT_FOUND, false, "API key not found"),
            Err(e) => {
                tracing::error!(api_id = %key_id, error = %e, "Failed to expire API key");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    false,
                    "Failed to expire API key",
                )
            }
        };

    (
        status,
        Json(RevocationResponse {
            success,
            message: message.to_string(),
            api_id: Some(key_id),
        }),
    )
}

fn unauthorized(message: &str) -> (StatusCode, Json<ValidationResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ValidationResponse::rejected(message)),
    )
}

/// Extract the token from a `Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Caller address: first `X-Forwarded-For` hop, else the TCP peer.
fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
