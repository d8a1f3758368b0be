//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Extracts request data (JSON body, path, headers)
//! 2. Calls one service with the current instant
//! 3. Maps the outcome to a JSON response

/// Health check endpoint
pub mod health;
/// API key issuance, validation, listing and revocation endpoints
pub mod keys;
