//! API Key Manager
//!
//! Issues, validates, lists and revokes API keys for client organizations,
//! tracking per-key usage (request counts, source IPs, timestamps).
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: In-memory, process lifetime only ([`store::MemoryStore`])
//! - **Key material**: Ed25519; callers hold the secret, the store holds a
//!   fingerprint of the public key
//! - **Format**: JSON requests/responses

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
