//! Data models for API keys, their usage log and the reporting view.
//!
//! Records here are the values held by the store; request and response
//! bodies exchanged over HTTP live alongside them.

/// API key record model
pub mod api_key;
/// Validation usage records
pub mod usage;
/// Listing view with usage aggregates
pub mod listing;
/// HTTP request and response bodies
pub mod requests;
