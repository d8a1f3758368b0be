//! Business logic services.
//!
//! Each usecase is a set of plain functions over the [`ApiKeyStore`]
//! contract. Handlers call exactly one of them per request; services never
//! call each other. The current instant is passed in rather than read here.
//!
//! [`ApiKeyStore`]: crate::store::ApiKeyStore

pub mod key_generation;
pub mod key_listing;
pub mod key_revocation;
pub mod key_validation;
pub mod keypair;

#[cfg(test)]
pub(crate) mod testing;
