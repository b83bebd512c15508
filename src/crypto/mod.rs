//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id password-based key derivation (`kdf`)
//! - `MasterKey` and HKDF sub-key derivation (`keys`)
//! - The master password verification hash (`verifier`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod verifier;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_master_key, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_master_key, generate_salt, Argon2Params};
pub use keys::{derive_blob_key, MasterKey};
