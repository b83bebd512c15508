//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF with a fixed iteration count that
//! protects against brute-force and GPU-based attacks.  Parameters are
//! configurable via `Argon2Params` (loaded from `.passvault.toml` or
//! sensible defaults) and are persisted next to the salt so the same
//! cost is used on every login.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::errors::{PassVaultError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings` and to the `kdf_params`
/// record stored alongside the salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject dangerously weak settings and build the argon2 `Params`.
    pub(crate) fn to_argon2(self, output_len: Option<usize>) -> Result<Params> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(PassVaultError::KeyDerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(PassVaultError::KeyDerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }

        Params::new(self.memory_kib, self.iterations, self.parallelism, output_len)
            .map_err(|e| PassVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))
    }
}

/// Derive a 32-byte master key from a password and salt using Argon2id.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_master_key(
    password: &[u8],
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<[u8; KEY_LEN]> {
    let params = argon2_params.to_argon2(Some(KEY_LEN))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
