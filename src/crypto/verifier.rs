//! Master password verification hash.
//!
//! The verification hash is an Argon2id PHC string
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`) carrying its own random
//! salt, independent of the key-derivation salt.  It answers "is this
//! the right password?" and is never usable as the encryption key.

use aes_gcm::aead::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Version};

use crate::errors::{PassVaultError, Result};

use super::kdf::Argon2Params;

/// Hash `password` into a self-describing PHC string.
pub fn hash(password: &[u8], params: &Argon2Params) -> Result<String> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2(None)?);
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password, &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("password hashing failed: {e}")))
}

/// Check `password` against a stored PHC string.
///
/// Returns `Ok(false)` for a wrong password.  Only a stored hash that
/// cannot be parsed is an error.  The digest comparison is constant-time.
pub fn verify(password: &[u8], stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        PassVaultError::InvalidVaultFormat(format!("malformed master password hash: {e}"))
    })?;

    // Parameters come from the PHC string itself.
    Ok(Argon2::default()
        .verify_password(password, &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_MEMORY_KIB;

    fn fast() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn correct_password_verifies() {
        let stored = hash(b"Abcd1234!", &fast()).unwrap();
        assert!(verify(b"Abcd1234!", &stored).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let stored = hash(b"Abcd1234!", &fast()).unwrap();
        assert!(!verify(b"abcd1234!", &stored).unwrap());
        assert!(!verify(b"", &stored).unwrap());
    }

    #[test]
    fn hash_is_salted() {
        let a = hash(b"same", &fast()).unwrap();
        let b = hash(b"same", &fast()).unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let result = verify(b"pw", "not-a-phc-string");
        assert!(matches!(result, Err(PassVaultError::InvalidVaultFormat(_))));
    }
}
