//! Session key handling.
//!
//! The Argon2id output is wrapped in `MasterKey`, which zeroes its
//! memory when dropped.  The vault blob is not encrypted with the
//! master key directly: HKDF-SHA256 derives a dedicated sub-key bound
//! to the `passvault-blob-key` context.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{PassVaultError, Result};

use super::kdf::{derive_master_key, Argon2Params, KEY_LEN};

/// HKDF context for the vault blob encryption key.
const BLOB_KEY_INFO: &[u8] = b"passvault-blob-key";

/// Derive the blob encryption key from the master key.
pub fn derive_blob_key(master_key: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    hkdf_derive(master_key, BLOB_KEY_INFO)
}

/// Run HKDF-SHA256 expand with the given `info`.
///
/// The extract step is skipped because the master key already has
/// full entropy (it came from Argon2id).
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(info, &mut okm[..])
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte master key that zeroes its memory when dropped.
///
/// Held by the vault session only while authenticated; never persisted.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Run the KDF and wrap the result, wiping the intermediate copy.
    pub fn derive(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<Self> {
        let mut bytes = derive_master_key(password, salt, params)?;
        let key = Self::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the blob encryption key from this master key.
    pub fn derive_blob_key(&self) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        derive_blob_key(&self.bytes)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_key_differs_from_master_key() {
        let master = MasterKey::new([0x11; KEY_LEN]);
        let blob_key = master.derive_blob_key().unwrap();
        assert_ne!(*blob_key, *master.as_bytes());
    }

    #[test]
    fn blob_key_is_deterministic() {
        let a = derive_blob_key(&[0x22; KEY_LEN]).unwrap();
        let b = derive_blob_key(&[0x22; KEY_LEN]).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn debug_output_is_redacted() {
        let master = MasterKey::new([0x33; KEY_LEN]);
        assert_eq!(format!("{master:?}"), "MasterKey(<redacted>)");
    }
}
