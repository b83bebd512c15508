//! Encrypted vault blob format.
//!
//! The blob stored under `encrypted_passwords` has this layout:
//!
//! ```text
//! [PVLT: 4 bytes][version: 1 byte][nonce: 12 bytes][ciphertext + GCM tag: 16 bytes]
//! ```
//!
//! - **Magic** (`PVLT`): identifies the bytes as a PassVault blob.
//! - **Version**: format version (currently `1`).
//! - **Nonce / ciphertext**: AES-256-GCM over the JSON credential array.
//!
//! The 5-byte prefix is passed as associated data, so changing the
//! version byte breaks the tag just like changing the ciphertext does.

use zeroize::Zeroizing;

use crate::crypto::encryption::{self, NONCE_LEN, TAG_LEN};
use crate::crypto::keys::MasterKey;
use crate::errors::{PassVaultError, Result};

use super::collection::CredentialCollection;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault blob.
const MAGIC: &[u8; 4] = b"PVLT";

/// Current blob format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version).
const PREFIX_LEN: usize = 5;

/// Smallest blob that can possibly be valid.
const MIN_BLOB_LEN: usize = PREFIX_LEN + NONCE_LEN + TAG_LEN;

fn prefix(version: u8) -> [u8; PREFIX_LEN] {
    let mut p = [0u8; PREFIX_LEN];
    p[..4].copy_from_slice(MAGIC);
    p[4] = version;
    p
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize and encrypt `collection` under `key`.
///
/// A fresh nonce is drawn on every call, so encrypting the same
/// collection twice yields different bytes.
pub fn encrypt_collection(collection: &CredentialCollection, key: &MasterKey) -> Result<Vec<u8>> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(collection)
            .map_err(|e| PassVaultError::SerializationError(format!("credentials: {e}")))?,
    );

    let header = prefix(CURRENT_VERSION);
    let blob_key = key.derive_blob_key()?;
    let sealed = encryption::encrypt(&blob_key[..], &plaintext, &header)?;

    let mut blob = Vec::with_capacity(PREFIX_LEN + sealed.len());
    blob.extend_from_slice(&header);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}

/// Decrypt and deserialize a blob produced by `encrypt_collection`.
///
/// The GCM tag is verified before anything is parsed.  A wrong key,
/// truncated or tampered bytes, and a payload that is not a valid
/// credential array are all `DecryptionFailed`.  An unknown version
/// byte is `InvalidVaultFormat`.
pub fn decrypt_collection(blob: &[u8], key: &MasterKey) -> Result<CredentialCollection> {
    if blob.len() < MIN_BLOB_LEN || &blob[..4] != MAGIC {
        return Err(PassVaultError::DecryptionFailed);
    }

    let version = blob[4];
    if version != CURRENT_VERSION {
        return Err(PassVaultError::InvalidVaultFormat(format!(
            "unsupported blob version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let (header, sealed) = blob.split_at(PREFIX_LEN);
    let blob_key = key.derive_blob_key()?;
    let plaintext = Zeroizing::new(encryption::decrypt(&blob_key[..], sealed, header)?);

    let collection: CredentialCollection =
        serde_json::from_slice(&plaintext).map_err(|_| PassVaultError::DecryptionFailed)?;
    collection
        .validate()
        .map_err(|_| PassVaultError::DecryptionFailed)?;

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::CredentialDraft;
    use chrono::Utc;

    fn key(byte: u8) -> MasterKey {
        MasterKey::new([byte; 32])
    }

    fn sample() -> CredentialCollection {
        let mut c = CredentialCollection::new();
        c.add(&CredentialDraft::new("Gmail", "x"), Utc::now()).unwrap();
        c
    }

    #[test]
    fn blob_starts_with_magic_and_version() {
        let blob = encrypt_collection(&sample(), &key(1)).unwrap();
        assert_eq!(&blob[..4], b"PVLT");
        assert_eq!(blob[4], CURRENT_VERSION);
    }

    #[test]
    fn plaintext_is_not_visible_in_blob() {
        let blob = encrypt_collection(&sample(), &key(1)).unwrap();
        let haystack = String::from_utf8_lossy(&blob);
        assert!(!haystack.contains("Gmail"));
    }

    #[test]
    fn unknown_version_is_reported_distinctly() {
        let mut blob = encrypt_collection(&sample(), &key(1)).unwrap();
        blob[4] = 9;
        assert!(matches!(
            decrypt_collection(&blob, &key(1)),
            Err(PassVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn bad_magic_is_decryption_failure() {
        let mut blob = encrypt_collection(&sample(), &key(1)).unwrap();
        blob[0] = b'X';
        assert!(matches!(
            decrypt_collection(&blob, &key(1)),
            Err(PassVaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn truncated_blob_is_decryption_failure() {
        let blob = encrypt_collection(&sample(), &key(1)).unwrap();
        for len in [0, 3, PREFIX_LEN, MIN_BLOB_LEN - 1, blob.len() - 1] {
            assert!(
                matches!(
                    decrypt_collection(&blob[..len], &key(1)),
                    Err(PassVaultError::DecryptionFailed)
                ),
                "length {len} should fail"
            );
        }
    }

    #[test]
    fn authentic_but_malformed_payload_is_decryption_failure() {
        let k = key(1);
        let blob_key = k.derive_blob_key().unwrap();
        let header = prefix(CURRENT_VERSION);
        let sealed = encryption::encrypt(&blob_key[..], b"{\"not\":\"a list\"}", &header).unwrap();
        let mut blob = header.to_vec();
        blob.extend_from_slice(&sealed);

        assert!(matches!(
            decrypt_collection(&blob, &k),
            Err(PassVaultError::DecryptionFailed)
        ));
    }
}
