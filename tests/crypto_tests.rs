//! Integration tests for the PassVault crypto module and blob codec.

use chrono::Utc;
use passvault::crypto::kdf::{Argon2Params, MIN_MEMORY_KIB, SALT_LEN};
use passvault::crypto::keys::MasterKey;
use passvault::crypto::{decrypt, derive_master_key, encrypt, generate_salt, verifier};
use passvault::errors::PassVaultError;
use passvault::vault::format::{decrypt_collection, encrypt_collection};
use passvault::vault::{CredentialCollection, CredentialDraft};

fn fast() -> Argon2Params {
    Argon2Params {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    }
}

fn sample_collection() -> CredentialCollection {
    let mut c = CredentialCollection::new();
    let now = Utc::now();
    let mut gmail = CredentialDraft::new("Gmail", "x");
    gmail.email = Some("me@example.com".into());
    c.add(&gmail, now).unwrap();
    let mut github = CredentialDraft::new("GitHub", "correct horse battery staple");
    github.url = Some("https://github.com".into());
    github.notes = Some("2FA on phone".into());
    c.add(&github, now).unwrap();
    c
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_is_deterministic() {
    let salt = generate_salt();
    let a = derive_master_key(b"Abcd1234!", &salt, &fast()).unwrap();
    let b = derive_master_key(b"Abcd1234!", &salt, &fast()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_salts_give_different_keys() {
    let s1 = generate_salt();
    let s2 = generate_salt();
    assert_ne!(s1, s2);
    assert_eq!(s1.len(), SALT_LEN);

    let k1 = derive_master_key(b"Abcd1234!", &s1, &fast()).unwrap();
    let k2 = derive_master_key(b"Abcd1234!", &s2, &fast()).unwrap();
    assert_ne!(k1, k2);
}

#[test]
fn too_cheap_params_are_rejected() {
    let weak = Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    assert!(matches!(
        derive_master_key(b"pw", &generate_salt(), &weak),
        Err(PassVaultError::KeyDerivationFailed(_))
    ));
}

// ---------------------------------------------------------------------------
// AEAD primitive
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_with_associated_data() {
    let key = [0xABu8; 32];
    let sealed = encrypt(&key, b"hello", b"header").unwrap();
    assert_eq!(decrypt(&key, &sealed, b"header").unwrap(), b"hello");

    // The associated data is authenticated too.
    assert!(matches!(
        decrypt(&key, &sealed, b"other"),
        Err(PassVaultError::DecryptionFailed)
    ));
}

#[test]
fn encrypt_uses_fresh_nonce() {
    let key = [0xCDu8; 32];
    let a = encrypt(&key, b"same", b"").unwrap();
    let b = encrypt(&key, b"same", b"").unwrap();
    assert_ne!(a, b);
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

#[test]
fn verifier_accepts_right_password_only() {
    let stored = verifier::hash(b"Abcd1234!", &fast()).unwrap();
    assert!(verifier::verify(b"Abcd1234!", &stored).unwrap());
    assert!(!verifier::verify(b"wrong", &stored).unwrap());
}

#[test]
fn verifier_hash_is_salted() {
    let a = verifier::hash(b"Abcd1234!", &fast()).unwrap();
    let b = verifier::hash(b"Abcd1234!", &fast()).unwrap();
    assert_ne!(a, b);
    assert!(!a.contains("Abcd1234!"));
}

#[test]
fn verifier_rejects_malformed_hash() {
    assert!(matches!(
        verifier::verify(b"Abcd1234!", "not-a-phc-string"),
        Err(PassVaultError::InvalidVaultFormat(_))
    ));
}

// ---------------------------------------------------------------------------
// Blob codec
// ---------------------------------------------------------------------------

#[test]
fn collection_roundtrip() {
    let key = MasterKey::new([7u8; 32]);
    let original = sample_collection();

    let blob = encrypt_collection(&original, &key).unwrap();
    let restored = decrypt_collection(&blob, &key).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn empty_collection_roundtrip() {
    let key = MasterKey::new([7u8; 32]);
    let blob = encrypt_collection(&CredentialCollection::new(), &key).unwrap();
    assert!(decrypt_collection(&blob, &key).unwrap().is_empty());
}

#[test]
fn same_collection_encrypts_differently() {
    let key = MasterKey::new([7u8; 32]);
    let c = sample_collection();
    assert_ne!(
        encrypt_collection(&c, &key).unwrap(),
        encrypt_collection(&c, &key).unwrap()
    );
}

#[test]
fn wrong_key_is_decryption_failure() {
    let blob = encrypt_collection(&sample_collection(), &MasterKey::new([1u8; 32])).unwrap();
    assert!(matches!(
        decrypt_collection(&blob, &MasterKey::new([2u8; 32])),
        Err(PassVaultError::DecryptionFailed)
    ));
}

#[test]
fn any_flipped_byte_is_detected() {
    let key = MasterKey::new([3u8; 32]);
    let blob = encrypt_collection(&sample_collection(), &key).unwrap();

    // Skip the version byte, which reports a format error instead.
    for i in (0..blob.len()).filter(|&i| i != 4) {
        let mut tampered = blob.clone();
        tampered[i] ^= 0x01;
        assert!(
            matches!(
                decrypt_collection(&tampered, &key),
                Err(PassVaultError::DecryptionFailed)
            ),
            "flip at byte {i} went unnoticed"
        );
    }
}

#[test]
fn derived_keys_from_password_roundtrip() {
    let salt = generate_salt();
    let key = MasterKey::derive(b"Abcd1234!", &salt, &fast()).unwrap();
    let blob = encrypt_collection(&sample_collection(), &key).unwrap();

    let again = MasterKey::derive(b"Abcd1234!", &salt, &fast()).unwrap();
    assert_eq!(decrypt_collection(&blob, &again).unwrap().len(), 2);

    let other = MasterKey::derive(b"Abcd1234?", &salt, &fast()).unwrap();
    assert!(decrypt_collection(&blob, &other).is_err());
}
