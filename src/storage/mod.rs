//! Opaque key-value blob storage used by the vault.
//!
//! The vault only ever needs `get`, `set` and `remove` on byte strings.
//! Two backends are provided:
//! - `FileBlobStore`: one file per key inside a directory, written
//!   atomically (temp file + rename).
//! - `MemoryBlobStore`: in-process map with optional write-failure
//!   injection, used by tests and embedders.

pub mod file;
pub mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use crate::errors::Result;

/// Storage keys used by the vault.
pub mod keys {
    /// Argon2id PHC string for master password verification.
    pub const MASTER_PASSWORD_HASH: &str = "master_password_hash";
    /// Key-derivation salt (raw bytes).
    pub const SALT: &str = "master_password_salt";
    /// Encrypted credential collection.
    pub const PASSWORDS: &str = "encrypted_passwords";
    /// Set once setup completes.
    pub const INITIALIZED: &str = "app_initialized";
    /// Argon2id cost used for the stored salt (JSON).
    pub const KDF_PARAMS: &str = "kdf_params";
    /// Marker that a staged master password change is committed.
    pub const KEY_CHANGE_COMMIT: &str = "key_change_commit";

    /// Keys replaced together by a master password change.
    pub const KEY_CHANGE_SET: [&str; 4] = [MASTER_PASSWORD_HASH, SALT, KDF_PARAMS, PASSWORDS];

    /// Every key the vault may write.
    pub const ALL: [&str; 6] = [
        INITIALIZED,
        MASTER_PASSWORD_HASH,
        SALT,
        KDF_PARAMS,
        PASSWORDS,
        KEY_CHANGE_COMMIT,
    ];

    /// Staging key for a value written during a master password change.
    pub fn pending(key: &str) -> String {
        format!("pending.{key}")
    }
}

/// A byte-string store addressed by string keys.
///
/// `set` must replace the previous value atomically: after a failed
/// `set` the old value is still readable.
pub trait BlobStore {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write (or replace) a value.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value.  Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
