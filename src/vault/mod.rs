//! Vault module: the credential model and the locked/unlocked vault.
//!
//! This module provides:
//! - `Credential`, `CredentialDraft` and `CredentialPatch` (`credential`)
//! - The in-memory `CredentialCollection` (`collection`)
//! - The encrypted blob format (`format`)
//! - `VaultStore`, the session state machine over a `BlobStore` (`store`)

pub mod collection;
pub mod credential;
pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use collection::{CredentialCollection, SortKey, SortOrder};
pub use credential::{Credential, CredentialDraft, CredentialPatch};
pub use store::{VaultState, VaultStore};
