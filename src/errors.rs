use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Session errors ---
    #[error("Vault is not set up yet — run `passvault init` first")]
    NotInitialized,

    #[error("Vault is already set up")]
    AlreadyInitialized,

    #[error("Invalid master password")]
    InvalidCredentials,

    #[error("Vault is locked — log in first")]
    VaultLocked,

    #[error("A session is already active — log out first")]
    SessionActive,

    // --- Input errors ---
    #[error("{0}")]
    Validation(String),

    #[error("Credential '{0}' not found")]
    NotFound(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — vault data is corrupted or was encrypted with another key")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Persistence(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
