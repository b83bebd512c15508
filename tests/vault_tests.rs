//! Integration tests for `VaultStore` on a real directory.
//!
//! Each "restart" drops the store and opens a fresh one on the same
//! directory, so everything asserted afterwards came from disk.

use passvault::crypto::kdf::{Argon2Params, MIN_MEMORY_KIB};
use passvault::errors::PassVaultError;
use passvault::security::{HealthIssue, OfflineBreachCheck};
use passvault::storage::FileBlobStore;
use passvault::vault::{CredentialDraft, CredentialPatch, SortKey, SortOrder, VaultState, VaultStore};
use tempfile::TempDir;

const PW: &str = "Abcd1234!";

fn fast() -> Argon2Params {
    Argon2Params {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    }
}

fn open(dir: &TempDir) -> VaultStore<FileBlobStore> {
    let store = FileBlobStore::open(&dir.path().join("vault")).expect("open store");
    VaultStore::new(store, fast())
}

fn fresh() -> (TempDir, VaultStore<FileBlobStore>) {
    let dir = TempDir::new().expect("create temp dir");
    let mut vault = open(&dir);
    vault.setup(PW).expect("setup");
    (dir, vault)
}

// ---------------------------------------------------------------------------
// Setup and login
// ---------------------------------------------------------------------------

#[test]
fn setup_then_login_yields_empty_list() {
    let (dir, mut vault) = fresh();
    vault.logout().unwrap();
    drop(vault);

    let mut vault = open(&dir);
    assert_eq!(vault.state().unwrap(), VaultState::LoggedOut);
    vault.login(PW).unwrap();
    assert!(vault.list().unwrap().is_empty());
}

#[test]
fn wrong_password_is_invalid_credentials() {
    let (dir, vault) = fresh();
    drop(vault);

    let mut vault = open(&dir);
    assert!(matches!(
        vault.login("wrong"),
        Err(PassVaultError::InvalidCredentials)
    ));
    assert_eq!(vault.state().unwrap(), VaultState::LoggedOut);
}

#[test]
fn login_before_setup_is_not_initialized() {
    let dir = TempDir::new().unwrap();
    let mut vault = open(&dir);
    assert!(matches!(vault.login(PW), Err(PassVaultError::NotInitialized)));
}

#[test]
fn weak_master_passwords_are_rejected() {
    let dir = TempDir::new().unwrap();
    let mut vault = open(&dir);

    for weak in ["short", "alllowercase1", "ALLUPPER123!", "NoDigits!!", "NoSymbol123"] {
        assert!(
            matches!(vault.setup(weak), Err(PassVaultError::Validation(_))),
            "{weak} should be rejected"
        );
    }
    assert_eq!(vault.state().unwrap(), VaultState::Uninitialized);

    vault.setup("Abcd123!").unwrap();
}

// ---------------------------------------------------------------------------
// Credential round-trips
// ---------------------------------------------------------------------------

#[test]
fn add_then_list_survives_restart() {
    let (dir, mut vault) = fresh();
    let added = vault
        .add_credential(&CredentialDraft::new("Gmail", "x"))
        .unwrap();

    let listed = vault.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Gmail");
    assert_eq!(listed[0].id, added.id);
    drop(vault);

    let mut vault = open(&dir);
    vault.login(PW).unwrap();
    let reloaded = vault.list().unwrap();
    assert_eq!(reloaded, listed);
}

#[test]
fn update_persists_and_keeps_created_at() {
    let (dir, mut vault) = fresh();
    let added = vault
        .add_credential(&CredentialDraft::new("Gmail", "x"))
        .unwrap();

    let mut patch = CredentialPatch::default();
    patch.username = Some("alice".into());
    patch.password = Some("y".into());
    let updated = vault.update_credential(added.id, &patch).unwrap();
    assert_eq!(updated.created_at, added.created_at);
    assert!(updated.updated_at >= added.updated_at);
    drop(vault);

    let mut vault = open(&dir);
    vault.login(PW).unwrap();
    let c = vault.get_by_id(added.id).unwrap();
    assert_eq!(c.username.as_deref(), Some("alice"));
    assert_eq!(c.password, "y");
}

#[test]
fn delete_is_not_resurrected_by_restart() {
    let (dir, mut vault) = fresh();
    let gone = vault
        .add_credential(&CredentialDraft::new("Old", "x"))
        .unwrap();
    vault
        .add_credential(&CredentialDraft::new("Kept", "y"))
        .unwrap();
    vault.delete_credential(gone.id).unwrap();
    drop(vault);

    let mut vault = open(&dir);
    vault.login(PW).unwrap();
    assert!(matches!(
        vault.get_by_id(gone.id),
        Err(PassVaultError::NotFound(_))
    ));
    assert_eq!(vault.list().unwrap().len(), 1);
}

#[test]
fn invalid_credentials_are_rejected_without_change() {
    let (_dir, mut vault) = fresh();

    let mut bad = CredentialDraft::new("Site", "pw");
    bad.email = Some("not-an-email".into());
    assert!(matches!(
        vault.add_credential(&bad),
        Err(PassVaultError::Validation(_))
    ));
    assert!(matches!(
        vault.add_credential(&CredentialDraft::new("", "pw")),
        Err(PassVaultError::Validation(_))
    ));
    assert!(vault.list().unwrap().is_empty());
}

#[test]
fn search_and_sort() {
    let (_dir, mut vault) = fresh();
    for title in ["Netflix", "github", "Bank"] {
        vault
            .add_credential(&CredentialDraft::new(title, "pw"))
            .unwrap();
    }

    let titles: Vec<String> = vault
        .list_sorted(SortKey::Title, SortOrder::Asc)
        .unwrap()
        .iter()
        .map(|c| c.title.clone())
        .collect();
    assert_eq!(titles, vec!["Bank", "github", "Netflix"]);

    let hits = vault.search("GIT").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "github");
}

#[test]
fn health_report_flags_reuse() {
    let (_dir, mut vault) = fresh();
    vault
        .add_credential(&CredentialDraft::new("A", "same-password"))
        .unwrap();
    vault
        .add_credential(&CredentialDraft::new("B", "same-password"))
        .unwrap();

    let report = vault.health_report(&OfflineBreachCheck).unwrap();
    assert_eq!(report.len(), 2);
    assert!(report
        .iter()
        .all(|f| f.issues.contains(&HealthIssue::Reused { times: 2 })));
}

// ---------------------------------------------------------------------------
// Master password change and reset
// ---------------------------------------------------------------------------

#[test]
fn change_password_survives_restart() {
    let (dir, mut vault) = fresh();
    vault
        .add_credential(&CredentialDraft::new("Gmail", "x"))
        .unwrap();
    let before = vault.list().unwrap();

    vault.change_master_password(PW, "Newpass99#").unwrap();
    drop(vault);

    let mut vault = open(&dir);
    assert!(matches!(
        vault.login(PW),
        Err(PassVaultError::InvalidCredentials)
    ));
    vault.login("Newpass99#").unwrap();
    assert_eq!(vault.list().unwrap(), before);
}

#[test]
fn reset_returns_to_uninitialized() {
    let (dir, mut vault) = fresh();
    vault
        .add_credential(&CredentialDraft::new("Gmail", "x"))
        .unwrap();
    vault.reset().unwrap();
    drop(vault);

    let mut vault = open(&dir);
    assert_eq!(vault.state().unwrap(), VaultState::Uninitialized);
    assert!(matches!(vault.login(PW), Err(PassVaultError::NotInitialized)));

    vault.setup(PW).unwrap();
    assert!(vault.list().unwrap().is_empty());
}

#[test]
fn corrupted_blob_file_is_decryption_failure() {
    let (dir, vault) = fresh();
    drop(vault);

    let blob_path = dir.path().join("vault").join("encrypted_passwords.bin");
    let mut bytes = std::fs::read(&blob_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&blob_path, bytes).unwrap();

    let mut vault = open(&dir);
    assert!(matches!(vault.login(PW), Err(PassVaultError::DecryptionFailed)));
}

#[test]
fn config_params_change_does_not_break_login() {
    let (dir, vault) = fresh();
    drop(vault);

    // Costs recorded at setup win over whatever is configured later.
    let store = FileBlobStore::open(&dir.path().join("vault")).unwrap();
    let mut vault = VaultStore::new(
        store,
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB * 2,
            iterations: 2,
            parallelism: 1,
        },
    );
    vault.login(PW).unwrap();
}
