//! High-level vault operations used by the CLI (or any other front-end).
//!
//! `VaultStore` owns the session: whether the vault is unlocked, the
//! derived master key, and the decrypted credential collection.  Every
//! mutation is applied to a copy of the collection, encrypted and
//! persisted, and only then swapped in, so the in-memory state and the
//! stored blob never disagree after a call returns.
//!
//! A master password change replaces four storage keys at once.  The new
//! values are staged under `pending.*` keys and made authoritative by a
//! single `key_change_commit` write; see `commit_key_change`.

use chrono::Utc;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::kdf::{generate_salt, Argon2Params};
use crate::crypto::keys::MasterKey;
use crate::crypto::verifier;
use crate::errors::{PassVaultError, Result};
use crate::security::{self, BreachCheck, HealthFinding};
use crate::storage::{keys, BlobStore};

use super::collection::{CredentialCollection, SortKey, SortOrder};
use super::credential::{Credential, CredentialDraft, CredentialPatch};
use super::format;

/// Value written under `app_initialized`.
const INITIALIZED_FLAG: &[u8] = b"true";

/// Value written under `key_change_commit`.
const COMMIT_FLAG: &[u8] = b"1";

/// Where the vault is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No master password has been set up.
    Uninitialized,
    /// Set up, but no active session.
    LoggedOut,
    /// Unlocked: key and credentials are in memory.
    Authenticated,
}

/// Unlocked session state.  Dropping it wipes the key and every
/// credential's text fields.
struct Session {
    key: MasterKey,
    credentials: CredentialCollection,
}

/// The vault handle.  Create one with `VaultStore::new`, then `setup`
/// or `login` before touching credentials.
pub struct VaultStore<S: BlobStore> {
    /// Persisted state lives here.
    store: S,

    /// Argon2id cost for new salts and hashes.
    params: Argon2Params,

    /// `Some` only while authenticated.
    session: Option<Session>,
}

impl<S: BlobStore> VaultStore<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Wrap a blob store.  No I/O happens until the first operation.
    pub fn new(store: S, params: Argon2Params) -> Self {
        Self {
            store,
            params,
            session: None,
        }
    }

    /// Log out (wiping secrets) and hand back the underlying store.
    pub fn into_inner(self) -> S {
        let Self { store, session, .. } = self;
        drop(session);
        store
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Current lifecycle state, read from storage when not unlocked.
    pub fn state(&self) -> Result<VaultState> {
        if self.session.is_some() {
            return Ok(VaultState::Authenticated);
        }
        if self.is_initialized()? {
            Ok(VaultState::LoggedOut)
        } else {
            Ok(VaultState::Uninitialized)
        }
    }

    /// `true` once setup has completed.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.get(keys::INITIALIZED)?.is_some())
    }

    /// `true` while a session is active.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// First-time setup: choose the master password and start a session.
    ///
    /// The initialized flag is written last, so a failure part-way
    /// leaves the vault uninitialized.
    pub fn setup(&mut self, password: &str) -> Result<()> {
        if self.session.is_some() || self.is_initialized()? {
            return Err(PassVaultError::AlreadyInitialized);
        }
        security::validate_master_password(password)?;

        // Leftovers from an interrupted reset or key change.  The marker
        // goes first so a partial cleanup never exposes staged values.
        self.store.remove(keys::KEY_CHANGE_COMMIT)?;
        self.discard_staged()?;

        let params = self.params;
        let salt = generate_salt();
        let hash = verifier::hash(password.as_bytes(), &params)?;
        let key = MasterKey::derive(password.as_bytes(), &salt, &params)?;
        let credentials = CredentialCollection::new();
        let blob = format::encrypt_collection(&credentials, &key)?;

        self.store.set(keys::SALT, &salt)?;
        self.store.set(keys::KDF_PARAMS, &encode_params(&params)?)?;
        self.store.set(keys::MASTER_PASSWORD_HASH, hash.as_bytes())?;
        self.store.set(keys::PASSWORDS, &blob)?;
        self.store.set(keys::INITIALIZED, INITIALIZED_FLAG)?;

        self.session = Some(Session { key, credentials });
        Ok(())
    }

    /// Unlock the vault with the master password.
    ///
    /// A wrong password and an unreadable stored hash both yield
    /// `InvalidCredentials`.  A blob that fails to decrypt after the
    /// password verified is `DecryptionFailed`.
    pub fn login(&mut self, password: &str) -> Result<()> {
        if self.session.is_some() {
            return Err(PassVaultError::SessionActive);
        }
        if !self.is_initialized()? {
            return Err(PassVaultError::NotInitialized);
        }

        // Finish (or discard) any interrupted master password change.
        // If that fails the reads below still resolve through the journal.
        let _ = self.recover_key_change();

        let stored_hash = self
            .read(keys::MASTER_PASSWORD_HASH)?
            .ok_or(PassVaultError::NotInitialized)?;
        let salt = self.read(keys::SALT)?.ok_or(PassVaultError::NotInitialized)?;

        if !password_matches(password, &stored_hash) {
            return Err(PassVaultError::InvalidCredentials);
        }

        let params = self.stored_params()?;
        let key = MasterKey::derive(password.as_bytes(), &salt, &params)?;

        let credentials = match self.read(keys::PASSWORDS)? {
            Some(blob) => format::decrypt_collection(&blob, &key)?,
            None => CredentialCollection::new(),
        };

        self.session = Some(Session { key, credentials });
        Ok(())
    }

    /// End the session, wiping the key and decrypted credentials.
    pub fn logout(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => {
                drop(session);
                Ok(())
            }
            None => Err(PassVaultError::VaultLocked),
        }
    }

    /// Replace the master password, re-encrypting every credential under
    /// a key derived from the new password and a fresh salt.
    ///
    /// Either the whole (hash, salt, params, blob) set changes or none of
    /// it does: on `Err` the old password still unlocks the vault.
    pub fn change_master_password(&mut self, current: &str, new: &str) -> Result<()> {
        if self.session.is_none() {
            return Err(PassVaultError::VaultLocked);
        }
        self.recover_key_change()?;

        let stored_hash = self
            .read(keys::MASTER_PASSWORD_HASH)?
            .ok_or(PassVaultError::NotInitialized)?;
        if !password_matches(current, &stored_hash) {
            return Err(PassVaultError::InvalidCredentials);
        }
        security::validate_master_password(new)?;

        let params = self.params;
        let salt = generate_salt();
        let hash = verifier::hash(new.as_bytes(), &params)?;
        let key = MasterKey::derive(new.as_bytes(), &salt, &params)?;

        let session = self.session.as_mut().ok_or(PassVaultError::VaultLocked)?;
        let blob = format::encrypt_collection(&session.credentials, &key)?;

        let staged: [(&str, Vec<u8>); 4] = [
            (keys::MASTER_PASSWORD_HASH, hash.into_bytes()),
            (keys::SALT, salt.to_vec()),
            (keys::KDF_PARAMS, encode_params(&params)?),
            (keys::PASSWORDS, blob),
        ];
        commit_key_change(&mut self.store, &staged)?;

        // Durable from here on; the old key is wiped on drop.
        session.key = key;

        // A failed apply is replayed by `recover_key_change` before the
        // next login or blob write, so the change itself has succeeded.
        let _ = apply_key_change(&mut self.store);
        Ok(())
    }

    /// Erase every persisted key and any in-memory session.
    ///
    /// Valid in any state.  The initialized flag is removed first, so a
    /// reset that fails part-way still leaves the vault uninitialized.
    pub fn reset(&mut self) -> Result<()> {
        self.session = None;

        for key in keys::ALL {
            self.store.remove(key)?;
        }
        self.discard_staged()
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Add a credential and persist.  Returns the stored entry.
    pub fn add_credential(&mut self, draft: &CredentialDraft) -> Result<Credential> {
        self.mutate(|credentials| credentials.add(draft, Utc::now()).cloned())
    }

    /// Apply `patch` to the credential with `id` and persist.
    pub fn update_credential(&mut self, id: Uuid, patch: &CredentialPatch) -> Result<Credential> {
        self.mutate(|credentials| credentials.update(id, patch, Utc::now()).cloned())
    }

    /// Delete the credential with `id` and persist.
    pub fn delete_credential(&mut self, id: Uuid) -> Result<()> {
        self.mutate(|credentials| credentials.remove(id).map(drop))
    }

    /// Copy of the credential with `id`.
    pub fn get_by_id(&self, id: Uuid) -> Result<Credential> {
        self.credentials()?
            .get(id)
            .cloned()
            .ok_or_else(|| PassVaultError::NotFound(id.to_string()))
    }

    /// Copy of every credential, in storage order.
    pub fn list(&self) -> Result<Vec<Credential>> {
        Ok(self.credentials()?.entries().to_vec())
    }

    /// Copy of every credential, ordered by `key` in `order`.
    pub fn list_sorted(&self, key: SortKey, order: SortOrder) -> Result<Vec<Credential>> {
        Ok(self
            .credentials()?
            .sorted(key, order)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Copies of the credentials matching `query`.
    pub fn search(&self, query: &str) -> Result<Vec<Credential>> {
        Ok(self
            .credentials()?
            .search(query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Number of credentials in the unlocked vault.
    pub fn credential_count(&self) -> Result<usize> {
        Ok(self.credentials()?.len())
    }

    /// Plaintext export of every credential as pretty JSON.
    ///
    /// The returned buffer is wiped on drop.
    pub fn export_json(&self) -> Result<Zeroizing<String>> {
        serde_json::to_string_pretty(self.credentials()?)
            .map(Zeroizing::new)
            .map_err(|e| PassVaultError::SerializationError(format!("export: {e}")))
    }

    /// Plaintext export as CSV with a header row.  Fields containing a
    /// comma, quote or line break are quoted.
    pub fn export_csv(&self) -> Result<Zeroizing<String>> {
        let mut out = Zeroizing::new(String::from(
            "title,url,username,email,password,notes,created_at,updated_at\n",
        ));
        for c in self.credentials()?.entries() {
            let created = c.created_at.to_rfc3339();
            let updated = c.updated_at.to_rfc3339();
            let fields = [
                c.title.as_str(),
                c.url.as_deref().unwrap_or(""),
                c.username.as_deref().unwrap_or(""),
                c.email.as_deref().unwrap_or(""),
                c.password.as_str(),
                c.notes.as_deref().unwrap_or(""),
                created.as_str(),
                updated.as_str(),
            ];
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_csv_field(&mut out, field);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Plaintext export as human-readable text, one block per credential.
    pub fn export_txt(&self) -> Result<Zeroizing<String>> {
        let mut out = Zeroizing::new(String::new());
        for c in self.credentials()?.entries() {
            push_txt_line(&mut out, "Title", &c.title);
            let optional = [
                ("URL", &c.url),
                ("Username", &c.username),
                ("Email", &c.email),
            ];
            for (label, value) in optional {
                if let Some(value) = value {
                    push_txt_line(&mut out, label, value);
                }
            }
            push_txt_line(&mut out, "Password", &c.password);
            if let Some(notes) = &c.notes {
                push_txt_line(&mut out, "Notes", notes);
            }
            push_txt_line(&mut out, "Created", &c.created_at.to_rfc3339());
            push_txt_line(&mut out, "Updated", &c.updated_at.to_rfc3339());
            out.push('\n');
        }
        Ok(out)
    }

    /// Weak, reused and breached passwords in the unlocked vault.
    pub fn health_report(&self, breach: &dyn BreachCheck) -> Result<Vec<HealthFinding>> {
        Ok(security::health_report(self.credentials()?.entries(), breach))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn credentials(&self) -> Result<&CredentialCollection> {
        self.session
            .as_ref()
            .map(|s| &s.credentials)
            .ok_or(PassVaultError::VaultLocked)
    }

    /// Run `op` on a copy of the collection, persist the copy, then
    /// swap it in.  On any error the session is left as it was.
    fn mutate<T>(&mut self, op: impl FnOnce(&mut CredentialCollection) -> Result<T>) -> Result<T> {
        if self.session.is_none() {
            return Err(PassVaultError::VaultLocked);
        }
        self.recover_key_change()?;

        let session = self.session.as_mut().ok_or(PassVaultError::VaultLocked)?;
        let mut next = session.credentials.clone();
        let out = op(&mut next)?;

        let blob = format::encrypt_collection(&next, &session.key)?;
        self.store.set(keys::PASSWORDS, &blob)?;

        session.credentials = next;
        Ok(out)
    }

    /// Argon2id parameters recorded with the current salt.
    fn stored_params(&self) -> Result<Argon2Params> {
        match self.read(keys::KDF_PARAMS)? {
            Some(raw) => serde_json::from_slice(&raw)
                .map_err(|e| PassVaultError::InvalidVaultFormat(format!("kdf params: {e}"))),
            None => Ok(Argon2Params::default()),
        }
    }

    /// Read `key`, preferring its staged value while a key change is
    /// committed but not yet applied.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if keys::KEY_CHANGE_SET.contains(&key) && self.key_change_committed()? {
            if let Some(value) = self.store.get(&keys::pending(key))? {
                return Ok(Some(value));
            }
        }
        self.store.get(key)
    }

    fn key_change_committed(&self) -> Result<bool> {
        Ok(self.store.get(keys::KEY_CHANGE_COMMIT)?.is_some())
    }

    /// Complete a committed key change, or drop an uncommitted one.
    ///
    /// Must succeed before the blob is rewritten, otherwise a later
    /// apply would restore the stale staged blob.
    fn recover_key_change(&mut self) -> Result<()> {
        if self.key_change_committed()? {
            apply_key_change(&mut self.store)
        } else {
            self.discard_staged()
        }
    }

    fn discard_staged(&mut self) -> Result<()> {
        for key in keys::KEY_CHANGE_SET {
            self.store.remove(&keys::pending(key))?;
        }
        Ok(())
    }
}

/// Stage `entries` under their `pending.*` keys and write the commit
/// marker.  On failure the staged keys are removed and the live keys
/// were never touched.
fn commit_key_change<S: BlobStore>(store: &mut S, entries: &[(&str, Vec<u8>)]) -> Result<()> {
    let staged = entries
        .iter()
        .try_for_each(|(key, value)| store.set(&keys::pending(key), value))
        .and_then(|()| store.set(keys::KEY_CHANGE_COMMIT, COMMIT_FLAG));

    if let Err(e) = staged {
        for (key, _) in entries {
            let _ = store.remove(&keys::pending(key));
        }
        return Err(e);
    }
    Ok(())
}

/// Copy committed `pending.*` values over the live keys, then clear the
/// journal.  Safe to repeat: every step is idempotent.
fn apply_key_change<S: BlobStore>(store: &mut S) -> Result<()> {
    for key in keys::KEY_CHANGE_SET {
        let staged = keys::pending(key);
        if let Some(value) = store.get(&staged)? {
            store.set(key, &value)?;
        }
    }
    store.remove(keys::KEY_CHANGE_COMMIT)?;
    for key in keys::KEY_CHANGE_SET {
        store.remove(&keys::pending(key))?;
    }
    Ok(())
}

fn push_csv_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

fn push_txt_line(out: &mut String, label: &str, value: &str) {
    out.push_str(label);
    out.push_str(": ");
    // Continuation lines are indented so multi-line notes stay in their block.
    out.push_str(&value.replace('\n', "\n  "));
    out.push('\n');
}

/// Verify `password` against stored hash bytes, treating anything
/// unreadable as a mismatch.
fn password_matches(password: &str, stored_hash: &[u8]) -> bool {
    std::str::from_utf8(stored_hash)
        .ok()
        .and_then(|hash| verifier::verify(password.as_bytes(), hash).ok())
        .unwrap_or(false)
}

fn encode_params(params: &Argon2Params) -> Result<Vec<u8>> {
    serde_json::to_vec(params).map_err(|e| PassVaultError::SerializationError(format!("kdf params: {e}")))
}
