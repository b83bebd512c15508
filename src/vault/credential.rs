//! Credential entries stored inside the vault.
//!
//! A `Credential` is one website login.  New entries are built from a
//! `CredentialDraft`; edits are expressed as a `CredentialPatch`.  All
//! text fields are wiped from memory when a credential is dropped.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{PassVaultError, Result};

/// A single vault entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    /// Generated on creation, never changes.
    #[zeroize(skip)]
    pub id: Uuid,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Input for a new credential.
#[derive(Debug, Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CredentialDraft {
    pub title: String,
    pub url: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
    pub notes: Option<String>,
}

impl CredentialDraft {
    /// Draft with just the two required fields.
    pub fn new(title: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            username: None,
            email: None,
            password: password.into(),
            notes: None,
        }
    }
}

/// Partial update of an existing credential.
///
/// `None` leaves a field unchanged.  For the optional text fields,
/// `Some("")` clears the field.
#[derive(Debug, Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CredentialPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
}

impl CredentialPatch {
    /// `true` when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.notes.is_none()
    }
}

impl Credential {
    /// Validate a draft and stamp a new id and timestamps.
    pub fn from_draft(draft: &CredentialDraft, now: DateTime<Utc>) -> Result<Self> {
        let credential = Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            url: normalize_optional(draft.url.as_deref()),
            username: normalize_optional(draft.username.as_deref()),
            email: normalize_optional(draft.email.as_deref()),
            password: draft.password.clone(),
            notes: normalize_optional(draft.notes.as_deref()),
            created_at: now,
            updated_at: now,
        };
        credential.validate()?;
        Ok(credential)
    }

    /// Return a copy with `patch` applied and `updated_at` set to `now`.
    ///
    /// `self` is left untouched so a failed validation changes nothing.
    pub fn patched(&self, patch: &CredentialPatch, now: DateTime<Utc>) -> Result<Self> {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(password) = &patch.password {
            next.password.zeroize();
            next.password = password.clone();
        }
        if let Some(url) = &patch.url {
            next.url = normalize_optional(Some(url));
        }
        if let Some(username) = &patch.username {
            next.username = normalize_optional(Some(username));
        }
        if let Some(email) = &patch.email {
            next.email = normalize_optional(Some(email));
        }
        if let Some(notes) = &patch.notes {
            next.notes = normalize_optional(Some(notes));
        }
        next.updated_at = now;
        next.validate()?;
        Ok(next)
    }

    /// Check the stored-entry invariants.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PassVaultError::Validation("Title is required".into()));
        }
        if self.password.trim().is_empty() {
            return Err(PassVaultError::Validation("Password is required".into()));
        }
        if let Some(url) = &self.url {
            if !url_pattern().is_match(url) {
                return Err(PassVaultError::Validation(format!(
                    "'{url}' is not a valid URL (expected scheme://host)"
                )));
            }
        }
        if let Some(email) = &self.email {
            if !email_pattern().is_match(email) {
                return Err(PassVaultError::Validation(format!(
                    "'{email}' is not a valid email address"
                )));
            }
        }
        Ok(())
    }

    /// Case-insensitive match of `needle` (already lowercased) against
    /// the non-secret text fields.
    pub fn matches(&self, needle: &str) -> bool {
        let hit = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(needle));
        hit(Some(&self.title))
            || hit(self.url.as_deref())
            || hit(self.username.as_deref())
            || hit(self.email.as_deref())
            || hit(self.notes.as_deref())
    }
}

/// Trim optional text; blank becomes `None`.
fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+\S*$").expect("static regex is valid")
    })
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CredentialDraft {
        CredentialDraft {
            title: "  Gmail ".into(),
            url: Some("https://mail.google.com".into()),
            username: Some("".into()),
            email: Some("me@example.com".into()),
            password: "hunter2".into(),
            notes: None,
        }
    }

    #[test]
    fn from_draft_trims_and_stamps() {
        let now = Utc::now();
        let c = Credential::from_draft(&draft(), now).unwrap();
        assert_eq!(c.title, "Gmail");
        assert_eq!(c.username, None);
        assert_eq!(c.created_at, now);
        assert_eq!(c.updated_at, now);
    }

    #[test]
    fn ids_are_unique() {
        let now = Utc::now();
        let a = Credential::from_draft(&draft(), now).unwrap();
        let b = Credential::from_draft(&draft(), now).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_title_or_password_is_rejected() {
        let now = Utc::now();
        let err = Credential::from_draft(&CredentialDraft::new("   ", "x"), now).unwrap_err();
        assert!(matches!(err, PassVaultError::Validation(ref m) if m.contains("Title")));

        let err = Credential::from_draft(&CredentialDraft::new("Gmail", " "), now).unwrap_err();
        assert!(matches!(err, PassVaultError::Validation(ref m) if m.contains("Password")));
    }

    #[test]
    fn malformed_url_and_email_are_rejected() {
        let now = Utc::now();
        let mut bad_url = CredentialDraft::new("Site", "pw");
        bad_url.url = Some("not a url".into());
        assert!(Credential::from_draft(&bad_url, now).is_err());

        let mut bad_email = CredentialDraft::new("Site", "pw");
        bad_email.email = Some("nobody".into());
        assert!(Credential::from_draft(&bad_email, now).is_err());
    }

    #[test]
    fn patch_keeps_id_and_created_at() {
        let created = Utc::now();
        let c = Credential::from_draft(&draft(), created).unwrap();
        let later = created + chrono::Duration::seconds(5);

        let mut patch = CredentialPatch::default();
        patch.password = Some("new-secret".into());
        patch.url = Some(String::new());
        let next = c.patched(&patch, later).unwrap();

        assert_eq!(next.id, c.id);
        assert_eq!(next.created_at, created);
        assert_eq!(next.updated_at, later);
        assert_eq!(next.password, "new-secret");
        assert_eq!(next.url, None);
        assert_eq!(next.title, "Gmail");
    }

    #[test]
    fn invalid_patch_leaves_original_untouched() {
        let c = Credential::from_draft(&draft(), Utc::now()).unwrap();
        let mut patch = CredentialPatch::default();
        patch.title = Some("".into());
        assert!(c.patched(&patch, Utc::now()).is_err());
        assert_eq!(c.title, "Gmail");
    }

    #[test]
    fn matches_is_case_insensitive_and_skips_password() {
        let c = Credential::from_draft(&draft(), Utc::now()).unwrap();
        assert!(c.matches("gmail"));
        assert!(c.matches("example.com"));
        assert!(!c.matches("hunter2"));
    }

    #[test]
    fn debug_redacts_password() {
        let c = Credential::from_draft(&draft(), Utc::now()).unwrap();
        let shown = format!("{c:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn serde_roundtrip_omits_absent_fields() {
        let c = Credential::from_draft(&CredentialDraft::new("Bank", "pin"), Utc::now()).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("\"url\""));
        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
