//! In-memory credential collection and its pure repository operations.
//!
//! Nothing here touches storage.  `VaultStore` works on a copy of the
//! collection and only swaps it in after the new state is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{PassVaultError, Result};

use super::credential::{Credential, CredentialDraft, CredentialPatch};

/// Field to order a listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    Created,
    #[default]
    Updated,
}

/// Direction of a sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// The ordered set of credentials in a vault.
///
/// Serializes as a plain JSON array.  Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialCollection {
    entries: Vec<Credential>,
}

impl CredentialCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry is valid and no id appears twice.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            entry.validate()?;
            if !seen.insert(entry.id) {
                return Err(PassVaultError::Validation(format!(
                    "duplicate credential id {}",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the entries in storage order.
    pub fn entries(&self) -> &[Credential] {
        &self.entries
    }

    /// Validate `draft`, append it, and return the stored entry.
    pub fn add(&mut self, draft: &CredentialDraft, now: DateTime<Utc>) -> Result<&Credential> {
        let credential = Credential::from_draft(draft, now)?;
        self.entries.push(credential);
        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    /// Apply `patch` to the entry with `id`.
    pub fn update(
        &mut self,
        id: Uuid,
        patch: &CredentialPatch,
        now: DateTime<Utc>,
    ) -> Result<&Credential> {
        let index = self.position(id)?;
        let next = self.entries[index].patched(patch, now)?;
        self.entries[index] = next;
        Ok(&self.entries[index])
    }

    /// Remove the entry with `id`, returning it.
    pub fn remove(&mut self, id: Uuid) -> Result<Credential> {
        let index = self.position(id)?;
        Ok(self.entries.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Credential> {
        self.entries.iter().find(|c| c.id == id)
    }

    /// Entries whose title, url, username, email or notes contain `query`
    /// (case-insensitive).  A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Credential> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|c| needle.is_empty() || c.matches(&needle))
            .collect()
    }

    /// Entries ordered by `key` in `order`.
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<&Credential> {
        let mut out: Vec<&Credential> = self.entries.iter().collect();
        out.sort_by(|a, b| {
            let ord = match key {
                SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                SortKey::Created => a.created_at.cmp(&b.created_at),
                SortKey::Updated => a.updated_at.cmp(&b.updated_at),
            };
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        out
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.entries
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| PassVaultError::NotFound(id.to_string()))
    }
}
