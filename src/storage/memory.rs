//! In-memory blob store.
//!
//! Cloning a `MemoryBlobStore` yields another handle onto the same data,
//! which lets tests drop a vault and re-open it on the "same disk".
//! Write failures can be injected to exercise rollback paths.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::{PassVaultError, Result};

use super::BlobStore;

#[derive(Debug, Default)]
struct Inner {
    data: BTreeMap<String, Vec<u8>>,
    /// Writes (set/remove) still allowed before every write fails.
    write_budget: Option<usize>,
    /// Keys whose writes always fail.
    failing_keys: HashSet<String>,
}

/// Shared in-memory blob store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Allow `n` more successful writes, then fail every write.
    pub fn fail_writes_after(&self, n: usize) {
        self.lock().write_budget = Some(n);
    }

    /// Make every write to `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.lock().failing_keys.insert(key.to_string());
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.write_budget = None;
        inner.failing_keys.clear();
    }

    /// Keys currently present, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().data.keys().cloned().collect()
    }

    /// Overwrite a value directly, bypassing failure injection.
    pub fn poke(&self, key: &str, value: &[u8]) {
        self.lock().data.insert(key.to_string(), value.to_vec());
    }

    fn check_write(inner: &mut Inner, key: &str) -> Result<()> {
        if inner.failing_keys.contains(key) {
            return Err(PassVaultError::Persistence(format!(
                "write '{key}': injected failure"
            )));
        }
        match inner.write_budget {
            Some(0) => Err(PassVaultError::Persistence(format!(
                "write '{key}': injected failure"
            ))),
            Some(ref mut n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock().data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        Self::check_write(&mut inner, key)?;
        inner.data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut inner = self.lock();
        if !inner.data.contains_key(key) {
            return Ok(());
        }
        Self::check_write(&mut inner, key)?;
        inner.data.remove(key);
        Ok(())
    }
}
