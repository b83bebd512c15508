//! Directory-backed blob store.
//!
//! Each key maps to `<dir>/<key>.bin`.  Writes go to a temp file in the
//! same directory which is then renamed over the target, so a crash or
//! I/O error mid-write never destroys the previous value.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::errors::{PassVaultError, Result};

use super::BlobStore;

/// Blob store keeping one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// On Unix the directory is restricted to owner-only access.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                PassVaultError::Persistence(format!(
                    "cannot create vault directory {}: {e}",
                    dir.display()
                ))
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = fs::Permissions::from_mode(0o700);
                fs::set_permissions(dir, perms).map_err(|e| {
                    PassVaultError::Persistence(format!("cannot restrict vault directory: {e}"))
                })?;
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.bin")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PassVaultError::Persistence(format!("read '{key}': {e}"))),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = self.dir.join(format!(".{key}.bin.tmp"));

        write_synced(&tmp_path, value).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            PassVaultError::Persistence(format!("write '{key}': {e}"))
        })?;

        // Rename within one directory is atomic on the same filesystem.
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            PassVaultError::Persistence(format!("replace '{key}': {e}"))
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PassVaultError::Persistence(format!("remove '{key}': {e}"))),
        }
    }
}

/// Write `data` to `path` with owner-only permissions and flush it to disk.
fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty()
        || key.starts_with('.')
        || !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(PassVaultError::Persistence(format!(
            "invalid storage key '{key}'"
        )));
    }
    Ok(())
}
