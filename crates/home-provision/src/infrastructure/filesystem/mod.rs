//! Local file-system implementation of [`TargetStore`].
//!
//! # Whole-file replacement
//!
//! `replace` never writes into the target in place.  The new content goes to
//! a temporary file in the same directory, is flushed to disk, and is then
//! renamed over the target.  A rename within one directory is atomic, so a
//! power cut mid-provisioning leaves either the old `/boot/config.txt` or the
//! new one, never a truncated file that stops the Pi from booting.
//!
//! The temporary file takes the permission bits of the file it replaces, so
//! the target never appears with `tempfile`'s private `0600` mode.
//!
//! Symlinked targets are resolved first so the link itself survives.

pub mod mock;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use home_core::TargetFile;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::application::ensure_line::{EditError, TargetStore};
use crate::infrastructure::accounts::AccountDatabase;

/// Reads and writes real files; resolves owner and group names through an
/// [`AccountDatabase`].
pub struct LocalTargetStore {
    accounts: AccountDatabase,
}

impl LocalTargetStore {
    pub fn new(accounts: AccountDatabase) -> Self {
        Self { accounts }
    }

    /// Creates a store whose names resolve against `<root>/etc/passwd` and
    /// `<root>/etc/group`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Read`] if the account files exist but cannot be read.
    pub fn for_root(root: &Path) -> Result<Self, EditError> {
        Ok(Self::new(AccountDatabase::load(root)?))
    }
}

impl TargetStore for LocalTargetStore {
    fn read(&self, path: &Path) -> Result<String, EditError> {
        fs::read_to_string(path).map_err(|source| EditError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn replace(&self, path: &Path, content: &str) -> Result<(), EditError> {
        let write_err = |source: io::Error| EditError::Write {
            path: path.to_path_buf(),
            source,
        };

        let real_path = fs::canonicalize(path).map_err(write_err)?;
        let dir = real_path.parent().unwrap_or_else(|| Path::new("/"));

        let permissions = fs::metadata(&real_path).map_err(write_err)?.permissions();

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().set_permissions(permissions).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&real_path).map_err(|e| write_err(e.error))?;

        debug!("replaced {} ({} bytes)", real_path.display(), content.len());
        Ok(())
    }

    fn check_metadata(&self, target: &TargetFile) -> Result<(), EditError> {
        self.accounts.resolve_user(&target.owner)?;
        self.accounts.resolve_group(&target.group)?;
        Ok(())
    }

    fn apply_metadata(&self, target: &TargetFile) -> Result<(), EditError> {
        let uid = self.accounts.resolve_user(&target.owner)?;
        let gid = self.accounts.resolve_group(&target.group)?;
        set_owner_and_mode(&target.path, uid, gid, target.mode.bits()).map_err(|source| {
            EditError::Metadata {
                path: target.path.clone(),
                source,
            }
        })
    }
}

#[cfg(unix)]
fn set_owner_and_mode(path: &Path, uid: u32, gid: u32, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::os::unix::fs::chown(path, Some(uid), Some(gid))?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_owner_and_mode(_path: &Path, _uid: u32, _gid: u32, _mode: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "owner and mode can only be set on Unix",
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
