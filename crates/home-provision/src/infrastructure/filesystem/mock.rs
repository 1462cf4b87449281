//! In-memory target store for unit testing.
//!
//! `MockTargetStore` keeps file contents in a `HashMap` and records every
//! whole-file replacement and metadata assignment so tests can assert on
//! exactly which side effects the editor performed.
//!
//! # Failure switches
//!
//! Set `should_fail_resolve`, `should_fail_write` or `should_fail_metadata` before handing the store
//! to the editor to exercise error paths.  Reading a path that was never
//! inserted fails with `NotFound`, like the real file system.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use home_core::TargetFile;

use crate::application::ensure_line::{EditError, TargetStore};

/// A mock store that records all calls without touching the disk.
#[derive(Default)]
pub struct MockTargetStore {
    files: Mutex<HashMap<PathBuf, String>>,
    /// Every `(path, content)` passed to `replace`, in call order.
    pub replacements: Mutex<Vec<(PathBuf, String)>>,
    /// Every target passed to `apply_metadata`, in call order.
    pub metadata_calls: Mutex<Vec<TargetFile>>,
    /// Makes `check_metadata` report the owner as unknown.
    pub should_fail_resolve: bool,
    pub should_fail_write: bool,
    pub should_fail_metadata: bool,
}

impl MockTargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a single file.
    pub fn with_file(path: impl Into<PathBuf>, content: &str) -> Self {
        let store = Self::new();
        store.insert(path, content);
        store
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_string());
    }

    /// Current content of `path`, if present.
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl TargetStore for MockTargetStore {
    fn read(&self, path: &Path) -> Result<String, EditError> {
        self.content(path).ok_or_else(|| EditError::Read {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "mock: no such file"),
        })
    }

    fn check_metadata(&self, target: &TargetFile) -> Result<(), EditError> {
        if self.should_fail_resolve {
            return Err(EditError::UnknownUser(target.owner.clone()));
        }
        Ok(())
    }

    fn replace(&self, path: &Path, content: &str) -> Result<(), EditError> {
        if self.should_fail_write {
            return Err(EditError::Write {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "mock failure"),
            });
        }
        self.insert(path, content);
        self.replacements
            .lock()
            .unwrap()
            .push((path.to_path_buf(), content.to_string()));
        Ok(())
    }

    fn apply_metadata(&self, target: &TargetFile) -> Result<(), EditError> {
        if self.should_fail_metadata {
            return Err(EditError::Metadata {
                path: target.path.clone(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "mock failure"),
            });
        }
        self.metadata_calls.lock().unwrap().push(target.clone());
        Ok(())
    }
}
