//! ConfigFileEditor: one idempotent read-modify-write of a configuration file.
//!
//! The editor reads the file once, applies an [`EditRule`] in memory, writes
//! the result back only if it differs, and then assigns owner, group, and
//! mode unconditionally.
//!
//! ```text
//! read ──► check owner/group ──► rule.evaluate ──► Changed?  ──► replace whole file
//!                                   │
//!                                   ▼
//!                        apply owner/group/mode
//! ```
//!
//! Each edit assumes exclusive access to the file for its duration.  There is
//! no locking; provisioning is a one-shot machine-setup task.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use home_core::{EditOutcome, EditRule, TargetFile};
use thiserror::Error;
use tracing::{debug, info};

/// Error type for configuration file edits.
///
/// Every variant is fatal to the provisioning step; nothing is retried.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set owner/group/mode on {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown user {0:?}")]
    UnknownUser(String),

    #[error("unknown group {0:?}")]
    UnknownGroup(String),
}

/// File-system port used by [`ConfigFileEditor`].
///
/// The production implementation is
/// `infrastructure::filesystem::LocalTargetStore`; tests use
/// `infrastructure::filesystem::mock::MockTargetStore`.
pub trait TargetStore: Send + Sync {
    /// Reads the whole file as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String, EditError>;

    /// Fails if `target.owner` or `target.group` cannot be resolved.
    ///
    /// Called before any write so that an unknown name never leaves a
    /// rewritten file behind.
    fn check_metadata(&self, target: &TargetFile) -> Result<(), EditError>;

    /// Replaces the whole file with `content`.
    ///
    /// The new file keeps the permission bits of the one it replaces.
    ///
    /// Implementations must never leave a partially written file behind.
    fn replace(&self, path: &Path, content: &str) -> Result<(), EditError>;

    /// Assigns `target.owner`, `target.group`, and `target.mode` to `target.path`.
    fn apply_metadata(&self, target: &TargetFile) -> Result<(), EditError>;
}

/// The ConfigFileEditor use case.
pub struct ConfigFileEditor {
    store: Arc<dyn TargetStore>,
    dry_run: bool,
}

impl ConfigFileEditor {
    /// Creates an editor that writes through `store`.
    pub fn new(store: Arc<dyn TargetStore>) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// In dry-run mode the outcome is computed and logged, but neither the
    /// content nor the metadata is written.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Makes sure `rule`'s directive is active in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] if the file cannot be read or written, or if the
    /// owner, group, or mode cannot be applied.
    pub fn ensure_line(
        &self,
        target: &TargetFile,
        rule: &EditRule,
    ) -> Result<EditOutcome, EditError> {
        let path = &target.path;
        let original = self.store.read(path)?;
        self.store.check_metadata(target)?;
        let (edited, outcome) = rule.evaluate(&original);
        debug!(
            "{}: directive {:?} {} ({} -> {} bytes)",
            path.display(),
            rule.directive(),
            outcome,
            original.len(),
            edited.len()
        );

        if self.dry_run {
            info!("dry run: {} would be {outcome}", path.display());
            return Ok(outcome);
        }

        if outcome.is_changed() {
            self.store.replace(path, &edited)?;
            info!("{}: enabled {:?}", path.display(), rule.directive());
        }

        self.store.apply_metadata(target)?;
        debug!(
            "{}: owner={} group={} mode={}",
            path.display(),
            target.owner,
            target.group,
            target.mode
        );

        Ok(outcome)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
