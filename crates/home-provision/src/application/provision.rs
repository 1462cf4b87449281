//! ProvisionUseCase: runs an ordered plan of configuration edits.
//!
//! The default plan has two steps (see `infrastructure::storage::config`):
//!
//! ```text
//! /boot/config.txt  ── ensure "dtparam=i2c_arm=on"
//! /etc/modules      ── ensure "i2c-dev"
//! ```
//!
//! Steps run in order.  The first failure stops the run and is returned to
//! the operator; targets after it are not touched.

use std::path::{Path, PathBuf};

use home_core::{EditOutcome, EditRule, TargetFile};
use tracing::info;

use super::ensure_line::{ConfigFileEditor, EditError};

/// One step of a plan: a file and the rule it must satisfy.
#[derive(Debug, Clone)]
pub struct ProvisionTarget {
    pub file: TargetFile,
    pub rule: EditRule,
}

impl ProvisionTarget {
    pub fn new(file: TargetFile, rule: EditRule) -> Self {
        Self { file, rule }
    }

    /// Re-anchors the file path under `root`.
    pub fn rebased(self, root: &Path) -> Self {
        Self {
            file: self.file.rebased(root),
            rule: self.rule,
        }
    }
}

/// Outcome of one completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub path: PathBuf,
    pub directive: String,
    pub outcome: EditOutcome,
}

/// Outcomes of a whole plan, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub entries: Vec<TargetReport>,
}

impl ProvisionReport {
    /// Number of files whose content was (or, in a dry run, would be) rewritten.
    pub fn changed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_changed())
            .count()
    }

    /// `true` when no file needed a content change.
    pub fn is_converged(&self) -> bool {
        self.changed_count() == 0
    }
}

/// Applies every target in order.
///
/// # Errors
///
/// Returns the first [`EditError`]; earlier edits stay applied.
pub fn run_plan(
    editor: &ConfigFileEditor,
    targets: &[ProvisionTarget],
) -> Result<ProvisionReport, EditError> {
    let mut report = ProvisionReport::default();

    for target in targets {
        let outcome = editor.ensure_line(&target.file, &target.rule)?;
        info!(
            "{} [{}]: {outcome}",
            target.file.path.display(),
            target.rule.directive()
        );
        report.entries.push(TargetReport {
            path: target.file.path.clone(),
            directive: target.rule.directive().to_string(),
            outcome,
        });
    }

    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
