//! Application layer for the provisioning tool.
//!
//! Contains the use cases:
//! - `ensure_line`: the ConfigFileEditor, one idempotent edit of one file.
//! - `provision`: runs an ordered plan of edits and collects a report.
//!
//! Use cases talk to the file system only through the [`TargetStore`] trait,
//! which the infrastructure layer implements.

pub mod ensure_line;
pub mod provision;

pub use ensure_line::{ConfigFileEditor, EditError, TargetStore};
pub use provision::{run_plan, ProvisionReport, ProvisionTarget, TargetReport};
