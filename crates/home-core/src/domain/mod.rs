//! Domain entities for configuration-file provisioning.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, network libraries, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the core rule is "make sure this directive line is present and not
//! commented out".  Reading and writing the actual file is the job of the
//! provisioning crate's infrastructure layer.

/// Text transformation that enables a single directive.
///
/// See [`edit_rule::EditRule`] for the main type.
pub mod edit_rule;

/// Identity and desired metadata of a file to edit.
pub mod target;
