//! Storage infrastructure: provisioning configuration.
//!
//! The `config` sub-module reads the TOML file that lists which files to edit
//! and which directive each must contain.  When the file does not exist the
//! built-in I2C plan is used, so a fresh Raspberry Pi needs no configuration
//! at all.

pub mod config;
