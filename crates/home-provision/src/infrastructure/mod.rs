//! Infrastructure layer for the provisioning tool.
//!
//! Contains OS-facing adapters: the local file-system store, user and group
//! name resolution, and TOML configuration loading.
//!
//! **Dependency rule**: this layer may depend on `application` and `home_core`,
//! but MUST NOT be imported by the `application` or domain layers (tests
//! excepted, which use the mock store).

pub mod accounts;
pub mod filesystem;
pub mod storage;
