//! Infrastructure layer for home-dashboard.
//!
//! The only I/O the dashboard performs: one HTTP GET of `/data.json`.

pub mod fetch;

pub use fetch::{DataClient, FetchError};
