//! Domain layer for home-dashboard.
//!
//! Plain types with no I/O: the request configuration and the description of
//! each measured quantity (label, unit, scaling, chart bounds).

pub mod config;
pub mod metric;

pub use config::{DashboardConfig, SpanError, TimeSpan};
pub use metric::Metric;
