//! Application layer for home-dashboard.
//!
//! Turns a fetched [`home_core::DataResponse`] into a [`Dashboard`] and
//! renders it as text, HTML fragments or chart JSON.

pub mod render;

pub use render::{
    format_value, prepare, render_html, render_json, render_text, ChartSpec, CurrentValue,
    Dashboard, Panel, RenderError,
};
