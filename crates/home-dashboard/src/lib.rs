//! home-dashboard library crate.
//!
//! Fetches the sensor history document served at `/data.json` and turns it
//! into what a dashboard page shows: the latest value per room and one line
//! chart per quantity.
//!
//! # Architecture
//!
//! ```text
//! HTTP server (/data.json)
//!         ↓
//! [home-dashboard]
//!   ├── domain/          DashboardConfig, TimeSpan, Metric
//!   ├── application/     Value preparation, summaries, chart specs, rendering
//!   └── infrastructure/
//!         └── fetch/     reqwest client for /data.json
//! ```
//!
//! `domain` and `application` perform no I/O, so rendering is tested against
//! literal payloads.

/// Domain layer: configuration and the three measured quantities.
pub mod domain;

/// Application layer: payload preparation and output rendering.
pub mod application;

/// Infrastructure layer: HTTP fetch.
pub mod infrastructure;
