//! # home-core
//!
//! Shared library for IoT Home containing the configuration edit rules used
//! by the provisioning tool and the sensor payload types consumed by the
//! dashboard.
//!
//! This crate has zero dependencies on file systems, network sockets, or
//! async runtimes.  Everything in it is a pure function of its inputs.
//!
//! # Architecture overview (for beginners)
//!
//! A Raspberry Pi with a BME280 sensor needs the I2C bus enabled before the
//! sensor can be read.  That takes two edits: uncommenting (or appending)
//! `dtparam=i2c_arm=on` in `/boot/config.txt`, and loading the `i2c-dev`
//! kernel module from `/etc/modules`.
//!
//! - **`domain`** – The edit rules themselves.  An [`EditRule`] turns the
//!   current text of a configuration file into the desired text, and applying
//!   it twice gives the same result as applying it once.
//!
//! - **`sensor`** – The JSON document served at `/data.json`: one time series
//!   per room for temperature, humidity, and pressure.

pub mod domain;
pub mod sensor;

// Re-export the most-used types at the crate root so callers can write
// `home_core::EditRule` instead of `home_core::domain::edit_rule::EditRule`.
pub use domain::edit_rule::{EditOutcome, EditRule, RuleError};
pub use domain::target::{FileMode, ModeError, TargetFile};
pub use sensor::payload::{DataResponse, Point, RoomSeries, SensorData};
