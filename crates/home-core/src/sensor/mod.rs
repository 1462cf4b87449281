//! Sensor history payload.
//!
//! The history server answers `GET /data.json` with one time series per room
//! for each measured quantity.  These types are the serde shadow of that JSON
//! document; presentation rules (units, scaling, chart bounds) live in the
//! dashboard crate.

pub mod payload;

pub use payload::{DataResponse, Point, RoomSeries, SensorData};
