//! The three quantities a room sensor reports.

use std::fmt;

use home_core::{RoomSeries, SensorData};

/// A measured quantity and how it is presented.
///
/// | Metric      | Unit | Raw scale | Chart y-bounds |
/// |-------------|------|-----------|----------------|
/// | Temperature | ℃    | 1         | 10 – 25        |
/// | Humidity    | %    | 1         | 55 – 70        |
/// | Pressure    | hPa  | 1/100     | auto           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    Pressure,
}

impl Metric {
    /// Display order on the dashboard.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::Pressure];

    /// Chart title.
    pub fn title(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Pressure => "Pressure",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "℃",
            Metric::Humidity => "%",
            Metric::Pressure => "hPa",
        }
    }

    /// Converts a raw reading into display units.  Pressure arrives in Pa.
    pub fn scale(self, raw: f64) -> f64 {
        match self {
            Metric::Pressure => raw / 100.0,
            Metric::Temperature | Metric::Humidity => raw,
        }
    }

    /// Suggested y-axis range, or `None` to let the chart auto-scale.
    pub fn suggested_bounds(self) -> Option<(f64, f64)> {
        match self {
            Metric::Temperature => Some((10.0, 25.0)),
            Metric::Humidity => Some((55.0, 70.0)),
            Metric::Pressure => None,
        }
    }

    /// Lower-case name used for HTML element ids (`temperature-current`).
    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Pressure => "pressure",
        }
    }

    /// The room series for this metric in a payload.
    pub fn series(self, data: &SensorData) -> &[RoomSeries] {
        match self {
            Metric::Temperature => &data.temperature,
            Metric::Humidity => &data.humidity,
            Metric::Pressure => &data.pressure,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
