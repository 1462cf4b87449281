//! JSON types for the `/data.json` sensor history document.
//!
//! # Wire shape
//!
//! ```json
//! {
//!   "data": {
//!     "temperature": [{"label": "living", "data": [{"x": 1700000000000, "y": 21.4}]}],
//!     "humidity":    [{"label": "living", "data": [{"x": 1700000000000, "y": 61.0}]}],
//!     "pressure":    [{"label": "living", "data": [{"x": 1700000000000, "y": 101325}]}]
//!   }
//! }
//! ```
//!
//! On failure the server sends `{"error": "..."}` instead of `data`.
//!
//! `x` is a Unix timestamp in milliseconds.  Rooms whose aggregation window
//! produced no values are serialized with `"data": null`, which is read as an
//! empty series.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level response of `GET /data.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SensorData>,
}

impl DataResponse {
    /// The server-reported error, if one is present and non-empty.
    pub fn server_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Room series for each measured quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    #[serde(default)]
    pub temperature: Vec<RoomSeries>,
    #[serde(default)]
    pub humidity: Vec<RoomSeries>,
    #[serde(default)]
    pub pressure: Vec<RoomSeries>,
}

/// Named time series of readings for one physical location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSeries {
    /// Room name, used as the dataset label.
    pub label: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Point>,
}

impl RoomSeries {
    /// Most recent reading, assuming points arrive in time order.
    pub fn latest(&self) -> Option<&Point> {
        self.data.last()
    }
}

/// A single reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Milliseconds since the Unix epoch.
    pub x: i64,
    pub y: f64,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Point>>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_payload() {
        // Arrange
        let json = r#"{
            "data": {
                "temperature": [{"label": "living", "data": [{"x": 1, "y": 21.5}, {"x": 2, "y": 22}]}],
                "humidity": [{"label": "living", "data": [{"x": 1, "y": 60.25}]}],
                "pressure": [{"label": "living", "data": [{"x": 1, "y": 101325}]}]
            }
        }"#;

        // Act
        let resp: DataResponse = serde_json::from_str(json).expect("deserialize");

        // Assert
        assert_eq!(resp.server_error(), None);
        let data = resp.data.expect("data present");
        assert_eq!(data.temperature[0].label, "living");
        assert_eq!(data.temperature[0].latest(), Some(&Point { x: 2, y: 22.0 }));
        assert_eq!(data.pressure[0].data[0].y, 101325.0);
    }

    #[test]
    fn test_deserialize_error_payload() {
        let resp: DataResponse =
            serde_json::from_str(r#"{"error":"database unavailable"}"#).unwrap();
        assert_eq!(resp.server_error(), Some("database unavailable"));
        assert!(resp.data.is_none());
    }

    #[test]
    fn test_empty_error_string_is_not_a_server_error() {
        let resp: DataResponse = serde_json::from_str(r#"{"error":"","data":{}}"#).unwrap();
        assert_eq!(resp.server_error(), None);
        assert_eq!(resp.data, Some(SensorData::default()));
    }

    #[test]
    fn test_null_series_data_reads_as_empty() {
        let series: RoomSeries = serde_json::from_str(r#"{"label":"attic","data":null}"#).unwrap();
        assert!(series.data.is_empty());
        assert_eq!(series.latest(), None);
    }

    #[test]
    fn test_serialize_omits_absent_error() {
        let resp = DataResponse {
            error: None,
            data: Some(SensorData::default()),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("error"), "got {json}");
    }
}
