//! Dashboard configuration types.
//!
//! [`DashboardConfig`] holds everything one fetch-and-render run needs.  The
//! binary fills it from CLI arguments and `IOT_HOME_*` environment variables;
//! tests build it directly.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Accepted shape of a `range` or `interval` query value, as enforced by the
/// data server.
static SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,2}[smhd]$").expect("span regex must compile"));

/// Error type for [`TimeSpan`] parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    #[error("time span {0:?} must be one or two digits followed by s, m, h or d")]
    Invalid(String),
}

/// A server-side time span such as `30m` or `15s`.
///
/// Only values the server accepts can be constructed, so an invalid range is
/// rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSpan(String);

impl TimeSpan {
    /// Default history window.
    pub fn default_range() -> Self {
        Self("30m".to_string())
    }

    /// Default aggregation interval.
    pub fn default_interval() -> Self {
        Self("15s".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TimeSpan {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if SPAN_RE.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(SpanError::Invalid(s.to_string()))
        }
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All runtime configuration for one dashboard run.
///
/// # Example
///
/// ```rust
/// use home_dashboard::domain::DashboardConfig;
///
/// let cfg = DashboardConfig::default();
/// assert_eq!(cfg.range.as_str(), "30m");
/// ```
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Origin serving `/data.json`, e.g. `http://raspberrypi.local:8080`.
    pub base_url: String,

    /// How far back the history goes.
    pub range: TimeSpan,

    /// Width of each aggregation bucket.
    pub interval: TimeSpan,

    /// Upper bound for the whole HTTP request.
    pub timeout: Duration,
}

impl DashboardConfig {
    /// Full URL of the data document, without the query string.
    pub fn data_url(&self) -> String {
        format!("{}/data.json", self.base_url.trim_end_matches('/'))
    }
}

impl Default for DashboardConfig {
    /// | Field    | Default                 |
    /// |----------|-------------------------|
    /// | base_url | `http://localhost:8080` |
    /// | range    | `30m`                   |
    /// | interval | `15s`                   |
    /// | timeout  | 10 seconds              |
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            range: TimeSpan::default_range(),
            interval: TimeSpan::default_interval(),
            timeout: Duration::from_secs(10),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_span_accepts_one_and_two_digits() {
        for value in ["5s", "15s", "30m", "1h", "12h", "7d", "99d"] {
            let span: TimeSpan = value.parse().expect(value);
            assert_eq!(span.as_str(), value);
        }
    }

    #[test]
    fn test_time_span_rejects_three_digits() {
        assert_eq!(
            "100m".parse::<TimeSpan>(),
            Err(SpanError::Invalid("100m".to_string()))
        );
    }

    #[test]
    fn test_time_span_rejects_unknown_unit() {
        assert!("5w".parse::<TimeSpan>().is_err());
        assert!("5".parse::<TimeSpan>().is_err());
        assert!("m".parse::<TimeSpan>().is_err());
    }

    #[test]
    fn test_time_span_rejects_surrounding_text() {
        // Anchored: nothing may be smuggled into the query string.
        assert!("30m&range=1d".parse::<TimeSpan>().is_err());
        assert!(" 30m".parse::<TimeSpan>().is_err());
    }

    #[test]
    fn test_default_config() {
        // Arrange / Act
        let cfg = DashboardConfig::default();
        // Assert
        assert_eq!(cfg.range.as_str(), "30m");
        assert_eq!(cfg.interval.as_str(), "15s");
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_data_url_handles_trailing_slash() {
        let mut cfg = DashboardConfig {
            base_url: "http://pi.local:8080/".to_string(),
            ..DashboardConfig::default()
        };
        assert_eq!(cfg.data_url(), "http://pi.local:8080/data.json");

        cfg.base_url = "http://pi.local:8080".to_string();
        assert_eq!(cfg.data_url(), "http://pi.local:8080/data.json");
    }
}
