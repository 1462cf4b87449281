//! Dashboard preparation and rendering.
//!
//! # Flow
//!
//! ```text
//! DataResponse ──prepare()──► Dashboard ──┬─ render_text()
//!                                         ├─ render_html()
//!                                         └─ render_json()
//! ```
//!
//! `prepare` is the only step that can fail: a payload carrying a server
//! `error` or lacking `data` is not rendered at all.  Every value is scaled
//! to display units and formatted with two decimals before it reaches a
//! summary or a chart dataset.

use std::fmt::Write as _;

use home_core::{DataResponse, RoomSeries};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::Metric;

/// Error type for [`prepare`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The server answered with an `error` field.
    #[error("server reported an error: {0}")]
    Server(String),
    /// Neither `error` nor `data` was present.
    #[error("response contains no sensor data")]
    MissingData,
}

/// Latest reading of one room, ready to display (`"21.40 ℃"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentValue {
    pub room: String,
    pub text: String,
}

/// Everything shown for one metric: current values and its chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    #[serde(skip)]
    pub metric: Metric,
    pub current: Vec<CurrentValue>,
    pub chart: ChartSpec,
}

/// One panel per metric, in [`Metric::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub panels: Vec<Panel>,
}

// ── Chart specification ───────────────────────────────────────────────────────
//
// Mirrors the Chart.js 2.x configuration object so the JSON can be passed
// straight to `new Chart(element, spec)`.

/// A line-chart definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub datasets: Vec<Dataset>,
}

/// A room series with display-ready values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<ChartPoint>,
}

/// `y` is the two-decimal string, exactly as shown in the summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub x: i64,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub maintain_aspect_ratio: bool,
    pub title: ChartTitle,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    pub x_axes: Vec<TimeAxis>,
    /// Empty means auto-scale.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub y_axes: Vec<ValueAxis>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub scale_label: ScaleLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLabel {
    pub display: bool,
    pub label_string: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueAxis {
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub suggested_min: f64,
    pub suggested_max: f64,
}

impl ChartSpec {
    fn line(metric: Metric, datasets: Vec<Dataset>) -> Self {
        let y_axes = metric
            .suggested_bounds()
            .map(|(min, max)| ValueAxis {
                ticks: Ticks {
                    suggested_min: min,
                    suggested_max: max,
                },
            })
            .into_iter()
            .collect();

        Self {
            kind: "line",
            data: ChartData { datasets },
            options: ChartOptions {
                maintain_aspect_ratio: false,
                title: ChartTitle {
                    display: true,
                    text: metric.title().to_string(),
                },
                scales: Scales {
                    x_axes: vec![TimeAxis {
                        kind: "time",
                        scale_label: ScaleLabel {
                            display: true,
                            label_string: "Date".to_string(),
                        },
                    }],
                    y_axes,
                },
            },
        }
    }
}

// ── Preparation ───────────────────────────────────────────────────────────────

/// Formats a display-unit value with two decimals.
///
/// Values exactly halfway between two results (`21.125`) round away from
/// zero, the way browsers format them, rather than to the even digit.
pub fn format_value(value: f64) -> String {
    // A double is an exact two-decimal tie only when it is an odd number of
    // eighths (.125, .375, .625, .875).
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{value:.2}")
}

/// Builds the dashboard from a response.
///
/// # Errors
///
/// - [`RenderError::Server`] if the response carries a non-empty `error`
///   (also logged at `error` level).
/// - [`RenderError::MissingData`] if `data` is absent.
pub fn prepare(response: &DataResponse) -> Result<Dashboard, RenderError> {
    if let Some(message) = response.server_error() {
        error!("data server returned an error: {message}");
        return Err(RenderError::Server(message.to_string()));
    }
    let data = response.data.as_ref().ok_or(RenderError::MissingData)?;

    let panels = Metric::ALL
        .iter()
        .map(|&metric| {
            let rooms = metric.series(data);
            Panel {
                metric,
                current: current_values(metric, rooms),
                chart: ChartSpec::line(metric, datasets(metric, rooms)),
            }
        })
        .collect();

    Ok(Dashboard { panels })
}

fn current_values(metric: Metric, rooms: &[RoomSeries]) -> Vec<CurrentValue> {
    rooms
        .iter()
        .filter_map(|room| match room.latest() {
            Some(point) => Some(CurrentValue {
                room: room.label.clone(),
                text: format!("{} {}", format_value(metric.scale(point.y)), metric.unit()),
            }),
            None => {
                debug!("{metric}: room {:?} has no readings, skipped", room.label);
                None
            }
        })
        .collect()
}

fn datasets(metric: Metric, rooms: &[RoomSeries]) -> Vec<Dataset> {
    rooms
        .iter()
        .map(|room| Dataset {
            label: room.label.clone(),
            data: room
                .data
                .iter()
                .map(|p| ChartPoint {
                    x: p.x,
                    y: format_value(metric.scale(p.y)),
                })
                .collect(),
        })
        .collect()
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Plain-text summary of the current values.
///
/// ```text
/// Temperature
///   living: 21.40 ℃
/// ```
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    for panel in &dashboard.panels {
        let _ = writeln!(out, "{}", panel.metric);
        if panel.current.is_empty() {
            let _ = writeln!(out, "  (no readings)");
        }
        for value in &panel.current {
            let _ = writeln!(out, "  {}: {}", value.room, value.text);
        }
    }
    out
}

/// HTML definition lists, one per metric, with ids `<metric>-current`.
pub fn render_html(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    for panel in &dashboard.panels {
        let _ = writeln!(out, r#"<dl id="{}-current">"#, panel.metric.key());
        for value in &panel.current {
            let _ = writeln!(
                out,
                r#"<dt class="text-muted">{}</dt><dd>{}</dd>"#,
                escape_html(&value.room),
                escape_html(&value.text)
            );
        }
        let _ = writeln!(out, "</dl>");
    }
    out
}

/// Chart specs as a pretty-printed JSON array, one per metric.
///
/// # Errors
///
/// Returns the serializer error, which only occurs on non-finite values.
pub fn render_json(dashboard: &Dashboard) -> Result<String, serde_json::Error> {
    let charts: Vec<&ChartSpec> = dashboard.panels.iter().map(|p| &p.chart).collect();
    serde_json::to_string_pretty(&charts)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ── Tests ─────────────────────────────────────────────────────────────────────
