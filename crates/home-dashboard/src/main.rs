//! IoT Home dashboard client: entry point.
//!
//! Fetches the sensor history from the data server and prints the current
//! value of every room, or the chart definitions for a web page.
//!
//! # Usage
//!
//! ```text
//! home-dashboard [OPTIONS]
//!
//! Options:
//!   --base-url <URL>    Data server origin [default: http://localhost:8080]
//!   --range <SPAN>      History window, e.g. 30m, 12h, 7d [default: 30m]
//!   --interval <SPAN>   Aggregation interval [default: 15s]
//!   --format <FORMAT>   text | html | json [default: text]
//!   --timeout <SECS>    Request timeout in seconds [default: 10]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable            | Default                 |
//! |---------------------|-------------------------|
//! | `IOT_HOME_URL`      | `http://localhost:8080` |
//! | `IOT_HOME_RANGE`    | `30m`                   |
//! | `IOT_HOME_INTERVAL` | `15s`                   |

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use home_dashboard::application::{prepare, render_html, render_json, render_text};
use home_dashboard::domain::{DashboardConfig, TimeSpan};
use home_dashboard::infrastructure::DataClient;

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Current values as plain text.
    Text,
    /// `<dl>` fragments for the dashboard page.
    Html,
    /// Chart.js line-chart definitions.
    Json,
}

/// IoT Home dashboard client.
#[derive(Debug, Parser)]
#[command(
    name = "home-dashboard",
    about = "Show current room readings and chart definitions from the IoT Home data server",
    version
)]
struct Cli {
    /// Origin of the data server; `/data.json` is appended.
    #[arg(long, default_value = "http://localhost:8080", env = "IOT_HOME_URL")]
    base_url: String,

    /// History window: one or two digits followed by s, m, h or d.
    #[arg(long, default_value = "30m", env = "IOT_HOME_RANGE")]
    range: TimeSpan,

    /// Aggregation interval, same syntax as `--range`.
    #[arg(long, default_value = "15s", env = "IOT_HOME_INTERVAL")]
    interval: TimeSpan,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

impl Cli {
    fn into_dashboard_config(self) -> (DashboardConfig, Format) {
        let config = DashboardConfig {
            base_url: self.base_url,
            range: self.range,
            interval: self.interval,
            timeout: Duration::from_secs(self.timeout),
        };
        (config, self.format)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Invalid spans are rejected here, before any request.
    let (config, format) = Cli::parse().into_dashboard_config();

    info!(
        "fetching {} (range={}, interval={})",
        config.data_url(),
        config.range,
        config.interval
    );

    let client = DataClient::new(config)?;
    let response = client
        .fetch()
        .await
        .with_context(|| format!("fetching {}", client.config().data_url()))?;

    let dashboard = prepare(&response)?;

    let output = match format {
        Format::Text => render_text(&dashboard),
        Format::Html => render_html(&dashboard),
        Format::Json => render_json(&dashboard)?,
    };
    print!("{output}");

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
