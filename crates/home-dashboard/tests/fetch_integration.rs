//! Integration tests for the dashboard pipeline.
//!
//! Each test starts a one-shot HTTP stub on an ephemeral port, then runs
//! `DataClient::fetch` + `prepare` + a renderer against it end-to-end.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use home_dashboard::application::{prepare, render_html, render_text, RenderError};
use home_dashboard::domain::DashboardConfig;
use home_dashboard::infrastructure::{DataClient, FetchError};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Serves exactly one request with `status` and a JSON `body`.
///
/// Returns the base URL and a handle resolving to the request line.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.expect("write");
        stream.shutdown().await.ok();

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (format!("http://{addr}"), handle)
}

fn config_for(base_url: String) -> DashboardConfig {
    DashboardConfig {
        base_url,
        timeout: Duration::from_secs(5),
        ..DashboardConfig::default()
    }
}

const SAMPLE: &str = r#"{
  "data": {
    "temperature": [{"label": "living", "data": [{"x": 1700000000000, "y": 21.4}]}],
    "humidity":    [{"label": "living", "data": [{"x": 1700000000000, "y": 61.2}]}],
    "pressure":    [{"label": "living", "data": [{"x": 1700000000000, "y": 101325}]}]
  }
}"#;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_sends_range_and_interval() {
    // Arrange
    let (base, server) = serve_once("200 OK", SAMPLE.to_string()).await;
    let client = DataClient::new(DashboardConfig {
        range: "12h".parse().unwrap(),
        interval: "5m".parse().unwrap(),
        ..config_for(base)
    })
    .unwrap();

    // Act
    client.fetch().await.expect("fetch succeeds");

    // Assert
    let request_line = server.await.unwrap();
    assert!(
        request_line.starts_with("GET /data.json?range=12h&interval=5m "),
        "got {request_line}"
    );
}

#[tokio::test]
async fn test_fetch_and_render_text() {
    // Arrange
    let (base, _server) = serve_once("200 OK", SAMPLE.to_string()).await;
    let client = DataClient::new(config_for(base)).unwrap();

    // Act
    let response = client.fetch().await.unwrap();
    let text = render_text(&prepare(&response).unwrap());

    // Assert
    assert_eq!(
        text,
        "Temperature\n  living: 21.40 ℃\nHumidity\n  living: 61.20 %\nPressure\n  living: 1013.25 hPa\n"
    );
}

#[tokio::test]
async fn test_fetch_and_render_html() {
    let (base, _server) = serve_once("200 OK", SAMPLE.to_string()).await;
    let client = DataClient::new(config_for(base)).unwrap();

    let response = client.fetch().await.unwrap();
    let html = render_html(&prepare(&response).unwrap());

    assert!(html.contains(r#"<dl id="pressure-current">"#));
    assert!(html.contains(r#"<dt class="text-muted">living</dt><dd>1013.25 hPa</dd>"#));
}

#[tokio::test]
async fn test_error_field_aborts_rendering() {
    // Arrange
    let (base, _server) = serve_once("200 OK", r#"{"error": "query failed"}"#.to_string()).await;
    let client = DataClient::new(config_for(base)).unwrap();

    // Act
    let response = client.fetch().await.unwrap();

    // Assert
    assert_eq!(
        prepare(&response),
        Err(RenderError::Server("query failed".to_string()))
    );
}

#[tokio::test]
async fn test_non_success_status_carries_server_message() {
    let (base, _server) = serve_once(
        "400 Bad Request",
        r#"{"code": 400, "message": "range is not valid"}"#.to_string(),
    )
    .await;
    let client = DataClient::new(config_for(base)).unwrap();

    let result = client.fetch().await;

    match result {
        Err(FetchError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "range is not valid");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (base, _server) = serve_once("200 OK", "not json".to_string()).await;
    let client = DataClient::new(config_for(base)).unwrap();

    let result = client.fetch().await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = DataClient::new(config_for(format!("http://{addr}"))).unwrap();

    let result = client.fetch().await;

    assert!(matches!(result, Err(FetchError::Request { .. })));
}
