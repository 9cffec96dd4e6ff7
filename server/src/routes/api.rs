use std::fmt::Write as _;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use riesgo_shared::ClientConfig;
use riesgo_shared::download::DOWNLOADS;

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0);
    let data_available = tokio::fs::metadata(state.data_dir.as_ref())
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    let mut downloads = Vec::with_capacity(DOWNLOADS.len());
    for entry in &DOWNLOADS {
        let present = tokio::fs::metadata(state.data_dir.join(entry.filename))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        downloads.push(serde_json::json!({
            "filename": entry.filename,
            "present": present,
        }));
    }

    Json(serde_json::json!({
        "status": "ok",
        "uptime_secs": uptime_secs,
        "data_available": data_available,
        "geocoder_configured": state.client_config.geocoder_enabled(),
        "downloads": downloads,
        "observability": {
            "downloads_served_total": observability.downloads_served_total,
            "download_bytes_total": observability.download_bytes_total,
            "downloads_rejected_total": observability.downloads_rejected_total,
            "download_failures_total": observability.download_failures_total,
        }
    }))
}

/// Runtime settings for the browser bundle (geocoder key and search box).
pub async fn client_config(State(state): State<AppState>) -> impl IntoResponse {
    let config: ClientConfig = (*state.client_config).clone();
    ([(header::CACHE_CONTROL, "no-store")], Json(config))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0);
    let body = render_prometheus_metrics(uptime_secs, state.observability.snapshot());

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(uptime_secs: i64, observability: ObservabilitySnapshot) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "# HELP riesgo_uptime_seconds Seconds since the server started."
    );
    let _ = writeln!(body, "# TYPE riesgo_uptime_seconds gauge");
    let _ = writeln!(body, "riesgo_uptime_seconds {uptime_secs}");

    let counters: [(&str, &str, u64); 4] = [
        (
            "riesgo_downloads_served_total",
            "Total dataset downloads served.",
            observability.downloads_served_total,
        ),
        (
            "riesgo_download_bytes_total",
            "Total bytes sent by the download endpoint.",
            observability.download_bytes_total,
        ),
        (
            "riesgo_downloads_rejected_total",
            "Total download requests rejected by the allow-list.",
            observability.downloads_rejected_total,
        ),
        (
            "riesgo_download_failures_total",
            "Total allow-listed downloads that failed to read from disk.",
            observability.download_failures_total,
        ),
    ];
    for (name, help, value) in counters {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} counter");
        let _ = writeln!(body, "{name} {value}");
    }

    body
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use riesgo_shared::ClientConfig;

    use super::render_prometheus_metrics;
    use crate::state::{AppState, ObservabilitySnapshot};

    async fn spawn_test_server(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let app = crate::app::build_app(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        (addr, handle)
    }

    #[test]
    fn metrics_output_contains_prometheus_help_type_and_values() {
        let observability = ObservabilitySnapshot {
            downloads_served_total: 12,
            download_bytes_total: 4096,
            downloads_rejected_total: 3,
            download_failures_total: 1,
        };

        let metrics = render_prometheus_metrics(90, observability);

        assert!(metrics.contains("# HELP riesgo_uptime_seconds"));
        assert!(metrics.contains("# TYPE riesgo_uptime_seconds gauge"));
        assert!(metrics.contains("riesgo_uptime_seconds 90"));
        assert!(metrics.contains("# TYPE riesgo_downloads_served_total counter"));
        assert!(metrics.contains("riesgo_downloads_served_total 12"));
        assert!(metrics.contains("riesgo_download_bytes_total 4096"));
        assert!(metrics.contains("riesgo_downloads_rejected_total 3"));
        assert!(metrics.contains("riesgo_download_failures_total 1"));
    }

    #[tokio::test]
    async fn health_reports_dataset_presence_and_counters() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("la_plata.geojson"), "{}").expect("write fixture");
        let state = AppState::new(
            dir.path().to_path_buf(),
            dir.path().join("dist"),
            ClientConfig::default(),
        );
        let (addr, server_handle) = spawn_test_server(state).await;
        let base_url = format!("http://{addr}");
        let client = reqwest::Client::new();

        let rejected = client
            .get(format!("{base_url}/api/download/other.geojson"))
            .send()
            .await
            .expect("download request");
        assert_eq!(rejected.status(), reqwest::StatusCode::NOT_FOUND);

        let health = client
            .get(format!("{base_url}/api/health"))
            .send()
            .await
            .expect("health request")
            .error_for_status()
            .expect("health status")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");

        assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert_eq!(
            health.get("data_available").and_then(|v| v.as_bool()),
            Some(true)
        );
        assert_eq!(
            health
                .get("geocoder_configured")
                .and_then(|v| v.as_bool()),
            Some(false)
        );
        let downloads = health
            .get("downloads")
            .and_then(|v| v.as_array())
            .expect("downloads array");
        let present: Vec<(&str, bool)> = downloads
            .iter()
            .filter_map(|entry| {
                Some((
                    entry.get("filename")?.as_str()?,
                    entry.get("present")?.as_bool()?,
                ))
            })
            .collect();
        assert_eq!(
            present,
            vec![
                ("la_plata_original.geojson", false),
                ("la_plata.geojson", true)
            ]
        );
        assert_eq!(
            health
                .get("observability")
                .and_then(|v| v.get("downloads_rejected_total"))
                .and_then(|v| v.as_u64()),
            Some(1)
        );

        let metrics = client
            .get(format!("{base_url}/api/metrics"))
            .send()
            .await
            .expect("metrics request")
            .error_for_status()
            .expect("metrics status")
            .text()
            .await
            .expect("parse metrics text");
        assert!(metrics.contains("riesgo_downloads_rejected_total 1"));

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn client_config_exposes_geocoder_settings() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = AppState::new(
            dir.path().to_path_buf(),
            dir.path().join("dist"),
            ClientConfig {
                geocoder_api_key: Some("test-key".to_string()),
                ..ClientConfig::default()
            },
        );
        let (addr, server_handle) = spawn_test_server(state).await;

        let response = reqwest::get(format!("http://{addr}/api/config"))
            .await
            .expect("config request");
        assert_eq!(
            response
                .headers()
                .get("cache-control")
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let config = response
            .json::<ClientConfig>()
            .await
            .expect("parse config");
        assert_eq!(config.geocoder_api_key.as_deref(), Some("test-key"));
        assert!(config.geocoder_enabled());

        server_handle.abort();
        let _ = server_handle.await;
    }
}
