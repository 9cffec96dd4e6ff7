use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use riesgo_shared::download::{self, GEOJSON_MEDIA_TYPE};
use tracing::{debug, error};

use crate::state::AppState;

/// `GET /api/download/{filename}`: serve one allow-listed dataset as an attachment.
///
/// Names outside the allow-list are rejected before any disk access.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let Some(entry) = download::allowed(&filename) else {
        state.observability.record_download_rejected();
        debug!(%filename, "download rejected: not in allow-list");
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    };

    let path = state.data_dir.join(entry.filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            state.observability.record_download_failure();
            error!(error = %e, path = %path.display(), "failed to read download file");
            return internal_error();
        }
    };

    let len = bytes.len() as u64;
    match attachment_response(entry.filename, bytes) {
        Ok(response) => {
            state.observability.record_download_served(len);
            response
        }
        Err(e) => {
            state.observability.record_download_failure();
            error!(error = %e, %filename, "failed to build download response");
            internal_error()
        }
    }
}

fn attachment_response(filename: &str, body: Bytes) -> Result<Response, String> {
    let disposition = HeaderValue::from_str(&download::content_disposition(filename))
        .map_err(|e| format!("invalid content-disposition: {e}"))?;
    let len = body.len();
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(GEOJSON_MEDIA_TYPE),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    Ok(response)
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use riesgo_shared::ClientConfig;
    use tower::ServiceExt;

    use crate::state::AppState;

    const SAMPLE_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"peligrosid":"alta"},"geometry":{"type":"Point","coordinates":[-57.95,-34.92]}}]}"#;

    fn test_state(data_dir: &Path) -> AppState {
        AppState::new(
            data_dir.to_path_buf(),
            data_dir.join("dist"),
            ClientConfig::default(),
        )
    }

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

    #[tokio::test]
    async fn allow_listed_file_is_served_as_geojson_attachment() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("la_plata.geojson"), SAMPLE_GEOJSON).expect("write fixture");
        let on_disk = std::fs::metadata(dir.path().join("la_plata.geojson"))
            .expect("fixture metadata")
            .len();

        let (addr, server_handle) = spawn_test_server(test_state(dir.path())).await;
        let response = reqwest::get(format!("http://{addr}/api/download/la_plata.geojson"))
            .await
            .expect("download request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(
            headers.get(header::CONTENT_TYPE.as_str()).and_then(|v| v.to_str().ok()),
            Some("application/geo+json")
        );
        assert_eq!(
            headers
                .get(header::CONTENT_DISPOSITION.as_str())
                .and_then(|v| v.to_str().ok()),
            Some("attachment; filename=\"la_plata.geojson\"")
        );
        assert_eq!(
            headers
                .get(header::CONTENT_LENGTH.as_str())
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok()),
            Some(on_disk)
        );
        let body = response.bytes().await.expect("download body");
        assert_eq!(body.len() as u64, on_disk);
        assert_eq!(&body[..], SAMPLE_GEOJSON.as_bytes());

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn unknown_file_is_not_found_even_if_present_on_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("not_a_real_file.geojson"), SAMPLE_GEOJSON)
            .expect("write decoy");
        let state = test_state(dir.path());
        let observability = state.observability.clone();

        let response = crate::app::build_app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/download/not_a_real_file.geojson")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let snapshot = observability.snapshot();
        assert_eq!(snapshot.downloads_rejected_total, 1);
        assert_eq!(snapshot.downloads_served_total, 0);
        assert_eq!(snapshot.download_failures_total, 0);
    }

    #[tokio::test]
    async fn missing_allow_listed_file_is_server_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = test_state(&dir.path().join("does-not-exist"));
        let observability = state.observability.clone();

        let response = crate::app::build_app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/download/la_plata_original.geojson")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(observability.snapshot().download_failures_total, 1);
    }

    #[tokio::test]
    async fn traversal_attempts_never_reach_the_filesystem() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = test_state(dir.path());
        let observability = state.observability.clone();

        let response = crate::app::build_app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/download/..%2Fla_plata.geojson")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(observability.snapshot().downloads_rejected_total, 1);
    }
}
