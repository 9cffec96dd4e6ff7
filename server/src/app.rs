use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::config::{HASHED_ASSET_CACHE_CONTROL, STATIC_ASSET_CACHE_CONTROL};
use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let client_bundle = Router::new().fallback_service(
        ServeDir::new(state.client_dist_dir.as_ref())
            .precompressed_br()
            .precompressed_gzip(),
    );

    let api = Router::new()
        .route("/api/health", get(routes::api::health))
        .route("/api/metrics", get(routes::api::metrics))
        .route("/api/config", get(routes::api::client_config))
        .layer(CompressionLayer::new());

    // Downloads and tile archives stay uncompressed: downloads must report the exact file
    // size and tile archives are fetched with range requests.
    Router::new()
        .route(
            "/api/download/{filename}",
            get(routes::download::download),
        )
        .nest_service("/data", ServeDir::new(state.data_dir.as_ref()))
        .merge(api)
        .fallback_service(client_bundle)
        .layer(middleware::from_fn(set_static_cache_control))
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if path.starts_with("/api/") {
        return None;
    }

    if is_hashed_bundle_asset(path) {
        return Some(HASHED_ASSET_CACHE_CONTROL);
    }

    if path.starts_with("/data/") {
        return Some(STATIC_ASSET_CACHE_CONTROL);
    }

    None
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let Some(ext) = Path::new(path).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }

    let Some(filename) = Path::new(path).file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use riesgo_shared::ClientConfig;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn immutable_cache_for_hashed_bundle_assets() {
        assert_eq!(
            cache_control_for_path("/riesgo-client-71578f6b278221f3_bg.wasm"),
            Some(HASHED_ASSET_CACHE_CONTROL)
        );
        assert_eq!(
            cache_control_for_path("/input-a93762ff3bf6d63a.css"),
            Some(HASHED_ASSET_CACHE_CONTROL)
        );
    }

    #[test]
    fn short_cache_for_tile_archives() {
        assert_eq!(
            cache_control_for_path("/data/la_plata.pmtiles"),
            Some(STATIC_ASSET_CACHE_CONTROL)
        );
    }

    #[test]
    fn no_cache_header_override_for_html_or_api() {
        assert_eq!(cache_control_for_path("/"), None);
        assert_eq!(cache_control_for_path("/index.html"), None);
        assert_eq!(
            cache_control_for_path("/api/download/la_plata.geojson"),
            None
        );
    }

    #[test]
    fn only_tile_archives_get_the_static_cache_header() {
        assert_eq!(cache_control_for_path("/fonts/inter.ttf"), None);
        assert_eq!(cache_control_for_path("/icons/marker.png"), None);
    }

    #[tokio::test]
    async fn tile_archives_are_served_from_data_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("la_plata.pmtiles"), b"PMTiles\x03").expect("write tiles");
        let state = AppState::new(
            dir.path().to_path_buf(),
            dir.path().join("dist"),
            ClientConfig::default(),
        );

        let response = build_app(state)
            .oneshot(
                Request::builder()
                    .uri("/data/la_plata.pmtiles")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some(STATIC_ASSET_CACHE_CONTROL)
        );
    }
}
