use serde::{Deserialize, Serialize};

use crate::engine::LngLat;

pub const GEOCODER_BASE_URL: &str = "https://api.maptiler.com/geocoding";
/// `[west, south, east, north]` around the La Plata partido.
pub const LA_PLATA_BBOX: [f64; 4] = [-58.25, -35.10, -57.75, -34.78];
pub const MAX_RESULTS: usize = 5;

fn default_bbox() -> [f64; 4] {
    LA_PLATA_BBOX
}

/// Runtime settings handed to the browser by `GET /api/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub geocoder_api_key: Option<String>,
    #[serde(default = "default_bbox")]
    pub geocoder_bbox: [f64; 4],
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            geocoder_api_key: None,
            geocoder_bbox: LA_PLATA_BBOX,
        }
    }
}

impl ClientConfig {
    pub fn geocoder_enabled(&self) -> bool {
        self.geocoder_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// A picked place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub label: String,
    pub center: LngLat,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    place_name: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    center: Option<[f64; 2]>,
}

/// Build the forward-geocoding URL. `encoded_query` must already be URI-component encoded.
pub fn search_url(encoded_query: &str, api_key: &str, bbox: [f64; 4]) -> String {
    let [west, south, east, north] = bbox;
    format!(
        "{GEOCODER_BASE_URL}/{encoded_query}.json?key={api_key}&bbox={west},{south},{east},{north}&limit={MAX_RESULTS}&language=es"
    )
}

/// Parse a geocoding response, dropping features without a usable center.
pub fn parse_results(body: &str) -> Result<Vec<GeocodeResult>, String> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| format!("parse error: {e}"))?;
    Ok(collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let [lng, lat] = feature.center?;
            if !lng.is_finite() || !lat.is_finite() {
                return None;
            }
            let label = feature.place_name.or(feature.text)?;
            Some(GeocodeResult {
                label,
                center: LngLat { lng, lat },
            })
        })
        .take(MAX_RESULTS)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_carries_key_and_bbox() {
        let url = search_url("calle%207%20y%2050", "abc", LA_PLATA_BBOX);
        assert_eq!(
            url,
            "https://api.maptiler.com/geocoding/calle%207%20y%2050.json?key=abc&bbox=-58.25,-35.1,-57.75,-34.78&limit=5&language=es"
        );
    }

    #[test]
    fn parses_centers_and_skips_incomplete_features() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"place_name": "Plaza Moreno, La Plata", "center": [-57.9545, -34.9214]},
                {"text": "Calle 7", "center": [-57.95, -34.91]},
                {"place_name": "sin centro"},
                {"center": [-57.9, -34.9]}
            ]
        }"#;
        let results = parse_results(body).expect("valid response");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label, "Plaza Moreno, La Plata");
        assert_eq!(results[0].center.lat, -34.9214);
        assert_eq!(results[1].label, "Calle 7");
    }

    #[test]
    fn rejects_malformed_body() {
        assert!(parse_results("not json").is_err());
        assert_eq!(parse_results("{}").expect("empty collection"), Vec::new());
    }

    #[test]
    fn config_defaults_bbox_and_detects_missing_key() {
        let config: ClientConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(config.geocoder_bbox, LA_PLATA_BBOX);
        assert!(!config.geocoder_enabled());

        let blank = ClientConfig {
            geocoder_api_key: Some("  ".to_string()),
            ..ClientConfig::default()
        };
        assert!(!blank.geocoder_enabled());
    }
}
