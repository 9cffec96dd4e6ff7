/// Media type of every downloadable dataset.
pub const GEOJSON_MEDIA_TYPE: &str = "application/geo+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Download {
    pub filename: &'static str,
    pub label: &'static str,
}

/// Fixed allow-list served by `GET /api/download/{filename}`.
pub const DOWNLOADS: [Download; 2] = [
    Download {
        filename: "la_plata_original.geojson",
        label: "Datos originales (GeoJSON)",
    },
    Download {
        filename: "la_plata.geojson",
        label: "Zonas de riesgo actualizadas (GeoJSON)",
    },
];

/// Exact, case-sensitive allow-list lookup.
pub fn allowed(filename: &str) -> Option<&'static Download> {
    DOWNLOADS
        .iter()
        .find(|download| download.filename == filename)
}

pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{filename}\"")
}

impl Download {
    pub fn url(&self) -> String {
        format!("/api/download/{}", self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_two_datasets_are_allowed() {
        assert!(allowed("la_plata.geojson").is_some());
        assert!(allowed("la_plata_original.geojson").is_some());
        assert!(allowed("not_a_real_file.geojson").is_none());
        assert!(allowed("../la_plata.geojson").is_none());
        assert!(allowed("LA_PLATA.GEOJSON").is_none());
        assert!(allowed("").is_none());
    }

    #[test]
    fn disposition_forces_download_with_original_name() {
        assert_eq!(
            content_disposition("la_plata.geojson"),
            "attachment; filename=\"la_plata.geojson\""
        );
        assert_eq!(DOWNLOADS[1].url(), "/api/download/la_plata.geojson");
    }
}
