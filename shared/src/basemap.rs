use serde::{Deserialize, Serialize};

/// Background map style. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basemap {
    #[default]
    Light,
    Satellite,
}

impl Basemap {
    pub const ALL: [Basemap; 2] = [Basemap::Light, Basemap::Satellite];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Satellite => "satellite",
        }
    }

    pub const fn style_url(self) -> &'static str {
        match self {
            Self::Light => "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json",
            Self::Satellite => {
                "https://raw.githubusercontent.com/go2garret/maps/main/src/assets/json/arcgis_hybrid.json"
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Mapa Claro",
            Self::Satellite => "Imagen Satelital",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Light => "Claro",
            Self::Satellite => "Satélite",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Light => "Vista de mapa estándar",
            Self::Satellite => "Vista satelital",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Basemap;

    #[test]
    fn wire_names_match_log_names() {
        for basemap in Basemap::ALL {
            let wire = serde_json::to_value(basemap).expect("serialize basemap");
            assert_eq!(wire, serde_json::json!(basemap.as_str()));
        }
    }

    #[test]
    fn styles_are_distinct() {
        assert_ne!(Basemap::Light.style_url(), Basemap::Satellite.style_url());
        assert_eq!(Basemap::default(), Basemap::Light);
    }
}
