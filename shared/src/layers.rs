use serde_json::{Value, json};

use crate::colors::{Palette, hsl_css};
use crate::risk::{RISK_PROPERTY, RISK_PROPERTY_UPPER, RiskLevel};

const HAZARD_CURRENT_PALETTE: Palette = Palette::new(221, 83);
const HAZARD_ORIGINAL_PALETTE: Palette = Palette::new(330, 83);
const HAZARD_FILL_ALPHA: f64 = 0.7;

/// Togglable data layers. The set is closed; nothing is added at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    HazardCurrent,
    HazardOriginal,
    Cadastre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Fill,
    Line,
}

impl LayerKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Line => "line",
        }
    }
}

/// One legend row: a swatch color and its caption.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: String,
}

/// Everything the engine needs to register a layer and the source behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: LayerId,
    pub source_id: &'static str,
    pub layer_id: &'static str,
    pub source_url: &'static str,
    pub source_layer: &'static str,
    pub kind: LayerKind,
    pub paint: Value,
}

impl LayerSpec {
    pub fn source_document(&self) -> Value {
        json!({
            "type": "vector",
            "url": self.source_url,
        })
    }

    pub fn layer_document(&self) -> Value {
        json!({
            "id": self.layer_id,
            "type": self.kind.as_str(),
            "source": self.source_id,
            "source-layer": self.source_layer,
            "paint": self.paint,
        })
    }
}

impl LayerId {
    /// Draw order: parcels sit above the hazard fills.
    pub const ALL: [LayerId; 3] = [
        LayerId::HazardOriginal,
        LayerId::HazardCurrent,
        LayerId::Cadastre,
    ];
    pub const COUNT: usize = Self::ALL.len();

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HazardCurrent => "hazard-current",
            Self::HazardOriginal => "hazard-original",
            Self::Cadastre => "cadastre",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::HazardCurrent => 0,
            Self::HazardOriginal => 1,
            Self::Cadastre => 2,
        }
    }

    pub const fn is_hazard(self) -> bool {
        matches!(self, Self::HazardCurrent | Self::HazardOriginal)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HazardCurrent => "Zonas de Riesgo Hídrico",
            Self::HazardOriginal => "Datos Originales",
            Self::Cadastre => "Parcelas Catastrales",
        }
    }

    pub const fn source_id(self) -> &'static str {
        match self {
            Self::HazardCurrent => "hazard-current",
            Self::HazardOriginal => "hazard-original",
            Self::Cadastre => "cadastre",
        }
    }

    pub const fn engine_layer_id(self) -> &'static str {
        match self {
            Self::HazardCurrent => "hazard-current-fill",
            Self::HazardOriginal => "hazard-original-fill",
            Self::Cadastre => "cadastre-line",
        }
    }

    const fn palette(self) -> Option<Palette> {
        match self {
            Self::HazardCurrent => Some(HAZARD_CURRENT_PALETTE),
            Self::HazardOriginal => Some(HAZARD_ORIGINAL_PALETTE),
            Self::Cadastre => None,
        }
    }

    pub fn spec(self) -> LayerSpec {
        let (source_url, source_layer, kind) = match self {
            Self::HazardCurrent => (
                "pmtiles:///data/la_plata.pmtiles",
                "combined_hazard_prioritized_4326",
                LayerKind::Fill,
            ),
            Self::HazardOriginal => (
                "pmtiles:///data/la_plata_original.pmtiles",
                "la_plata_original",
                LayerKind::Fill,
            ),
            Self::Cadastre => (
                "pmtiles:///data/parcelas.pmtiles",
                "parcelas",
                LayerKind::Line,
            ),
        };
        let paint = match self.palette() {
            Some(palette) => hazard_paint(palette),
            None => cadastre_paint(),
        };
        LayerSpec {
            id: self,
            source_id: self.source_id(),
            layer_id: self.engine_layer_id(),
            source_url,
            source_layer,
            kind,
            paint,
        }
    }

    pub fn legend(self) -> Vec<LegendEntry> {
        match self.palette() {
            Some(palette) => RiskLevel::RANKED
                .into_iter()
                .map(|level| LegendEntry {
                    label: level.label(),
                    color: palette.fill(level.fill_lightness(), HAZARD_FILL_ALPHA),
                })
                .collect(),
            None => vec![LegendEntry {
                label: "Límites de parcelas",
                color: hsl_css(0, 0, 45),
            }],
        }
    }
}

fn risk_expression() -> Value {
    json!([
        "coalesce",
        ["get", RISK_PROPERTY],
        ["get", RISK_PROPERTY_UPPER],
        ""
    ])
}

/// `match` expression over the risk code; the trailing value is the fallback.
fn match_by_risk(color: impl Fn(RiskLevel) -> String) -> Value {
    let mut expr = vec![json!("match"), risk_expression()];
    for level in RiskLevel::RANKED {
        if let Some(code) = level.code() {
            expr.push(json!(code));
            expr.push(json!(color(level)));
        }
    }
    expr.push(json!(color(RiskLevel::Unspecified)));
    Value::Array(expr)
}

fn hazard_paint(palette: Palette) -> Value {
    json!({
        "fill-color": match_by_risk(|level| palette.fill(level.fill_lightness(), HAZARD_FILL_ALPHA)),
        "fill-outline-color": match_by_risk(|level| palette.outline(level.outline_lightness())),
    })
}

fn cadastre_paint() -> Value {
    json!({
        "line-color": hsl_css(0, 0, 45),
        "line-width": 0.6,
        "line-opacity": 0.8,
    })
}

/// Visibility flag for every `LayerId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility {
    flags: [bool; LayerId::COUNT],
}

impl Default for LayerVisibility {
    fn default() -> Self {
        let mut visibility = Self {
            flags: [false; LayerId::COUNT],
        };
        visibility.set(LayerId::HazardCurrent, true);
        visibility
    }
}

impl LayerVisibility {
    pub fn get(&self, id: LayerId) -> bool {
        self.flags[id.index()]
    }

    pub fn set(&mut self, id: LayerId, visible: bool) {
        self.flags[id.index()] = visible;
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, id: LayerId) -> bool {
        let flag = &mut self.flags[id.index()];
        *flag = !*flag;
        *flag
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerId, bool)> + '_ {
        LayerId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    pub fn visible_layers(&self) -> Vec<LayerId> {
        self.iter()
            .filter_map(|(id, visible)| visible.then_some(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shows_only_current_hazard() {
        let visibility = LayerVisibility::default();
        assert!(visibility.get(LayerId::HazardCurrent));
        assert!(!visibility.get(LayerId::HazardOriginal));
        assert!(!visibility.get(LayerId::Cadastre));
        assert_eq!(visibility.visible_layers(), vec![LayerId::HazardCurrent]);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut visibility = LayerVisibility::default();
        assert!(visibility.toggle(LayerId::Cadastre));
        assert!(!visibility.toggle(LayerId::Cadastre));
        assert_eq!(visibility, LayerVisibility::default());
    }

    #[test]
    fn hazard_paint_matches_codes_with_fallback() {
        let spec = LayerId::HazardCurrent.spec();
        let fill = &spec.paint["fill-color"];
        assert_eq!(fill[0], "match");
        assert_eq!(fill[1][0], "coalesce");
        assert_eq!(fill[2], "alta");
        assert_eq!(fill[3], "hsla(221, 83%, 25%, 0.7)");
        assert_eq!(fill[4], "media");
        assert_eq!(fill[5], "hsla(221, 83%, 45%, 0.7)");
        assert_eq!(fill[6], "baja");
        assert_eq!(fill[7], "hsla(221, 83%, 65%, 0.7)");
        assert_eq!(fill[8], "hsla(221, 83%, 55%, 0.7)");
        assert_eq!(spec.paint["fill-outline-color"][3], "hsl(221, 83%, 15%)");
        assert_eq!(spec.paint["fill-outline-color"][8], "hsl(221, 83%, 45%)");
    }

    #[test]
    fn original_hazard_uses_its_own_palette() {
        let legend = LayerId::HazardOriginal.legend();
        let labels: Vec<_> = legend.iter().map(|entry| entry.label).collect();
        assert_eq!(labels, vec!["Alta", "Media", "Baja"]);
        assert_eq!(legend[0].color, "hsla(330, 83%, 25%, 0.7)");
    }

    #[test]
    fn layer_document_references_its_source() {
        for id in LayerId::ALL {
            let spec = id.spec();
            let doc = spec.layer_document();
            assert_eq!(doc["source"], spec.source_id);
            assert_eq!(doc["id"], spec.layer_id);
            assert_eq!(spec.source_document()["type"], "vector");
            assert!(spec.source_url.starts_with("pmtiles:///data/"));
        }
    }
}
