//! Keeps the engine's sources, layers and visibility flags in line with the dashboard state,
//! including across basemap swaps that wipe the whole style.

use serde_json::{Map, Value};

use crate::basemap::Basemap;
use crate::engine::{Camera, LngLat, MapEngine};
use crate::layers::{LayerId, LayerVisibility};
use crate::risk::{DESCRIPTION_PROPERTY, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStage {
    Source,
    Layer,
    Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileFailure {
    pub layer: LayerId,
    pub stage: ReconcileStage,
    pub message: String,
}

/// What a style-ready pass did, for the caller to log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub generation: u64,
    pub stale: bool,
    pub camera_restored: bool,
    pub added_sources: Vec<LayerId>,
    pub added_layers: Vec<LayerId>,
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Popup content for a clicked feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePopup {
    pub layer: LayerId,
    pub title: &'static str,
    pub risk: Option<RiskLevel>,
    pub description: Option<String>,
}

impl FeaturePopup {
    pub fn for_feature(layer: LayerId, properties: &Map<String, Value>) -> Self {
        let description = properties
            .get(DESCRIPTION_PROPERTY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);
        if layer.is_hazard() {
            Self {
                layer,
                title: "Zona de Riesgo Hídrico",
                risk: Some(RiskLevel::from_properties(properties)),
                description,
            }
        } else {
            Self {
                layer,
                title: "Parcela Catastral",
                risk: None,
                description,
            }
        }
    }
}

/// Sole owner of the live map engine.
pub struct MapController<E> {
    engine: E,
    visibility: LayerVisibility,
    basemap: Basemap,
    generation: u64,
    style_ready: bool,
    attached: [bool; LayerId::COUNT],
    /// Camera captured before a style swap, restored once the new style is ready.
    pending_camera: Option<Camera>,
    last_error: Option<String>,
}

impl<E: MapEngine> MapController<E> {
    /// Take ownership of an engine already created with `basemap`'s style.
    pub fn mount(engine: E, visibility: LayerVisibility, basemap: Basemap) -> Self {
        Self {
            engine,
            visibility,
            basemap,
            generation: 0,
            style_ready: false,
            attached: [false; LayerId::COUNT],
            pending_camera: None,
            last_error: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Release the engine for teardown.
    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    pub fn basemap(&self) -> Basemap {
        self.basemap
    }

    /// Style generation; bumped on every basemap swap.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_style_ready(&self) -> bool {
        self.style_ready
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Handle the engine's style-ready signal for `generation`.
    ///
    /// Signals for a superseded style are ignored. Repeated signals for the current style
    /// only re-apply visibility, because every add is skipped when the id already exists.
    pub fn on_style_ready(&mut self, generation: u64) -> ReconcileReport {
        let mut report = ReconcileReport {
            generation,
            ..ReconcileReport::default()
        };
        if generation != self.generation {
            report.stale = true;
            return report;
        }

        if let Some(camera) = self.pending_camera.take() {
            self.engine.set_camera(camera);
            report.camera_restored = true;
        }

        for id in LayerId::ALL {
            self.attach(id, &mut report);
        }
        self.style_ready = true;
        report
    }

    fn attach(&mut self, id: LayerId, report: &mut ReconcileReport) {
        let spec = id.spec();

        if !self.engine.has_source(spec.source_id) {
            if let Err(message) = self
                .engine
                .add_source(spec.source_id, &spec.source_document())
            {
                report.failures.push(ReconcileFailure {
                    layer: id,
                    stage: ReconcileStage::Source,
                    message,
                });
                return;
            }
            report.added_sources.push(id);
        }

        if !self.engine.has_layer(spec.layer_id) {
            if let Err(message) = self.engine.add_layer(&spec.layer_document()) {
                report.failures.push(ReconcileFailure {
                    layer: id,
                    stage: ReconcileStage::Layer,
                    message,
                });
                return;
            }
            report.added_layers.push(id);
        }
        self.attached[id.index()] = true;

        if let Err(message) = self
            .engine
            .set_layer_visible(spec.layer_id, self.visibility.get(id))
        {
            report.failures.push(ReconcileFailure {
                layer: id,
                stage: ReconcileStage::Visibility,
                message,
            });
        }
    }

    fn is_attached(&self, id: LayerId) -> bool {
        self.attached[id.index()] && self.engine.has_layer(id.engine_layer_id())
    }

    /// Record the desired visibility of one layer and push it to the engine if the layer
    /// exists. Sources are never touched here.
    pub fn set_visibility(&mut self, id: LayerId, visible: bool) -> Result<(), String> {
        self.visibility.set(id, visible);
        if !self.is_attached(id) {
            return Ok(());
        }
        self.engine
            .set_layer_visible(id.engine_layer_id(), visible)
    }

    /// Apply a whole visibility record, touching only layers whose flag changed.
    pub fn apply_visibility(&mut self, visibility: LayerVisibility) -> Vec<(LayerId, String)> {
        let mut errors = Vec::new();
        for (id, visible) in visibility.iter() {
            if self.visibility.get(id) == visible {
                continue;
            }
            if let Err(e) = self.set_visibility(id, visible) {
                errors.push((id, e));
            }
        }
        errors
    }

    /// Start a style swap. Returns the generation whose style-ready signal must be passed to
    /// [`Self::on_style_ready`], or `None` when `basemap` is already active.
    pub fn swap_basemap(&mut self, basemap: Basemap) -> Option<u64> {
        if basemap == self.basemap {
            return None;
        }
        if self.pending_camera.is_none() {
            self.pending_camera = Some(self.engine.camera());
        }
        self.basemap = basemap;
        self.generation += 1;
        self.style_ready = false;
        self.attached = [false; LayerId::COUNT];
        self.engine.set_style(basemap.style_url());
        Some(self.generation)
    }

    /// Layers that accept click and hover: attached and currently visible.
    pub fn interactive_layers(&self) -> Vec<LayerId> {
        LayerId::ALL
            .into_iter()
            .filter(|id| self.visibility.get(*id) && self.is_attached(*id))
            .collect()
    }

    pub fn feature_popup(
        &self,
        layer: LayerId,
        properties: &Map<String, Value>,
    ) -> Option<FeaturePopup> {
        if !self.interactive_layers().contains(&layer) {
            return None;
        }
        Some(FeaturePopup::for_feature(layer, properties))
    }

    /// Move to a picked place. A pending swap restores to this camera instead of the old one.
    pub fn recenter(&mut self, center: LngLat, zoom: f64) {
        let camera = Camera { center, zoom };
        if self.pending_camera.is_some() {
            self.pending_camera = Some(camera);
        }
        self.engine.fly_to(camera);
    }

    /// Engine error events are recorded only; nothing is retried.
    pub fn on_engine_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }
}
