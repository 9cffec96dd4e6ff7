use serde::{Deserialize, Serialize};
use serde_json::Value;

/// La Plata city center.
pub const INITIAL_CENTER: LngLat = LngLat {
    lng: -58.0044,
    lat: -34.9614,
};
pub const INITIAL_ZOOM: f64 = 12.0;
/// Zoom used when jumping to a geocoded address.
pub const PLACE_ZOOM: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: INITIAL_CENTER,
            zoom: INITIAL_ZOOM,
        }
    }
}

pub const fn visibility_value(visible: bool) -> &'static str {
    if visible { "visible" } else { "none" }
}

/// Imperative surface of the map rendering engine.
///
/// Swapping the style discards every source and layer previously added; callers are
/// expected to re-add them once the engine reports the new style as ready.
pub trait MapEngine {
    fn has_source(&self, source_id: &str) -> bool;
    fn add_source(&mut self, source_id: &str, source: &Value) -> Result<(), String>;
    fn has_layer(&self, layer_id: &str) -> bool;
    fn add_layer(&mut self, layer: &Value) -> Result<(), String>;
    fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<(), String>;
    fn set_style(&mut self, style_url: &str);
    fn camera(&self) -> Camera;
    /// Jump without animation.
    fn set_camera(&mut self, camera: Camera);
    /// Animated move, used for user-initiated recentering.
    fn fly_to(&mut self, camera: Camera);
}
