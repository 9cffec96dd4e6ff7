//! MapLibre GL bindings over `js_sys::Reflect`, loaded from the CDN at runtime.

#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::cell::Cell;

use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use riesgo_shared::engine::visibility_value;
use riesgo_shared::{Basemap, Camera, LngLat, MapEngine};

const MAPLIBRE_VERSION: &str = "3.6.2";
const PMTILES_SCRIPT_URL: &str = "https://unpkg.com/pmtiles@3.2.0/dist/pmtiles.js";
const STYLE_READY_EVENT: &str = "style.load";

thread_local! {
    static PROTOCOL_REGISTERED: Cell<bool> = const { Cell::new(false) };
}

fn maplibre_asset(file: &str) -> String {
    format!("https://unpkg.com/maplibre-gl@{MAPLIBRE_VERSION}/dist/{file}")
}

fn js_error(context: &str, err: JsValue) -> String {
    let detail = err
        .as_string()
        .or_else(|| {
            Reflect::get(&err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"));
    format!("{context}: {detail}")
}

fn to_js(value: &impl Serialize) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("serialize error: {e}"))
}

fn global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = Reflect::get(window.as_ref(), &JsValue::from_str(name)).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

fn construct(namespace: &JsValue, class: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let ctor = Reflect::get(namespace, &JsValue::from_str(class))
        .map_err(|e| js_error(class, e))?
        .dyn_into::<Function>()
        .map_err(|_| format!("{class} is not a constructor"))?;
    let args: Array = args.iter().collect();
    Reflect::construct(&ctor, &args).map_err(|e| js_error(class, e))
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let function = Reflect::get(target, &JsValue::from_str(method))
        .map_err(|e| js_error(method, e))?
        .dyn_into::<Function>()
        .map_err(|_| format!("{method} is not a function"))?;
    let args: Array = args.iter().collect();
    function
        .apply(target, &args)
        .map_err(|e| js_error(method, e))
}

/// Append a `<script>` and resolve once it has executed.
async fn load_script(src: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let head = document.head().ok_or("no document head")?;
    let script = document
        .create_element("script")
        .map_err(|e| js_error("create script", e))?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| "script element cast failed".to_string())?;
    script.set_src(src);

    let loaded = Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });
    head.append_child(&script)
        .map_err(|e| js_error("append script", e))?;
    let result = JsFuture::from(loaded).await;
    script.set_onload(None);
    script.set_onerror(None);
    result.map(|_| ()).map_err(|_| format!("failed to load {src}"))
}

fn load_stylesheet(href: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let selector = format!("link[href=\"{href}\"]");
    if document.query_selector(&selector).ok().flatten().is_some() {
        return Ok(());
    }
    let head = document.head().ok_or("no document head")?;
    let link = document
        .create_element("link")
        .map_err(|e| js_error("create link", e))?
        .dyn_into::<web_sys::HtmlLinkElement>()
        .map_err(|_| "link element cast failed".to_string())?;
    link.set_rel("stylesheet");
    link.set_href(href);
    head.append_child(&link)
        .map_err(|e| js_error("append stylesheet", e))?;
    Ok(())
}

/// Load MapLibre and the PMTiles protocol once per page.
pub async fn ensure_loaded() -> Result<(), String> {
    load_stylesheet(&maplibre_asset("maplibre-gl.css"))?;
    if global("maplibregl").is_none() {
        load_script(&maplibre_asset("maplibre-gl.js")).await?;
    }
    if global("pmtiles").is_none() {
        load_script(PMTILES_SCRIPT_URL).await?;
    }
    register_pmtiles_protocol()
}

fn register_pmtiles_protocol() -> Result<(), String> {
    if PROTOCOL_REGISTERED.with(Cell::get) {
        return Ok(());
    }
    let maplibre = global("maplibregl").ok_or("maplibregl missing after load")?;
    let pmtiles = global("pmtiles").ok_or("pmtiles missing after load")?;
    let protocol = construct(&pmtiles, "Protocol", &[])?;
    let tile = Reflect::get(&protocol, &JsValue::from_str("tile"))
        .map_err(|e| js_error("Protocol.tile", e))?
        .dyn_into::<Function>()
        .map_err(|_| "Protocol.tile is not a function".to_string())?
        .bind(&protocol);
    call(
        &maplibre,
        "addProtocol",
        &[JsValue::from_str("pmtiles"), tile.into()],
    )?;
    PROTOCOL_REGISTERED.with(|flag| flag.set(true));
    Ok(())
}

fn camera_options(camera: Camera) -> serde_json::Value {
    serde_json::json!({
        "center": [camera.center.lng, camera.center.lat],
        "zoom": camera.zoom,
    })
}

/// Always reload the whole style: a diffed `setStyle` drops the custom sources and layers
/// without emitting `style.load`.
fn set_style_options() -> serde_json::Value {
    serde_json::json!({ "diff": false })
}

fn geolocate_options() -> serde_json::Value {
    serde_json::json!({
        "positionOptions": { "enableHighAccuracy": true },
        "trackUserLocation": false,
        "showUserHeading": false,
    })
}

/// A live `maplibregl.Map`.
pub struct MapLibreEngine {
    map: JsValue,
}

impl MapLibreEngine {
    /// Create the map inside `container` with geolocate and compact attribution controls.
    pub fn create(
        container: &web_sys::HtmlElement,
        basemap: Basemap,
        camera: Camera,
    ) -> Result<Self, String> {
        let maplibre = global("maplibregl").ok_or("maplibregl not loaded")?;

        let mut options = camera_options(camera);
        options["style"] = basemap.style_url().into();
        options["attributionControl"] = false.into();
        let options = to_js(&options)?;
        Reflect::set(&options, &JsValue::from_str("container"), container)
            .map_err(|e| js_error("map options", e))?;
        let map = construct(&maplibre, "Map", &[options])?;

        let geolocate = construct(&maplibre, "GeolocateControl", &[to_js(&geolocate_options())?])?;
        call(
            &map,
            "addControl",
            &[geolocate, JsValue::from_str("bottom-right")],
        )?;
        let attribution = construct(
            &maplibre,
            "AttributionControl",
            &[to_js(&serde_json::json!({ "compact": true }))?],
        )?;
        call(
            &map,
            "addControl",
            &[attribution, JsValue::from_str("bottom-left")],
        )?;

        Ok(Self { map })
    }

    /// Resolves on the next style-ready event. Register right after creating the map or
    /// swapping the style so the event cannot be missed.
    pub fn style_ready(&self) -> JsFuture {
        let map = self.map.clone();
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Err(e) = call(
                &map,
                "once",
                &[JsValue::from_str(STYLE_READY_EVENT), resolve.into()],
            ) {
                web_sys::console::warn_1(&e.into());
            }
        });
        JsFuture::from(promise)
    }

    /// Subscribe to a map event, optionally scoped to one layer id.
    pub fn on(
        &self,
        event: &str,
        layer: Option<&str>,
        handler: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<(), String> {
        call(&self.map, "on", &Self::listener_args(event, layer, handler)).map(|_| ())
    }

    pub fn off(&self, event: &str, layer: Option<&str>, handler: &Closure<dyn FnMut(JsValue)>) {
        let _ = call(&self.map, "off", &Self::listener_args(event, layer, handler));
    }

    fn listener_args(
        event: &str,
        layer: Option<&str>,
        handler: &Closure<dyn FnMut(JsValue)>,
    ) -> Vec<JsValue> {
        let mut args = vec![JsValue::from_str(event)];
        if let Some(layer) = layer {
            args.push(JsValue::from_str(layer));
        }
        args.push(handler.as_ref().clone());
        args
    }

    pub fn show_popup(&self, lng_lat: &JsValue, html: &str) -> Result<(), String> {
        let maplibre = global("maplibregl").ok_or("maplibregl not loaded")?;
        let popup = construct(&maplibre, "Popup", &[])?;
        call(&popup, "setLngLat", &[lng_lat.clone()])?;
        call(&popup, "setHTML", &[JsValue::from_str(html)])?;
        call(&popup, "addTo", &[self.map.clone()])?;
        Ok(())
    }

    pub fn set_cursor(&self, cursor: &str) {
        let Ok(canvas) = call(&self.map, "getCanvas", &[]) else {
            return;
        };
        if let Ok(canvas) = canvas.dyn_into::<web_sys::HtmlElement>() {
            canvas.style().set_property("cursor", cursor).ok();
        }
    }

    /// Destroy the map and release its WebGL context.
    pub fn remove(self) {
        if let Err(e) = call(&self.map, "remove", &[]) {
            web_sys::console::warn_1(&e.into());
        }
    }

    fn exists(&self, getter: &str, id: &str) -> bool {
        call(&self.map, getter, &[JsValue::from_str(id)])
            .is_ok_and(|value| !value.is_undefined() && !value.is_null())
    }
}

impl MapEngine for MapLibreEngine {
    fn has_source(&self, source_id: &str) -> bool {
        self.exists("getSource", source_id)
    }

    fn add_source(&mut self, source_id: &str, source: &serde_json::Value) -> Result<(), String> {
        call(
            &self.map,
            "addSource",
            &[JsValue::from_str(source_id), to_js(source)?],
        )
        .map(|_| ())
    }

    fn has_layer(&self, layer_id: &str) -> bool {
        self.exists("getLayer", layer_id)
    }

    fn add_layer(&mut self, layer: &serde_json::Value) -> Result<(), String> {
        call(&self.map, "addLayer", &[to_js(layer)?]).map(|_| ())
    }

    fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<(), String> {
        call(
            &self.map,
            "setLayoutProperty",
            &[
                JsValue::from_str(layer_id),
                JsValue::from_str("visibility"),
                JsValue::from_str(visibility_value(visible)),
            ],
        )
        .map(|_| ())
    }

    fn set_style(&mut self, style_url: &str) {
        let result = to_js(&set_style_options()).and_then(|options| {
            call(&self.map, "setStyle", &[JsValue::from_str(style_url), options]).map(|_| ())
        });
        if let Err(e) = result {
            web_sys::console::error_1(&e.into());
        }
    }

    fn camera(&self) -> Camera {
        let center = call(&self.map, "getCenter", &[]).ok();
        let coord = |key: &str| {
            center
                .as_ref()
                .and_then(|c| Reflect::get(c, &JsValue::from_str(key)).ok())
                .and_then(|v| v.as_f64())
        };
        let zoom = call(&self.map, "getZoom", &[]).ok().and_then(|z| z.as_f64());
        match (coord("lng"), coord("lat"), zoom) {
            (Some(lng), Some(lat), Some(zoom)) => Camera {
                center: LngLat { lng, lat },
                zoom,
            },
            _ => Camera::default(),
        }
    }

    fn set_camera(&mut self, camera: Camera) {
        self.move_camera("jumpTo", camera);
    }

    fn fly_to(&mut self, camera: Camera) {
        self.move_camera("flyTo", camera);
    }
}

impl MapLibreEngine {
    fn move_camera(&self, method: &str, camera: Camera) {
        let result = to_js(&camera_options(camera)).and_then(|options| {
            call(&self.map, method, &[options]).map(|_| ())
        });
        if let Err(e) = result {
            web_sys::console::warn_1(&e.into());
        }
    }
}

/// `e.features[0].properties` of a layer-scoped mouse event.
pub fn first_feature_properties(event: &JsValue) -> Option<serde_json::Map<String, serde_json::Value>> {
    let features = Reflect::get(event, &JsValue::from_str("features")).ok()?;
    let first = Reflect::get_u32(&features, 0).ok()?;
    if first.is_undefined() {
        return None;
    }
    let properties = Reflect::get(&first, &JsValue::from_str("properties")).ok()?;
    if !properties.is_object() {
        return Some(serde_json::Map::new());
    }
    serde_wasm_bindgen::from_value(properties).ok()
}

/// Human-readable message out of a map `error` event.
pub fn error_message(event: &JsValue) -> String {
    Reflect::get(event, &JsValue::from_str("error"))
        .ok()
        .filter(|e| !e.is_undefined())
        .map(|e| js_error("map error", e))
        .unwrap_or_else(|| "map error".to_string())
}
