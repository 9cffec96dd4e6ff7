use leptos::prelude::*;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use riesgo_shared::engine::PLACE_ZOOM;
use riesgo_shared::{Camera, LayerId, MapController, ReconcileReport};

use crate::app::{ActiveBasemap, RecenterRequest, Visibility};
use crate::maplibre::{self, MapLibreEngine};
use crate::popup::popup_html;

type Controller = MapController<MapLibreEngine>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum MapStatus {
    Loading,
    Ready,
    Failed(String),
}

struct EventBinding {
    event: &'static str,
    layer: Option<&'static str>,
    handler: Closure<dyn FnMut(JsValue)>,
}

/// The controller plus the JS listeners that must be detached before the map is removed.
struct MountedMap {
    controller: Controller,
    bindings: Vec<EventBinding>,
}

impl MountedMap {
    fn teardown(self) {
        let engine = self.controller.into_engine();
        for binding in &self.bindings {
            engine.off(binding.event, binding.layer, &binding.handler);
        }
        engine.remove();
    }
}

fn log_report(report: &ReconcileReport) {
    if report.stale {
        web_sys::console::info_1(
            &format!("style generation {} superseded; skipped", report.generation).into(),
        );
        return;
    }
    for failure in &report.failures {
        web_sys::console::error_1(
            &format!(
                "{} {:?} failed: {}",
                failure.layer.as_str(),
                failure.stage,
                failure.message
            )
            .into(),
        );
    }
    let summary = format!(
        "style generation {} reconciled: {} sources, {} layers added, camera restored: {}",
        report.generation,
        report.added_sources.len(),
        report.added_layers.len(),
        report.camera_restored,
    );
    if report.is_clean() {
        web_sys::console::info_1(&summary.into());
    } else {
        web_sys::console::warn_1(&summary.into());
    }
}

/// Wait for the engine's style-ready event, then attach layers for `generation`.
fn reconcile_when_ready(
    mounted: StoredValue<Option<MountedMap>, LocalStorage>,
    ready: JsFuture,
    generation: u64,
    status: RwSignal<MapStatus>,
) {
    spawn_local(async move {
        let _ = ready.await;
        let report = mounted
            .try_update_value(|slot| {
                slot.as_mut()
                    .map(|m| m.controller.on_style_ready(generation))
            })
            .flatten();
        if let Some(report) = report {
            log_report(&report);
            if !report.stale {
                status.set(MapStatus::Ready);
            }
        }
    });
}

fn bind_events(
    engine: &MapLibreEngine,
    mounted: StoredValue<Option<MountedMap>, LocalStorage>,
    engine_error: RwSignal<Option<String>>,
) -> Vec<EventBinding> {
    let mut bindings = Vec::new();

    let on_error = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
        let message = maplibre::error_message(&event);
        web_sys::console::error_1(&message.clone().into());
        engine_error.set(Some(message));
    });
    bindings.push(EventBinding {
        event: "error",
        layer: None,
        handler: on_error,
    });

    for layer in LayerId::ALL {
        let on_click = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let Some(properties) = maplibre::first_feature_properties(&event) else {
                return;
            };
            let Ok(lng_lat) = js_sys::Reflect::get(&event, &JsValue::from_str("lngLat")) else {
                return;
            };
            let _ = mounted.try_with_value(|slot| {
                let Some(m) = slot.as_ref() else {
                    return;
                };
                let Some(popup) = m.controller.feature_popup(layer, &properties) else {
                    return;
                };
                if let Err(e) = m.controller.engine().show_popup(&lng_lat, &popup_html(&popup)) {
                    web_sys::console::warn_1(&e.into());
                }
            });
        });
        let on_enter = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
            let _ = mounted.try_with_value(|slot| {
                if let Some(m) = slot.as_ref()
                    && m.controller.interactive_layers().contains(&layer)
                {
                    m.controller.engine().set_cursor("pointer");
                }
            });
        });
        let on_leave = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
            let _ = mounted.try_with_value(|slot| {
                if let Some(m) = slot.as_ref() {
                    m.controller.engine().set_cursor("");
                }
            });
        });
        let layer_id = layer.engine_layer_id();
        bindings.push(EventBinding {
            event: "click",
            layer: Some(layer_id),
            handler: on_click,
        });
        bindings.push(EventBinding {
            event: "mouseenter",
            layer: Some(layer_id),
            handler: on_enter,
        });
        bindings.push(EventBinding {
            event: "mouseleave",
            layer: Some(layer_id),
            handler: on_leave,
        });
    }

    bindings.retain(|binding| match engine.on(binding.event, binding.layer, &binding.handler) {
        Ok(()) => true,
        Err(e) => {
            web_sys::console::warn_1(&e.into());
            false
        }
    });
    bindings
}

/// MapLibre map with the hazard and cadastre layers kept in line with the dashboard state.
#[component]
pub fn MapView() -> impl IntoView {
    let Visibility(visibility) = expect_context();
    let ActiveBasemap(basemap) = expect_context();
    let RecenterRequest(recenter) = expect_context();

    let container = NodeRef::<leptos::html::Div>::new();
    let status = RwSignal::new(MapStatus::Loading);
    let engine_error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<String>> = RwSignal::new(None);
    let mounted: StoredValue<Option<MountedMap>, LocalStorage> = StoredValue::new_local(None);
    let started = StoredValue::new(false);

    // Load MapLibre, create the map once the container exists and attach the first style.
    Effect::new(move || {
        let Some(el) = container.get() else {
            return;
        };
        if started.get_value() {
            return;
        }
        started.set_value(true);

        spawn_local(async move {
            if let Err(e) = maplibre::ensure_loaded().await {
                web_sys::console::error_1(&format!("MapLibre load failed: {e}").into());
                status.set(MapStatus::Failed(e));
                return;
            }
            let initial_basemap = basemap.get_untracked();
            let engine = match MapLibreEngine::create(&el, initial_basemap, Camera::default()) {
                Ok(engine) => engine,
                Err(e) => {
                    web_sys::console::error_1(&format!("Map creation failed: {e}").into());
                    status.set(MapStatus::Failed(e));
                    return;
                }
            };
            let ready = engine.style_ready();
            let bindings = bind_events(&engine, mounted, engine_error);
            let controller =
                MapController::mount(engine, visibility.get_untracked(), initial_basemap);
            let generation = controller.generation();
            mounted.set_value(Some(MountedMap {
                controller,
                bindings,
            }));
            reconcile_when_ready(mounted, ready, generation, status);
        });
    });

    Effect::new(move || {
        let target = visibility.get();
        let failures = mounted
            .try_update_value(|slot| {
                slot.as_mut()
                    .map(|m| m.controller.apply_visibility(target))
            })
            .flatten()
            .unwrap_or_default();
        for (layer, e) in failures {
            web_sys::console::warn_1(
                &format!("visibility update for {} failed: {e}", layer.as_str()).into(),
            );
        }
    });

    Effect::new(move || {
        let target = basemap.get();
        let swap = mounted
            .try_update_value(|slot| {
                let m = slot.as_mut()?;
                let generation = m.controller.swap_basemap(target)?;
                Some((generation, m.controller.engine().style_ready()))
            })
            .flatten();
        if let Some((generation, ready)) = swap {
            web_sys::console::info_1(
                &format!("basemap -> {} (generation {generation})", target.as_str()).into(),
            );
            reconcile_when_ready(mounted, ready, generation, status);
        }
    });

    Effect::new(move || {
        let Some(place) = recenter.get() else {
            return;
        };
        mounted.update_value(|slot| {
            if let Some(m) = slot.as_mut() {
                m.controller.recenter(place.center, PLACE_ZOOM);
            }
        });
    });

    Effect::new(move || {
        let Some(message) = engine_error.get() else {
            return;
        };
        let recorded = mounted
            .try_update_value(|slot| {
                let m = slot.as_mut()?;
                m.controller.on_engine_error(message);
                m.controller.last_error().map(str::to_owned)
            })
            .flatten();
        if recorded.is_some() {
            notice.set(recorded);
        }
    });

    on_cleanup(move || {
        let _ = mounted.try_update_value(|slot| {
            if let Some(m) = slot.take() {
                m.teardown();
            }
        });
    });

    view! {
        <div node_ref=container style="position: absolute; inset: 0;" />
        {move || match status.get() {
            MapStatus::Ready => ().into_any(),
            MapStatus::Loading => view! {
                <div style="position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 14px; background: #f1f5f9; z-index: 5; pointer-events: none;">
                    <div class="status-pulse" style="width: 40px; height: 40px; border-radius: 50%; border: 3px solid #cbd5e1; border-bottom-color: #1d4ed8;" />
                    <p style="margin: 0; font-size: 0.85rem; color: #64748b;">"Cargando mapa..."</p>
                </div>
            }
                .into_any(),
            MapStatus::Failed(message) => view! {
                <div style="position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 8px; background: #f1f5f9; z-index: 5;">
                    <p style="margin: 0; font-size: 0.9rem; font-weight: 600; color: #b91c1c;">"No se pudo cargar el mapa"</p>
                    <p style="margin: 0; font-size: 0.75rem; color: #64748b; max-width: 360px; text-align: center;">{message}</p>
                </div>
            }
                .into_any(),
        }}
        {move || {
            let Some(message) = notice.get() else {
                return ().into_any();
            };
            if status.with(|s| matches!(s, MapStatus::Failed(_))) {
                return ().into_any();
            }
            view! {
                <div
                    role="status"
                    style="position: absolute; left: 50%; bottom: 16px; transform: translateX(-50%); z-index: 6; display: flex; align-items: flex-start; gap: 10px; max-width: min(440px, calc(100% - 32px)); padding: 8px 12px; border-radius: 6px; border: 1px solid #fecaca; background: #fef2f2; box-shadow: 0 4px 12px rgba(15,23,42,0.15);"
                >
                    <div style="display: flex; flex-direction: column; gap: 2px;">
                        <span style="font-size: 0.78rem; font-weight: 600; color: #b91c1c;">"Algunas capas pueden no haberse cargado"</span>
                        <span style="font-size: 0.7rem; color: #7f1d1d; word-break: break-word;">{message}</span>
                    </div>
                    <button
                        title="Cerrar"
                        style="background: none; border: none; cursor: pointer; font-size: 0.85rem; color: #b91c1c; padding: 0;"
                        on:click=move |_| notice.set(None)
                    >
                        "\u{2715}"
                    </button>
                </div>
            }
                .into_any()
        }}
    }
}
