use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use riesgo_shared::{Basemap, GeocodeResult, LayerVisibility, TutorialMachine};

use crate::about::AboutPanel;
use crate::control_panel::MapControlPanel;
use crate::legend::FloatingLegend;
use crate::map_view::MapView;
use crate::search::AddressSearch;
use crate::style_switcher::MapStyleSwitcher;
use crate::tutorial::{BrowserTutorialStore, TutorialOverlay};

/// Viewports at least this wide keep the control panel open.
pub(crate) const DESKTOP_MIN_WIDTH: f64 = 768.0;

pub(crate) fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0)
}

pub(crate) fn sidebar_open_for_width(width: f64) -> bool {
    width >= DESKTOP_MIN_WIDTH
}

struct ResizeBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

fn unbind_resize() {
    RESIZE_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            old.window
                .remove_event_listener_with_callback("resize", old.handler.as_ref().unchecked_ref())
                .ok();
        }
    });
}

/// Newtype wrappers so each signal gets its own context slot.
#[derive(Clone, Copy)]
pub(crate) struct Visibility(pub RwSignal<LayerVisibility>);
#[derive(Clone, Copy)]
pub(crate) struct ActiveBasemap(pub RwSignal<Basemap>);
#[derive(Clone, Copy)]
pub(crate) struct SidebarOpen(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct Tutorial(pub RwSignal<TutorialMachine>);
/// Whether the "Acerca del Proyecto" panel covers the dashboard.
#[derive(Clone, Copy)]
pub(crate) struct AboutOpen(pub RwSignal<bool>);
/// Last place picked in the address search; the map flies there.
#[derive(Clone, Copy)]
pub(crate) struct RecenterRequest(pub RwSignal<Option<GeocodeResult>>);

/// Root application component. Provides the dashboard state via context.
#[component]
pub fn App() -> impl IntoView {
    let visibility = RwSignal::new(LayerVisibility::default());
    let basemap = RwSignal::new(Basemap::default());
    let sidebar_open = RwSignal::new(sidebar_open_for_width(viewport_width()));
    let tutorial = RwSignal::new(TutorialMachine::for_visit(&BrowserTutorialStore));
    let recenter = RwSignal::new(None::<GeocodeResult>);
    let about_open = RwSignal::new(false);

    provide_context(Visibility(visibility));
    provide_context(ActiveBasemap(basemap));
    provide_context(SidebarOpen(sidebar_open));
    provide_context(Tutorial(tutorial));
    provide_context(RecenterRequest(recenter));
    provide_context(AboutOpen(about_open));

    // Follow the viewport: wide screens show the panel, narrow ones hide it.
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        unbind_resize();

        let handler = Closure::<dyn Fn()>::new(move || {
            let open = sidebar_open_for_width(viewport_width());
            if sidebar_open.get_untracked() != open {
                sidebar_open.set(open);
            }
        });
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    handler,
                });
            });
        }
        on_cleanup(unbind_resize);
    });

    view! {
        <div style="display: flex; flex-direction: column; width: 100%; height: 100%; background: #f8fafc; font-family: 'Inter', system-ui, sans-serif; color: #0f172a;">
            <Header />
            <div style="display: flex; flex: 1; min-height: 0; overflow: hidden;">
                {move || {
                    if sidebar_open.get() {
                        view! {
                            <aside
                                class="control-panel scrollbar-thin"
                                style="width: 360px; max-width: 85vw; flex-shrink: 0; overflow-y: auto; background: #ffffff; border-right: 1px solid #e2e8f0;"
                            >
                                <MapControlPanel />
                            </aside>
                        }
                            .into_any()
                    } else {
                        ().into_any()
                    }
                }}
                <main style="flex: 1; position: relative; min-width: 0;">
                    <MapView />
                    <div class="tutorial-button" style="position: absolute; top: 16px; left: 16px; z-index: 10;">
                        <button
                            title="Iniciar tutorial"
                            style="width: 34px; height: 34px; border-radius: 6px; border: 1px solid #cbd5e1; background: rgba(255,255,255,0.9); box-shadow: 0 4px 12px rgba(15,23,42,0.15); cursor: pointer; font-size: 1rem; font-weight: 600; color: #334155;"
                            on:click=move |_| {
                                tutorial.update(|machine| {
                                    machine.start();
                                });
                            }
                        >
                            "?"
                        </button>
                    </div>
                    <div style="position: absolute; top: 16px; left: 62px; z-index: 10; width: min(320px, calc(100% - 200px));">
                        <AddressSearch />
                    </div>
                    <div style="position: absolute; top: 16px; right: 16px; z-index: 10;">
                        <MapStyleSwitcher />
                    </div>
                    <div style="position: absolute; bottom: 36px; right: 56px; z-index: 10;">
                        <FloatingLegend />
                    </div>
                </main>
            </div>
        </div>
        <TutorialOverlay />
        {move || about_open.get().then(|| view! { <AboutPanel /> })}
    }
}

/// Title bar with the mobile panel toggle, the about link and the partner logos.
#[component]
fn Header() -> impl IntoView {
    let SidebarOpen(sidebar_open) = expect_context();
    let AboutOpen(about_open) = expect_context();

    view! {
        <header style="z-index: 20; padding: 10px 16px; display: flex; align-items: center; justify-content: space-between; background: #ffffff; border-bottom: 1px solid #e2e8f0; box-shadow: 0 1px 3px rgba(15,23,42,0.06);">
            <div style="display: flex; align-items: center; gap: 16px;">
                <button
                    title=move || if sidebar_open.get() { "Ocultar panel" } else { "Mostrar panel" }
                    style="background: none; border: none; cursor: pointer; font-size: 1.1rem; color: #334155; padding: 4px 6px;"
                    on:click=move |_| sidebar_open.update(|open| *open = !*open)
                >
                    {move || if sidebar_open.get() { "\u{2715}" } else { "\u{2630}" }}
                </button>
                <h1 style="margin: 0; font-size: 1.15rem; font-weight: 600;">"Riesgo Hídrico: La Plata"</h1>
            </div>
            <div style="display: flex; align-items: center; gap: 16px;">
                <button
                    title="Acerca del Proyecto"
                    style="display: flex; align-items: center; gap: 6px; padding: 6px 10px; border-radius: 6px; border: 1px solid #e2e8f0; background: #ffffff; cursor: pointer; font-size: 0.8rem; font-weight: 500; color: #334155;"
                    on:click=move |_| about_open.set(true)
                >
                    <span style="font-weight: 700; color: #1d4ed8;">"\u{24D8}"</span>
                    <span>"Acerca"</span>
                </button>
                <img
                    src="https://ciut.fau.unlp.edu.ar/wp-content/uploads/sites/33/elementor/thumbs/LOGO-FAU-recortado-qjf1cejysoaa71ckprs137f87b0uf6zf35uvw13f28.png"
                    alt="FAU"
                    style="height: 32px; object-fit: contain;"
                />
                <img
                    src="https://ing.unlp.edu.ar/wp-content/uploads/2022/10/logo.png"
                    alt="Ingeniería Hidráulica"
                    style="height: 32px; object-fit: contain;"
                />
                <img
                    src="https://ciut.fau.unlp.edu.ar/wp-content/uploads/sites/33/elementor/thumbs/LOGO-ciut--qjf1cejyso9ssxlxj3wfu5ypvjc9u6swvp6q60jpj4.png"
                    alt="CIUT"
                    style="height: 32px; object-fit: contain;"
                />
            </div>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_opens_from_tablet_width_up() {
        assert!(!sidebar_open_for_width(767.0));
        assert!(sidebar_open_for_width(768.0));
        assert!(sidebar_open_for_width(1440.0));
    }
}
