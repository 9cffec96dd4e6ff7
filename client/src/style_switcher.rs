use leptos::prelude::*;

use riesgo_shared::Basemap;

use crate::app::ActiveBasemap;

/// Dropdown over the map for picking the basemap.
#[component]
pub fn MapStyleSwitcher() -> impl IntoView {
    let ActiveBasemap(basemap) = expect_context();
    let open = RwSignal::new(false);

    view! {
        <div style="position: relative;">
            <button
                title="Cambiar estilo de mapa"
                style="display: flex; align-items: center; gap: 8px; padding: 7px 12px; border-radius: 6px; border: 1px solid #cbd5e1; background: rgba(255,255,255,0.95); box-shadow: 0 4px 12px rgba(15,23,42,0.15); cursor: pointer; font-size: 0.8rem; font-weight: 500; color: #0f172a;"
                on:click=move |_| open.update(|o| *o = !*o)
            >
                <span>{move || basemap.get().label()}</span>
                <span style="color: #64748b;">{move || if open.get() { "\u{25B4}" } else { "\u{25BE}" }}</span>
            </button>
            {move || {
                if !open.get() {
                    return ().into_any();
                }
                view! {
                    <div style="position: absolute; right: 0; top: calc(100% + 6px); width: 240px; background: #ffffff; border: 1px solid #e2e8f0; border-radius: 8px; box-shadow: 0 8px 24px rgba(15,23,42,0.18); overflow: hidden;">
                        {Basemap::ALL
                            .into_iter()
                            .map(|option| {
                                let active = move || basemap.get() == option;
                                view! {
                                    <button
                                        style="width: 100%; display: flex; flex-direction: column; align-items: flex-start; gap: 2px; padding: 10px 12px; border: none; cursor: pointer; text-align: left;"
                                        style:background=move || if active() { "#eff6ff" } else { "#ffffff" }
                                        on:click=move |_| {
                                            basemap.set(option);
                                            open.set(false);
                                        }
                                    >
                                        <span style="font-size: 0.82rem; font-weight: 600; color: #0f172a;">{option.label()}</span>
                                        <span style="font-size: 0.7rem; color: #64748b;">{option.description()}</span>
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_any()
            }}
        </div>
    }
}
