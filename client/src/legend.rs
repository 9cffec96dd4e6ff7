use leptos::prelude::*;

use riesgo_shared::LayerId;

use crate::app::Visibility;

/// Swatch rows for one layer.
#[component]
pub fn LegendSwatches(layer: LayerId) -> impl IntoView {
    let rows = layer
        .legend()
        .into_iter()
        .map(|entry| {
            view! {
                <div style="display: flex; align-items: center; gap: 10px; font-size: 0.75rem; color: #334155;">
                    <div style=format!(
                        "width: 16px; height: 12px; border-radius: 2px; border: 1px solid rgba(15,23,42,0.15); background: {};",
                        entry.color
                    ) />
                    <span>{entry.label}</span>
                </div>
            }
        })
        .collect_view();

    view! {
        <div style="display: flex; flex-direction: column; gap: 6px; padding-left: 14px; border-left: 2px solid #f1f5f9;">
            {rows}
        </div>
    }
}

/// Labelled on/off switch for a layer, with its legend while the layer is shown.
#[component]
pub fn LayerSwitch(layer: LayerId) -> impl IntoView {
    let Visibility(visibility) = expect_context();
    let checked = move || visibility.with(|v| v.get(layer));

    view! {
        <div style="display: flex; flex-direction: column; gap: 10px;">
            <label style="display: flex; align-items: center; justify-content: space-between; gap: 12px; cursor: pointer; font-size: 0.85rem; font-weight: 500;">
                <span>{layer.label()}</span>
                <button
                    role="switch"
                    aria-checked=move || if checked() { "true" } else { "false" }
                    style="position: relative; width: 36px; height: 20px; flex-shrink: 0; border: none; border-radius: 999px; cursor: pointer; transition: background 0.15s;"
                    style:background=move || if checked() { "#1d4ed8" } else { "#cbd5e1" }
                    on:click=move |_| {
                        visibility.update(|v| {
                            v.toggle(layer);
                        });
                    }
                >
                    <span
                        style="position: absolute; top: 2px; width: 16px; height: 16px; border-radius: 50%; background: #ffffff; box-shadow: 0 1px 2px rgba(0,0,0,0.2); transition: left 0.15s;"
                        style:left=move || if checked() { "18px" } else { "2px" }
                    />
                </button>
            </label>
            {move || checked().then(|| view! { <LegendSwatches layer=layer /> })}
        </div>
    }
}

/// Card floating over the map with a switch and legend for every layer.
#[component]
pub fn FloatingLegend() -> impl IntoView {
    let collapsed = RwSignal::new(false);

    view! {
        <div style="min-width: 260px; background: rgba(255,255,255,0.95); border: 1px solid #e2e8f0; border-radius: 8px; box-shadow: 0 8px 24px rgba(15,23,42,0.15);">
            <button
                style="width: 100%; display: flex; align-items: center; justify-content: space-between; padding: 10px 14px; background: none; border: none; cursor: pointer; font-size: 0.9rem; font-weight: 600; color: #0f172a;"
                on:click=move |_| collapsed.update(|c| *c = !*c)
            >
                <span>"Capas de Información"</span>
                <span style="color: #64748b;">{move || if collapsed.get() { "\u{25B4}" } else { "\u{25BE}" }}</span>
            </button>
            {move || {
                if collapsed.get() {
                    ().into_any()
                } else {
                    view! {
                        <div style="display: flex; flex-direction: column; gap: 14px; padding: 4px 14px 14px;">
                            {LayerId::ALL
                                .into_iter()
                                .rev()
                                .map(|layer| view! { <LayerSwitch layer=layer /> })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
