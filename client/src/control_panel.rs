use leptos::prelude::*;

use riesgo_shared::download::DOWNLOADS;
use riesgo_shared::{Basemap, LayerId};

use crate::app::ActiveBasemap;
use crate::legend::LayerSwitch;

const CARD_STYLE: &str = "border: 1px solid #e2e8f0; border-radius: 8px; background: #ffffff; padding: 14px 16px;";
const CARD_TITLE_STYLE: &str =
    "margin: 0 0 12px; font-size: 0.95rem; font-weight: 600; color: #0f172a;";

/// Sidebar contents: pilot notice, basemap picker, layer switches and dataset downloads.
#[component]
pub fn MapControlPanel() -> impl IntoView {
    view! {
        <div style="padding: 20px; display: flex; flex-direction: column; gap: 20px;">
            <PilotNotice />
            <BasemapPicker />
            <div style=CARD_STYLE>
                <h2 style=CARD_TITLE_STYLE>"Capas de Información"</h2>
                <div style="display: flex; flex-direction: column; gap: 14px;">
                    {LayerId::ALL
                        .into_iter()
                        .rev()
                        .map(|layer| {
                            view! {
                                <LayerSwitch layer=layer />
                                <div style="height: 1px; background: #f1f5f9;" />
                            }
                        })
                        .collect_view()}
                </div>
            </div>
            <Downloads />
        </div>
    }
}

#[component]
fn PilotNotice() -> impl IntoView {
    view! {
        <div style="display: flex; gap: 12px; align-items: flex-start; border: 1px solid #fde68a; background: #fefce8; border-radius: 8px; padding: 14px 16px;">
            <span style="color: #ca8a04; font-size: 1.1rem; line-height: 1;">"\u{26A0}"</span>
            <div>
                <p style="margin: 0; font-size: 0.85rem; font-weight: 600; color: #854d0e;">"Proyecto Piloto"</p>
                <p style="margin: 4px 0 0; font-size: 0.75rem; color: #a16207;">
                    "Los datos mostrados son preliminares y están en desarrollo continuo."
                </p>
            </div>
        </div>
    }
}

#[component]
fn BasemapPicker() -> impl IntoView {
    let ActiveBasemap(basemap) = expect_context();

    view! {
        <div style=CARD_STYLE>
            <h2 style=CARD_TITLE_STYLE>"Estilo de Mapa"</h2>
            <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 8px;">
                {Basemap::ALL
                    .into_iter()
                    .map(|option| {
                        let active = move || basemap.get() == option;
                        view! {
                            <button
                                title=option.description()
                                style="padding: 6px 10px; border-radius: 6px; border: 1px solid; cursor: pointer; font-size: 0.75rem; font-weight: 500; transition: background 0.15s, color 0.15s;"
                                style:background=move || if active() { "#0f172a" } else { "#ffffff" }
                                style:color=move || if active() { "#f8fafc" } else { "#0f172a" }
                                style:border-color=move || if active() { "#0f172a" } else { "#cbd5e1" }
                                on:click=move |_| basemap.set(option)
                            >
                                {option.short_label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn Downloads() -> impl IntoView {
    view! {
        <div style=CARD_STYLE>
            <h2 style=CARD_TITLE_STYLE>"Descargar Datos"</h2>
            <div style="display: flex; flex-direction: column; gap: 8px;">
                {DOWNLOADS
                    .iter()
                    .map(|download| {
                        view! {
                            <a
                                href=download.url()
                                download=download.filename
                                style="display: flex; align-items: center; gap: 8px; font-size: 0.78rem; color: #1d4ed8; text-decoration: none;"
                            >
                                <span>"\u{2913}"</span>
                                <span>{download.label}</span>
                            </a>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
