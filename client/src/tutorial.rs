use gloo_storage::Storage;
use leptos::prelude::*;

use riesgo_shared::tutorial::{Placement, TUTORIAL_STORAGE_KEY, locale};
use riesgo_shared::{TutorialState, TutorialStore};

use crate::app::Tutorial;

const CARD_WIDTH: f64 = 340.0;
const CARD_GAP: f64 = 12.0;
const EDGE_MARGIN: f64 = 8.0;

/// Seen flag kept in `localStorage`.
pub struct BrowserTutorialStore;

impl TutorialStore for BrowserTutorialStore {
    fn seen(&self) -> bool {
        gloo_storage::LocalStorage::get::<serde_json::Value>(TUTORIAL_STORAGE_KEY).is_ok()
    }

    fn mark_seen(&mut self) {
        if let Err(e) = gloo_storage::LocalStorage::set(TUTORIAL_STORAGE_KEY, true) {
            web_sys::console::warn_1(&format!("Could not persist tutorial flag: {e}").into());
        }
    }
}

/// Target box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TargetRect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

fn target_rect(selector: &str) -> Option<TargetRect> {
    let document = web_sys::window()?.document()?;
    let element = document.query_selector(selector).ok()??;
    let rect = element.get_bounding_client_rect();
    Some(TargetRect {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
    })
}

fn viewport_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

/// Top-left corner of the step card. Centered steps, missing targets and cards that would
/// leave the viewport fall back to the middle of the screen.
fn card_origin(
    placement: Placement,
    target: Option<TargetRect>,
    viewport: (f64, f64),
    card_height: f64,
) -> (f64, f64) {
    let (vw, vh) = viewport;
    let centered = (
        ((vw - CARD_WIDTH) / 2.0).max(EDGE_MARGIN),
        ((vh - card_height) / 2.0).max(EDGE_MARGIN),
    );
    let Some(rect) = target else {
        return centered;
    };
    let left = match placement {
        Placement::Center => return centered,
        Placement::Right => rect.right + CARD_GAP,
        Placement::Left => rect.left - CARD_GAP - CARD_WIDTH,
    };
    if left < EDGE_MARGIN || left + CARD_WIDTH > vw - EDGE_MARGIN {
        return centered;
    }
    let top = rect
        .top
        .min(vh - card_height - EDGE_MARGIN)
        .max(EDGE_MARGIN);
    (left, top)
}

/// Step-by-step walkthrough drawn over the dashboard while the tutorial runs.
#[component]
pub fn TutorialOverlay() -> impl IntoView {
    let Tutorial(tutorial) = expect_context();

    let advance = move |_: web_sys::MouseEvent| {
        tutorial.update(|machine| {
            let outcome = if machine.is_last_step() {
                machine.finish(&mut BrowserTutorialStore)
            } else {
                machine.next(&mut BrowserTutorialStore)
            };
            if outcome == TutorialState::Finished {
                web_sys::console::info_1(&"tutorial finished".into());
            }
        });
    };
    let back = move |_: web_sys::MouseEvent| {
        tutorial.update(|machine| {
            machine.back();
        });
    };
    let dismiss = move |_: web_sys::MouseEvent| {
        tutorial.update(|machine| {
            machine.skip(&mut BrowserTutorialStore);
        });
    };

    view! {
        {move || {
            let Some((index, step, total, last)) = tutorial.with(|machine| {
                machine
                    .current_step()
                    .map(|(index, step)| (index, step, machine.step_count(), machine.is_last_step()))
            }) else {
                return ().into_any();
            };

            let card_height = if step.warning.is_some() { 300.0 } else { 200.0 };
            let target = (step.placement != Placement::Center)
                .then(|| target_rect(step.target))
                .flatten();
            let (left, top) = card_origin(step.placement, target, viewport_size(), card_height);
            let highlight = target.map(|rect| {
                format!(
                    "position: fixed; left: {}px; top: {}px; width: {}px; height: {}px; border-radius: 6px; box-shadow: 0 0 0 9999px rgba(15,23,42,0.5); pointer-events: none; z-index: 1000;",
                    rect.left - 4.0,
                    rect.top - 4.0,
                    rect.right - rect.left + 8.0,
                    rect.bottom - rect.top + 8.0,
                )
            });

            view! {
                {match highlight {
                    Some(style) => view! { <div style=style /> }.into_any(),
                    None => view! {
                        <div style="position: fixed; inset: 0; background: rgba(15,23,42,0.5); z-index: 1000;" />
                    }
                        .into_any(),
                }}
                <div
                    role="dialog"
                    style=format!(
                        "position: fixed; left: {left}px; top: {top}px; width: {CARD_WIDTH}px; z-index: 1001; background: #ffffff; border-radius: 10px; box-shadow: 0 16px 40px rgba(15,23,42,0.3); padding: 18px 20px; box-sizing: border-box;"
                    )
                >
                    <button
                        title=locale::CLOSE
                        aria-label=locale::CLOSE
                        style="position: absolute; top: 8px; right: 10px; background: none; border: none; cursor: pointer; font-size: 1rem; color: #64748b;"
                        on:click=dismiss
                    >
                        "\u{2715}"
                    </button>
                    <h3 style="margin: 0 24px 10px 0; font-size: 1.05rem; font-weight: 600; color: #0f172a;">{step.title}</h3>
                    {step.warning.map(|warning| view! {
                        <div style="margin-bottom: 12px; padding: 10px 12px; border: 1px solid #fde68a; background: #fefce8; border-radius: 8px;">
                            <p style="margin: 0; font-size: 0.8rem; font-weight: 600; color: #854d0e;">"\u{26A0} PROYECTO PILOTO"</p>
                            <p style="margin: 4px 0 0; font-size: 0.78rem; color: #a16207;">{warning}</p>
                        </div>
                    })}
                    <p style="margin: 0; font-size: 0.85rem; line-height: 1.45; color: #334155;">{step.body}</p>
                    <div style="display: flex; align-items: center; justify-content: space-between; margin-top: 16px; gap: 8px;">
                        <button
                            style="background: none; border: none; cursor: pointer; font-size: 0.75rem; color: #64748b; padding: 0;"
                            on:click=dismiss
                        >
                            {locale::SKIP}
                        </button>
                        <div style="display: flex; align-items: center; gap: 8px;">
                            <span style="font-size: 0.72rem; color: #94a3b8;">{format!("{} de {}", index + 1, total)}</span>
                            {(index > 0).then(|| view! {
                                <button
                                    style="padding: 6px 10px; border-radius: 6px; border: 1px solid #cbd5e1; background: #ffffff; cursor: pointer; font-size: 0.75rem; color: #0f172a;"
                                    on:click=back
                                >
                                    {locale::BACK}
                                </button>
                            })}
                            <button
                                style="padding: 6px 12px; border-radius: 6px; border: 1px solid #0f172a; background: #0f172a; cursor: pointer; font-size: 0.75rem; color: #f8fafc;"
                                on:click=advance
                            >
                                {if last { locale::LAST } else { locale::NEXT }}
                            </button>
                        </div>
                    </div>
                </div>
            }
                .into_any()
        }}
    }
}
