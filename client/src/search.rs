use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use riesgo_shared::geocoding::{self, ClientConfig, GeocodeResult};

use crate::app::RecenterRequest;

const DEBOUNCE_MS: u32 = 300;
const MIN_QUERY_CHARS: usize = 3;

async fn fetch_client_config() -> Result<ClientConfig, String> {
    let resp = gloo_net::http::Request::get("/api/config")
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.json::<ClientConfig>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

async fn geocode(config: &ClientConfig, query: &str) -> Result<Vec<GeocodeResult>, String> {
    let key = config
        .geocoder_api_key
        .as_deref()
        .ok_or("geocoder not configured")?;
    let encoded = String::from(js_sys::encode_uri_component(query));
    let url = geocoding::search_url(&encoded, key, config.geocoder_bbox);
    let resp = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let body = resp.text().await.map_err(|e| format!("read error: {e}"))?;
    geocoding::parse_results(&body)
}

fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// The indicator belongs to the latest keystroke only; older lookups still in flight stay silent.
fn shows_searching(in_flight: Option<u64>, latest: u64) -> bool {
    in_flight == Some(latest)
}

/// Clear the in-flight ticket unless a newer lookup has already taken it over.
fn land(in_flight: &mut Option<u64>, ticket: u64) {
    if *in_flight == Some(ticket) {
        *in_flight = None;
    }
}

/// Address box over the map. Hidden unless the server hands out a geocoder key.
#[component]
pub fn AddressSearch() -> impl IntoView {
    let RecenterRequest(recenter) = expect_context();
    let config: RwSignal<Option<ClientConfig>> = RwSignal::new(None);
    let query = RwSignal::new(String::new());
    let results: RwSignal<Vec<GeocodeResult>> = RwSignal::new(Vec::new());
    let in_flight: RwSignal<Option<u64>> = RwSignal::new(None);
    let nonce = RwSignal::new(0u64);

    Effect::new(move || {
        spawn_local(async move {
            match fetch_client_config().await {
                Ok(fetched) if fetched.geocoder_enabled() => config.set(Some(fetched)),
                Ok(_) => {}
                Err(e) => {
                    web_sys::console::warn_1(&format!("Client config fetch failed: {e}").into());
                }
            }
        });
    });

    let run_search = move |text: String| {
        nonce.update(|n| *n += 1);
        let ticket = nonce.get_untracked();
        if !is_searchable(&text) {
            results.set(Vec::new());
            return;
        }
        let Some(cfg) = config.get_untracked() else {
            return;
        };
        spawn_local(async move {
            TimeoutFuture::new(DEBOUNCE_MS).await;
            if nonce.get_untracked() != ticket {
                return;
            }
            in_flight.set(Some(ticket));
            let outcome = geocode(&cfg, text.trim()).await;
            in_flight.update(|current| land(current, ticket));
            if nonce.get_untracked() != ticket {
                return;
            }
            match outcome {
                Ok(found) => results.set(found),
                Err(e) => {
                    results.set(Vec::new());
                    web_sys::console::warn_1(&format!("Geocoding failed: {e}").into());
                }
            }
        });
    };

    let pick = move |result: GeocodeResult| {
        query.set(result.label.clone());
        results.set(Vec::new());
        nonce.update(|n| *n += 1);
        recenter.set(Some(result));
    };

    view! {
        {move || {
            if config.with(Option::is_none) {
                return ().into_any();
            }
            view! {
                <div style="position: relative;">
                    <input
                        type="search"
                        placeholder="Buscar dirección..."
                        prop:value=move || query.get()
                        on:input=move |e| {
                            let text = event_target_value(&e);
                            query.set(text.clone());
                            run_search(text);
                        }
                        on:keydown=move |e: web_sys::KeyboardEvent| {
                            if e.key() == "Enter"
                                && let Some(first) = results.with_untracked(|r| r.first().cloned())
                            {
                                e.prevent_default();
                                pick(first);
                            } else if e.key() == "Escape" {
                                results.set(Vec::new());
                            }
                        }
                        style="width: 100%; box-sizing: border-box; padding: 8px 12px; border-radius: 6px; border: 1px solid #cbd5e1; background: rgba(255,255,255,0.95); box-shadow: 0 4px 12px rgba(15,23,42,0.15); font-size: 0.82rem; color: #0f172a; outline: none;"
                    />
                    {move || shows_searching(in_flight.get(), nonce.get()).then(|| view! {
                        <div style="position: absolute; right: 10px; top: 9px; font-size: 0.7rem; color: #64748b;">"Buscando..."</div>
                    })}
                    {move || {
                        let found = results.get();
                        if found.is_empty() {
                            return ().into_any();
                        }
                        view! {
                            <ul style="position: absolute; left: 0; right: 0; top: calc(100% + 4px); margin: 0; padding: 4px 0; list-style: none; background: #ffffff; border: 1px solid #e2e8f0; border-radius: 6px; box-shadow: 0 8px 24px rgba(15,23,42,0.18); max-height: 240px; overflow-y: auto;">
                                {found
                                    .into_iter()
                                    .map(|result| {
                                        let label = result.label.clone();
                                        view! {
                                            <li
                                                style="padding: 7px 12px; font-size: 0.78rem; color: #0f172a; cursor: pointer;"
                                                on:click=move |_| pick(result.clone())
                                            >
                                                {label}
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        }
                            .into_any()
                    }}
                </div>
            }
                .into_any()
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_do_not_hit_the_geocoder() {
        assert!(!is_searchable(""));
        assert!(!is_searchable("  7 "));
        assert!(is_searchable("calle 7"));
        assert!(is_searchable("1 y 60"));
    }

    #[test]
    fn indicator_clears_when_query_is_shortened_mid_lookup() {
        // "calle" goes out as lookup 1, then deleting to "ca" bumps the nonce to 2.
        let mut in_flight = Some(1);
        assert!(shows_searching(in_flight, 1));
        assert!(!shows_searching(in_flight, 2));

        land(&mut in_flight, 1);
        assert_eq!(in_flight, None);
        assert!(!shows_searching(in_flight, 2));
    }

    #[test]
    fn late_lookup_does_not_clear_a_newer_one() {
        let mut in_flight = Some(3);
        land(&mut in_flight, 2);
        assert_eq!(in_flight, Some(3));
        assert!(shows_searching(in_flight, 3));
    }
}
