//! Temperature Page
//!
//! One reading per fridge, a signature, and the submit button.

use leptos::*;
use std::collections::HashMap;

use crate::api;
use crate::components::{Loading, SignaturePad};
use crate::state::global::GlobalState;

/// How long the saved state stays on screen
const SUCCESS_DISPLAY_MS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Saving,
    Saved,
}

/// Temperature capture page component
#[component]
pub fn Temperature() -> impl IntoView {
    let form = create_resource(|| (), |_| async move { api::fetch_temperature_form().await });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Temperature"</h1>
                <p class="text-gray-400 mt-1">"Record today's readings and sign"</p>
            </div>

            <Suspense fallback=move || view! { <Loading label="Loading fridges..." /> }>
                {move || form.get().map(|result| match result {
                    Ok(form) => view! { <CaptureForm form=form /> }.into_view(),
                    Err(e) => view! {
                        <div class="bg-red-900/40 text-red-200 rounded-xl p-6">
                            {format!("Form unavailable: {}", e)}
                        </div>
                    }.into_view(),
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn CaptureForm(form: api::TemperatureForm) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let readings = create_rw_signal(HashMap::<String, String>::new());
    let signature = create_rw_signal(None::<String>);
    let reset = create_rw_signal(0u32);
    let phase = create_rw_signal(if form.status == "saving" { Phase::Saving } else { Phase::Idle });

    let fridges = form.fridges.clone();
    let webhook_enabled = form.webhook_enabled;

    let submit = move |_| {
        if phase.get_untracked() != Phase::Idle {
            return;
        }
        let Some(signature_url) = signature.get_untracked() else {
            state.show_error("Signature required");
            return;
        };

        phase.set(Phase::Saving);
        let state = state.clone();
        spawn_local(async move {
            match api::submit_temperatures(readings.get_untracked(), signature_url).await {
                Ok(response) => {
                    state.show_success("Temperature log saved");
                    state.show_notices(&response.notices);
                    if let Some(e) = response.webhook_error {
                        web_sys::console::warn_1(&format!("Webhook failed: {}", e).into());
                    }

                    readings.set(HashMap::new());
                    signature.set(None);
                    reset.update(|n| *n += 1);
                    phase.set(Phase::Saved);
                    gloo_timers::callback::Timeout::new(SUCCESS_DISPLAY_MS, move || {
                        phase.set(Phase::Idle);
                    })
                    .forget();
                }
                Err(e) => {
                    state.show_error(&e);
                    phase.set(Phase::Idle);
                }
            }
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Readings (°C)"</h2>
            {if fridges.is_empty() {
                view! {
                    <p class="text-gray-400">"No fridges configured. Add them in Settings."</p>
                }.into_view()
            } else {
                fridges.into_iter().map(|fridge| {
                    let id = fridge.id.clone();
                    let id_for_input = fridge.id.clone();
                    let id_for_toggle = fridge.id.clone();
                    view! {
                        <div class="flex items-center space-x-3">
                            <label class="w-48 text-gray-300">{fridge.name}</label>
                            <button
                                type="button"
                                on:click=move |_| readings.update(|r| {
                                    let current = r.get(&id_for_toggle).cloned().unwrap_or_default();
                                    r.insert(id_for_toggle.clone(), toggle_sign(&current));
                                })
                                class="w-10 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg font-mono"
                            >
                                "±"
                            </button>
                            <input
                                type="text"
                                inputmode="decimal"
                                placeholder="0.0"
                                prop:value=move || readings.with(|r| r.get(&id).cloned().unwrap_or_default())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    readings.update(|r| {
                                        r.insert(id_for_input.clone(), value);
                                    });
                                }
                                class="w-32 bg-gray-700 rounded-lg px-4 py-2
                                       border border-gray-600 focus:border-primary-500 focus:outline-none"
                            />
                        </div>
                    }
                }).collect_view()
            }}
        </section>

        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Signature"</h2>
            <SignaturePad
                on_change=move |url: Option<String>| signature.set(url)
                reset=reset
            />
        </section>

        <div class="flex items-center space-x-4">
            <button
                on:click=submit
                disabled=move || phase.get() != Phase::Idle
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                       rounded-lg font-medium transition-colors"
            >
                {move || match phase.get() {
                    Phase::Idle => "Save",
                    Phase::Saving => "Saving...",
                    Phase::Saved => "Saved ✓",
                }}
            </button>
            {webhook_enabled.then(|| view! {
                <span class="text-sm text-gray-400">"A copy is sent to the configured webhook"</span>
            })}
        </div>
    }
}

/// Flip the leading minus of a typed value; text that is not a number is kept
fn toggle_sign(raw: &str) -> String {
    match raw {
        "" => "-".to_string(),
        "-" => String::new(),
        text if text.trim().replace(',', ".").parse::<f64>().is_err() => text.to_string(),
        text => match text.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{}", text),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sign() {
        assert_eq!(toggle_sign("4.5"), "-4.5");
        assert_eq!(toggle_sign("-18"), "18");
        assert_eq!(toggle_sign(""), "-");
        assert_eq!(toggle_sign("-"), "");
        assert_eq!(toggle_sign("3,5"), "-3,5");
        assert_eq!(toggle_sign("abc"), "abc");
    }
}
