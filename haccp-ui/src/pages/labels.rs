//! Labels Page
//!
//! 60×40 mm labels for a single ingredient or a preparation.

use chrono::{Duration, Local, NaiveDate};
use leptos::*;

use crate::api;
use crate::components::save_download;
use crate::state::global::GlobalState;

/// Days from preparation to the suggested expiry
const DEFAULT_SHELF_LIFE_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum LabelKind {
    Ingredient,
    Preparation,
}

/// Labels page component
#[component]
pub fn Labels() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let today = Local::now().date_naive();
    let kind = create_rw_signal(LabelKind::Ingredient);
    let name = create_rw_signal(String::new());
    let ingredients = create_rw_signal(String::new());
    let prep_date = create_rw_signal(today.format("%Y-%m-%d").to_string());
    let expiry_date = create_rw_signal(String::new());
    let printing = create_rw_signal(false);

    let suggested_expiry = move || {
        prep_date
            .with(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| (d + Duration::days(DEFAULT_SHELF_LIFE_DAYS)).format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    let print = move |_| {
        if name.with_untracked(|n| n.trim().is_empty()) {
            state.show_error("Name required");
            return;
        }
        let expiry = expiry_date.get_untracked();
        let expiry = (!expiry.is_empty()).then_some(expiry);
        let label = match kind.get_untracked() {
            LabelKind::Ingredient => api::LabelRequest::Ingredient {
                name: name.get_untracked(),
                prep_date: prep_date.get_untracked(),
                expiry_date: expiry,
            },
            LabelKind::Preparation => api::LabelRequest::Preparation {
                name: name.get_untracked(),
                ingredients: ingredients.get_untracked(),
                prep_date: prep_date.get_untracked(),
                expiry_date: expiry,
            },
        };

        printing.set(true);
        let state = state.clone();
        spawn_local(async move {
            match api::create_label(&label).await {
                Ok(download) => match save_download(&download) {
                    Ok(()) => state.show_success(&format!("{} ready", download.filename)),
                    Err(e) => state.show_error(&e),
                },
                Err(e) => state.show_error(&e),
            }
            printing.set(false);
        });
    };

    let tab_class = move |tab: LabelKind| {
        if kind.get() == tab {
            "px-4 py-2 rounded-lg bg-primary-600 text-white"
        } else {
            "px-4 py-2 rounded-lg bg-gray-700 text-gray-300 hover:bg-gray-600"
        }
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Labels"</h1>
                <p class="text-gray-400 mt-1">"Print 60×40 mm labels"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4 max-w-xl">
                <div class="flex space-x-2">
                    <button
                        class=move || tab_class(LabelKind::Ingredient)
                        on:click=move |_| kind.set(LabelKind::Ingredient)
                    >
                        "Ingredient"
                    </button>
                    <button
                        class=move || tab_class(LabelKind::Preparation)
                        on:click=move |_| kind.set(LabelKind::Preparation)
                    >
                        "Preparation"
                    </button>
                </div>

                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Name"</label>
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                {move || (kind.get() == LabelKind::Preparation).then(|| view! {
                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Ingredients and allergens"</label>
                        <textarea
                            rows="3"
                            prop:value=move || ingredients.get()
                            on:input=move |ev| ingredients.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3
                                   border border-gray-600 focus:border-primary-500 focus:outline-none"
                        />
                    </div>
                })}

                <div class="grid grid-cols-2 gap-4">
                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Prepared on"</label>
                        <input
                            type="date"
                            prop:value=move || prep_date.get()
                            on:input=move |ev| prep_date.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                        />
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Expires on"</label>
                        <input
                            type="date"
                            placeholder=suggested_expiry
                            prop:value=move || expiry_date.get()
                            on:input=move |ev| expiry_date.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                        />
                        <p class="text-xs text-gray-500 mt-1">
                            {move || format!("Default: {}", suggested_expiry())}
                        </p>
                    </div>
                </div>

                <button
                    on:click=print
                    disabled=move || printing.get()
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                           rounded-lg font-medium transition-colors"
                >
                    {move || if printing.get() { "Rendering..." } else { "Print label" }}
                </button>
            </section>
        </div>
    }
}
