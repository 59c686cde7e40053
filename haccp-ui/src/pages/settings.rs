//! Settings Page
//!
//! Fridges, company details, webhook and the server address.

use leptos::*;

use crate::api;
use crate::components::Loading;
use crate::state::global::GlobalState;

/// Settings page component
#[component]
pub fn Settings() -> impl IntoView {
    let settings = create_resource(|| (), |_| async move { api::fetch_settings().await });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Settings"</h1>
                <p class="text-gray-400 mt-1">"Fridges, company details and webhook"</p>
            </div>

            <Suspense fallback=move || view! { <Loading label="Loading settings..." /> }>
                {move || settings.get().map(|result| match result {
                    Ok(settings) => view! { <SettingsForm initial=settings /> }.into_view(),
                    Err(e) => view! {
                        <div class="bg-red-900/40 text-red-200 rounded-xl p-6">
                            {format!("Settings unavailable: {}", e)}
                        </div>
                    }.into_view(),
                })}
            </Suspense>

            <ApiSettings />
        </div>
    }
}

#[component]
fn SettingsForm(initial: api::Settings) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let draft = create_rw_signal(initial);
    let new_fridge = create_rw_signal(String::new());
    let saving = create_rw_signal(false);

    let state_for_add = state.clone();
    let add = move |_| {
        let name = new_fridge.get_untracked();
        if name.trim().is_empty() {
            state_for_add.show_error("Fridge name required");
            return;
        }
        let state = state_for_add.clone();
        spawn_local(async move {
            match api::add_fridge(name.trim()).await {
                Ok(response) => {
                    draft.update(|d| d.fridges = response.settings.fridges);
                    new_fridge.set(String::new());
                    state.show_success("Fridge added");
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    let state_for_remove = state.clone();
    let remove = move |fridge: api::Fridge| {
        if !confirm(&format!("Remove fridge \"{}\"?", fridge.name)) {
            return;
        }
        let state = state_for_remove.clone();
        spawn_local(async move {
            match api::remove_fridge(&fridge.id).await {
                Ok(response) => {
                    draft.update(|d| d.fridges = response.settings.fridges);
                    state.show_success("Fridge removed");
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    let state_for_save = state.clone();
    let save = move |_| {
        saving.set(true);
        let state = state_for_save.clone();
        let settings = draft.get_untracked();
        spawn_local(async move {
            match api::save_settings(&settings).await {
                Ok(response) => {
                    draft.set(response.settings);
                    state.show_success("Settings saved");
                    state.show_notices(&response.notices);
                }
                Err(e) => state.show_error(&e),
            }
            saving.set(false);
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Fridges"</h2>

            <For
                each=move || draft.get().fridges
                key=|fridge| fridge.id.clone()
                children=move |fridge| {
                    let remove = remove.clone();
                    let target = fridge.clone();
                    view! {
                        <div class="flex items-center justify-between py-2 border-b border-gray-700">
                            <span>{fridge.name}</span>
                            <button
                                on:click=move |_| remove(target.clone())
                                class="px-3 py-1 text-sm text-red-300 hover:bg-red-900/40 rounded-lg"
                            >
                                "Remove"
                            </button>
                        </div>
                    }
                }
            />

            <div class="flex space-x-2">
                <input
                    type="text"
                    placeholder="New fridge"
                    prop:value=move || new_fridge.get()
                    on:input=move |ev| new_fridge.set(event_target_value(&ev))
                    class="flex-1 bg-gray-700 rounded-lg px-4 py-3
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
                <button
                    on:click=add
                    class="px-4 py-3 bg-gray-600 hover:bg-gray-500 rounded-lg font-medium transition-colors"
                >
                    "Add"
                </button>
            </div>
        </section>

        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Company"</h2>
            <TextField
                label="Company name"
                value=Signal::derive(move || draft.with(|d| d.company_name.clone()))
                on_input=move |v: String| draft.update(|d| d.company_name = v)
            />
            <TextField
                label="Address"
                value=Signal::derive(move || draft.with(|d| d.company_address.clone()))
                on_input=move |v: String| draft.update(|d| d.company_address = v)
            />
            <TextField
                label="VAT number"
                value=Signal::derive(move || draft.with(|d| d.company_vat.clone()))
                on_input=move |v: String| draft.update(|d| d.company_vat = v)
            />
        </section>

        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Webhook"</h2>
            <TextField
                label="Webhook URL"
                value=Signal::derive(move || draft.with(|d| d.webhook_url.clone()))
                on_input=move |v: String| draft.update(|d| d.webhook_url = v)
            />
            <p class="text-sm text-gray-400">
                "Every saved entry is posted once to this address. The answer is not read, \
                 so a rejected request cannot be told apart from a delivered one. \
                 Leave empty to disable."
            </p>
        </section>

        <button
            on:click=save
            disabled=move || saving.get()
            class="px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                   rounded-lg font-medium transition-colors"
        >
            {move || if saving.get() { "Saving..." } else { "Save settings" }}
        </button>
    }
}

#[component]
fn TextField(
    label: &'static str,
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)]
    on_input: Callback<String>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-2">{label}</label>
            <input
                type="text"
                prop:value=move || value.get()
                on:input=move |ev| on_input.call(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-4 py-3
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
        </div>
    }
}

/// Server address used by the front end
#[component]
fn ApiSettings() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (api_url, set_api_url) = create_signal(api::get_api_base());
    let (testing, set_testing) = create_signal(false);

    let state_for_test = state.clone();
    let test_connection = move |_| {
        set_testing.set(true);
        api::set_api_base(&api_url.get());

        let state = state_for_test.clone();
        spawn_local(async move {
            match api::check_health().await {
                Ok(_) => state.show_success("Connection successful!"),
                Err(e) => state.show_error(&format!("Connection failed: {}", e)),
            }
            set_testing.set(false);
        });
    };

    let save_url = move |_| {
        api::set_api_base(&api_url.get());
        state.show_success("API URL saved");
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Server"</h2>

            <label class="block text-sm text-gray-400 mb-2">"View server URL"</label>
            <div class="flex space-x-2">
                <input
                    type="text"
                    prop:value=move || api_url.get()
                    on:input=move |ev| set_api_url.set(event_target_value(&ev))
                    class="flex-1 bg-gray-700 rounded-lg px-4 py-3
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
                <button
                    on:click=test_connection
                    disabled=move || testing.get()
                    class="px-4 py-3 bg-gray-600 hover:bg-gray-500 disabled:bg-gray-700
                           rounded-lg font-medium transition-colors"
                >
                    {move || if testing.get() { "Testing..." } else { "Test" }}
                </button>
                <button
                    on:click=save_url
                    class="px-4 py-3 bg-primary-600 hover:bg-primary-700
                           rounded-lg font-medium transition-colors"
                >
                    "Save"
                </button>
            </div>
        </section>
    }
}

/// Browser confirmation dialog; a missing window counts as "no"
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
