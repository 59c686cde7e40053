//! Monthly Report Page
//!
//! Exports the current month's register as PDF.

use leptos::*;

use crate::api;
use crate::components::save_download;
use crate::state::global::GlobalState;

/// Monthly report page component
#[component]
pub fn Report() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let exporting = create_rw_signal(false);

    let month = chrono::Local::now().format("%m/%Y").to_string();

    let export = move |_| {
        exporting.set(true);
        let state = state.clone();
        spawn_local(async move {
            match api::fetch_report().await {
                Ok(download) => {
                    state.show_notices(&download.notices);
                    match save_download(&download) {
                        Ok(()) => state.show_success(&format!("{} ready", download.filename)),
                        Err(e) => state.show_error(&e),
                    }
                }
                Err(e) => state.show_error(&e),
            }
            exporting.set(false);
        });
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Monthly Report"</h1>
                <p class="text-gray-400 mt-1">"HACCP temperature register"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4 max-w-xl">
                <p class="text-gray-300">
                    {format!("The report covers every entry of {} with the signatures collected.", month)}
                </p>
                <p class="text-sm text-gray-400">
                    "Company name, address and VAT number from Settings are printed in the header."
                </p>
                <button
                    on:click=export
                    disabled=move || exporting.get()
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                           rounded-lg font-medium transition-colors"
                >
                    {move || if exporting.get() { "Exporting..." } else { "Export PDF" }}
                </button>
            </section>
        </div>
    }
}
