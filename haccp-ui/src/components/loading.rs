//! Placeholders shown while the view server answers

use leptos::*;

/// Spinner with a caption naming what is being fetched
#[component]
pub fn Loading(
    #[prop(default = "Loading...")]
    label: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-3 text-gray-400">
            <div class="loading-spinner w-8 h-8" />
            <span class="text-sm">{label}</span>
        </div>
    }
}

/// Shape of the dashboard while the logbook loads: a counter card and
/// `rows` recent entries, each a date line, a fridge count and a signature
#[component]
pub fn LogbookSkeleton(rows: usize) -> impl IntoView {
    view! {
        <div class="space-y-8 animate-pulse">
            <div class="bg-gray-800 rounded-xl p-6 space-y-2">
                <div class="bg-gray-700 rounded h-4 w-32" />
                <div class="bg-gray-700 rounded h-10 w-16" />
            </div>
            <div class="bg-gray-800 rounded-xl p-6">
                {(0..rows).map(|_| view! {
                    <div class="flex items-center justify-between py-3 border-b border-gray-700 last:border-0">
                        <div class="space-y-2">
                            <div class="bg-gray-700 rounded h-4 w-40" />
                            <div class="bg-gray-700 rounded h-3 w-24" />
                        </div>
                        <div class="bg-gray-600 rounded h-10 w-24" />
                    </div>
                }).collect_view()}
            </div>
        </div>
    }
}
