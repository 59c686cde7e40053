//! Dashboard Page
//!
//! Entry counter, recent activity and a shortcut to today's capture.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::LogbookSkeleton;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let summary = create_resource(|| (), |_| async move { api::fetch_dashboard().await });

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Dashboard"</h1>
                    <p class="text-gray-400 mt-1">"Daily temperature log"</p>
                </div>
                <A
                    href="/temperature"
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                >
                    "New entry"
                </A>
            </div>

            <Suspense fallback=move || view! { <LogbookSkeleton rows=5 /> }>
                {move || summary.get().map(|result| match result {
                    Ok(summary) => view! { <Overview summary=summary /> }.into_view(),
                    Err(e) => view! {
                        <div class="bg-red-900/40 text-red-200 rounded-xl p-6">
                            {format!("Dashboard unavailable: {}", e)}
                        </div>
                    }.into_view(),
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn Overview(summary: api::DashboardSummary) -> impl IntoView {
    let empty = summary.recent.is_empty();

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <div class="text-sm text-gray-400">"Entries in the log"</div>
            <div class="text-4xl font-bold mt-1">{summary.total_entries}</div>
        </section>

        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Recent activity"</h2>
            {if empty {
                view! {
                    <p class="text-gray-400">"No entries yet. Record today's temperatures to start the log."</p>
                }.into_view()
            } else {
                summary.recent.into_iter().map(|entry| view! {
                    <div class="flex items-center justify-between py-3 border-b border-gray-700 last:border-0">
                        <div>
                            <div class="font-medium capitalize">{entry.date_label}</div>
                            <div class="text-sm text-gray-400">
                                {format!("{} fridges checked", entry.fridges_checked)}
                            </div>
                        </div>
                        <img src=entry.signature alt="Signature" class="h-10 bg-white rounded" />
                    </div>
                }).collect_view()
            }}
        </section>
    }
}
