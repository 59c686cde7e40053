//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{Nav, Toast};
use crate::pages::{Dashboard, Labels, Report, Settings, Temperature};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=Dashboard />
                        <Route path="/temperature" view=Temperature />
                        <Route path="/labels" view=Labels />
                        <Route path="/report" view=Report />
                        <Route path="/settings" view=Settings />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Footer />

                <Toast />
            </div>
        </Router>
    }
}

/// Footer showing whether the view server answers
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let health = create_resource(|| (), |_| async move { api::check_health().await });

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="flex items-center space-x-2">
                    {move || match health.get() {
                        Some(Ok(h)) => view! {
                            <span class="flex items-center space-x-1 text-green-400">
                                <span class="w-2 h-2 bg-green-400 rounded-full" />
                                <span>{format!("Server v{} · {} entries", h.version, h.entries)}</span>
                            </span>
                        }.into_view(),
                        Some(Err(_)) => view! {
                            <span class="flex items-center space-x-1 text-red-400">
                                <span class="w-2 h-2 bg-red-400 rounded-full" />
                                <span>"Server unreachable"</span>
                            </span>
                        }.into_view(),
                        None => view! { <span class="text-gray-400">"Connecting..."</span> }.into_view(),
                    }}
                </div>

                {move || {
                    if state.loading.get() {
                        view! {
                            <div class="flex items-center space-x-2 text-primary-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Loading..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
