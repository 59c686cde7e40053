//! Global Application State
//!
//! Signals shared across views: loading flag and toast messages.

use leptos::*;

/// Global application state
#[derive(Clone)]
pub struct GlobalState {
    /// A request is in flight
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message to display
    pub success: RwSignal<Option<String>>,
    /// Informational notices, e.g. missing company details
    pub notice: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
        notice: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }

    /// Show server notices one after the other in a single toast
    pub fn show_notices(&self, notices: &[String]) {
        if notices.is_empty() {
            return;
        }
        self.notice.set(Some(notices.join(" · ")));

        let notice_signal = self.notice;
        gloo_timers::callback::Timeout::new(6000, move || {
            notice_signal.set(None);
        })
        .forget();
    }
}
