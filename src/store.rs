//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::notify::Toast;
use crate::pages::Page;

/// App-wide UI state
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Record page shown in the main area
    pub active_page: Page,
    /// Visible notifications, oldest first
    pub toasts: Vec<Toast>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}
