//! Admin Dashboard App
//!
//! Tab bar on top, the active record page below, toasts in the corner.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{PageTabBar, ToastContainer};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::notify::Notifier;
use crate::store::{AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    let store = Store::new(AppState::default());
    let notifier = Notifier::new(store, config.toast_duration_ms);
    let ctx = AppContext::new(config);
    let authenticated = ctx.session().is_authenticated();

    // Provide context to all children
    provide_context(store);
    provide_context(notifier);
    provide_context(ctx);

    if !authenticated {
        log::warn!("[App] no session token, not loading any page");
        return view! {
            <div class="signed-out">
                <h1>"Admin"</h1>
                <p>"Your session has ended. Please sign in again."</p>
            </div>
        }
        .into_any();
    }

    view! {
        <div class="app-layout">
            <PageTabBar />
            <main class="main-content">
                // Re-mounted on switch; the old page drops its pending responses
                {move || store.active_page().get().view()}
            </main>
            <ToastContainer />
        </div>
    }
    .into_any()
}
