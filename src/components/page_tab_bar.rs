//! Page Tab Bar Component
//!
//! Tabs for switching between record pages, plus the year selector.

use leptos::prelude::*;

use crate::components::YearSelector;
use crate::pages::Page;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn PageTabBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="page-tab-bar">
            {Page::ALL
                .into_iter()
                .map(|page| {
                    let tab_class = move || {
                        if store.active_page().get() == page { "page-tab active" } else { "page-tab" }
                    };
                    view! {
                        <button
                            class=tab_class
                            on:click=move |_| {
                                log::debug!("[PageTabBar] switching to {:?}", page);
                                store.active_page().set(page);
                            }
                        >
                            {page.label()}
                        </button>
                    }
                })
                .collect_view()}
            <Show when=move || store.active_page().get().year_scoped()>
                <YearSelector />
            </Show>
        </div>
    }
}
