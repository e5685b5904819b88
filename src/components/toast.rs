//! Toast Container Component
//!
//! Renders the store's notifications; click one to dismiss it early.

use leptos::prelude::*;

use crate::notify::use_notifier;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ToastContainer() -> impl IntoView {
    let store = use_app_store();
    let notifier = use_notifier();

    view! {
        <div class="toast-container">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() on:click=move |_| notifier.dismiss(id)>
                            {toast.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
