//! Modal Component
//!
//! Overlay shell shared by the form, upload and preview dialogs.

use leptos::prelude::*;

#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] open: Signal<bool>,
    /// Backdrop click and the close button
    #[prop(into)]
    on_cancel: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="modal-backdrop" on:click=move |_| on_cancel.run(())>
                <div class="modal" on:click=|ev| ev.stop_propagation()>
                    <header class="modal-header">
                        <h2>{move || title.get()}</h2>
                        <button class="modal-close" on:click=move |_| on_cancel.run(())>
                            "×"
                        </button>
                    </header>
                    <div class="modal-body">{children()}</div>
                </div>
            </div>
        </Show>
    }
}
