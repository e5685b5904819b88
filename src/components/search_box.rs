//! Search Box Component
//!
//! Text input that hands its value on once typing pauses.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SearchBox(
    #[prop(into)] on_search: Callback<String>,
    debounce_ms: u32,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    let (text, set_text) = signal(String::new());
    // Each keystroke supersedes the pending one
    let pending = StoredValue::new(0u64);

    let schedule = move |value: String| {
        let ticket = pending.try_update_value(|p| {
            *p += 1;
            *p
        });
        let Some(ticket) = ticket else { return };
        spawn_local(async move {
            TimeoutFuture::new(debounce_ms).await;
            if pending.try_get_value() == Some(ticket) {
                on_search.run(value);
            }
        });
    };

    view! {
        <div class="search-box">
            <input
                type="search"
                placeholder=placeholder.unwrap_or_else(|| "Search...".to_string())
                prop:value=move || text.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    set_text.set(value.clone());
                    schedule(value);
                }
            />
            <Show when=move || !text.get().is_empty()>
                <button
                    class="search-clear"
                    on:click=move |_| {
                        set_text.set(String::new());
                        pending.update_value(|p| *p += 1);
                        on_search.run(String::new());
                    }
                >
                    "×"
                </button>
            </Show>
        </div>
    }
}
