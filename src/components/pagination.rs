//! Pagination Component
//!
//! Prev/next buttons around a window of page numbers.

use leptos::prelude::*;

use crate::paging::{clamp_page, page_window};

/// Page numbers shown at once
const WINDOW_SPAN: u32 = 5;

#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    /// Receives an already clamped page number
    #[prop(into)]
    on_select: Callback<u32>,
) -> impl IntoView {
    let go = move |target: u32| {
        let target = clamp_page(target, total_pages.get_untracked());
        if target != page.get_untracked() {
            on_select.run(target);
        }
    };

    view! {
        <nav class="pagination">
            <button
                class="page-btn"
                disabled=move || page.get() <= 1
                on:click=move |_| go(page.get_untracked().saturating_sub(1))
            >
                "‹"
            </button>
            {move || {
                let current = page.get();
                page_window(current, total_pages.get(), WINDOW_SPAN)
                    .into_iter()
                    .map(|n| {
                        let class = if n == current { "page-btn active" } else { "page-btn" };
                        view! {
                            <button class=class on:click=move |_| go(n)>
                                {n}
                            </button>
                        }
                    })
                    .collect_view()
            }}
            <button
                class="page-btn"
                disabled=move || page.get() >= total_pages.get()
                on:click=move |_| go(page.get_untracked() + 1)
            >
                "›"
            </button>
            <span class="page-info">{move || format!("{} / {}", page.get(), total_pages.get().max(1))}</span>
        </nav>
    }
}
