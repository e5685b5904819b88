//! Year Selector Component
//!
//! Picks the session's selected year; year-scoped lists refetch on change.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::session::current_year;

/// Years offered before the current one
const YEARS_BACK: i32 = 5;

/// Years offered from `selected` and today, newest first
fn year_options(selected: i32, today: i32) -> Vec<i32> {
    let newest = today.max(selected);
    let oldest = (today - YEARS_BACK).min(selected);
    (oldest..=newest).rev().collect()
}

#[component]
pub fn YearSelector() -> impl IntoView {
    let ctx = use_app_context();
    let selected = {
        let ctx = ctx.clone();
        Signal::derive(move || ctx.selected_year())
    };

    view! {
        <select
            class="year-selector"
            on:change=move |ev| {
                match event_target_value(&ev).parse::<i32>() {
                    Ok(year) => ctx.set_selected_year(year),
                    Err(_) => log::warn!("[YearSelector] ignoring unparseable year"),
                }
            }
        >
            {move || {
                let current = selected.get();
                year_options(current, current_year())
                    .into_iter()
                    .map(|year| {
                        view! {
                            <option value=year.to_string() selected=year == current>
                                {year}
                            </option>
                        }
                    })
                    .collect_view()
            }}
        </select>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_cover_recent_years() {
        assert_eq!(year_options(2024, 2024), vec![2024, 2023, 2022, 2021, 2020, 2019]);
    }

    #[test]
    fn test_options_include_out_of_range_selection() {
        let options = year_options(2012, 2024);
        assert_eq!(options.first(), Some(&2024));
        assert_eq!(options.last(), Some(&2012));
        assert!(year_options(2026, 2024).contains(&2026));
    }
}
