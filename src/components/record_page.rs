//! Record Page
//!
//! Search, table, pagination and dialogs for one record type. Every page
//! in the dashboard is this component instantiated with a different `Record`.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_blob::use_blob_slot;

use crate::api::{Attachment, AttachmentKind};
use crate::components::preview_modal::{open_preview, PreviewModal, PreviewTarget};
use crate::components::record_form::RecordFormModal;
use crate::components::upload_modal::{UploadModal, UploadTarget};
use crate::components::{DeleteConfirmButton, Pagination, SearchBox};
use crate::context::use_app_context;
use crate::hooks::{list_state, use_list_controller, use_modal};
use crate::models::{Record, RecordDraft};
use crate::notify::use_notifier;
use crate::paging::Filters;

/// Filter key carrying the session's selected year
const YEAR_FILTER: &str = "year";

/// Row identity for the table. Includes the content so an edited record
/// gets a fresh row instead of keeping its old cells and Edit draft.
fn row_key<R: Record>(row: &R) -> (u64, Vec<String>, BTreeMap<String, String>) {
    (row.id(), row.cells(), row.to_draft().values)
}

#[component]
pub fn RecordPage<R: Record>(#[prop(optional)] _record: PhantomData<fn() -> R>) -> impl IntoView {
    let ctx = use_app_context();
    let notifier = use_notifier();
    let config = ctx.config.clone();
    let year_scoped = R::RESOURCE.year_scoped;

    let mut filters = Filters::new();
    if year_scoped {
        filters.insert(YEAR_FILTER.to_string(), ctx.selected_year_untracked().into());
    }
    let list = use_list_controller(
        ctx.resource::<R>(),
        list_state(config.page_limit, config.search_min_length, filters),
        notifier,
    );

    if year_scoped {
        let ctx = ctx.clone();
        Effect::new(move |_| {
            let year = ctx.selected_year();
            list.set_filter(YEAR_FILTER, Some(year.into()));
        });
    }

    let resource = StoredValue::new(ctx.resource::<R>());
    let services = StoredValue::new(ctx);
    let form = use_modal::<RecordDraft>(list.refresh);
    let upload = use_modal::<UploadTarget>(list.refresh);
    let preview = use_modal::<PreviewTarget>(list.refresh);
    let slot = use_blob_slot();
    let editable = !R::FIELDS.is_empty();

    let delete = move |id: u64| {
        let resource = resource.get_value();
        spawn_local(async move {
            match resource.delete(id).await {
                Ok(_) => {
                    notifier.success(format!("{} #{} deleted", R::RESOURCE.label, id));
                    list.trigger_refresh();
                }
                Err(err) => notifier.api_error(&err),
            }
        });
    };

    let run_attachment = move |attachment: Attachment, id: u64| {
        let path = attachment.path(&R::RESOURCE, id);
        match attachment.kind() {
            AttachmentKind::Download => {
                let gateway = services.with_value(|c| c.blob_gateway());
                let name = attachment.file_name(&R::RESOURCE, id);
                spawn_local(async move {
                    if let Err(err) = gateway.download_as_file(&path, &name).await {
                        notifier.api_error(&err);
                    }
                });
            }
            AttachmentKind::Preview => open_preview(
                preview,
                slot,
                services.with_value(|c| c.blob_gateway()),
                PreviewTarget { title: format!("{} #{}", attachment.label(), id), path },
                notifier,
            ),
            AttachmentKind::Upload => upload.open_with(UploadTarget { id, attachment: Some(attachment) }),
        }
    };

    view! {
        <section class="record-page">
            <div class="record-toolbar">
                <SearchBox
                    on_search=move |q: String| list.set_query(&q)
                    debounce_ms=config.search_debounce_ms
                    placeholder=format!("Search {}", R::RESOURCE.label.to_lowercase())
                />
                <Show when=move || editable>
                    <button class="primary-btn" on:click=move |_| form.open()>
                        "New"
                    </button>
                </Show>
            </div>
            <table class="record-table" class:loading=move || list.is_loading()>
                <thead>
                    <tr>
                        {R::COLUMNS.iter().map(|c| view! { <th>{*c}</th> }).collect_view()}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.items()
                        key={row_key::<R>}
                        children=move |row: R| {
                            let id = row.id();
                            let draft = row.to_draft();
                            view! {
                                <tr>
                                    {row.cells().into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                                    <td class="row-actions">
                                        {R::ATTACHMENTS
                                            .iter()
                                            .map(|a| {
                                                let a = *a;
                                                view! {
                                                    <button class="row-btn" on:click=move |_| run_attachment(a, id)>
                                                        {a.label()}
                                                    </button>
                                                }
                                            })
                                            .collect_view()}
                                        {editable.then(|| view! {
                                            <button class="row-btn" on:click=move |_| form.open_with(draft.clone())>
                                                "Edit"
                                            </button>
                                            <DeleteConfirmButton on_confirm=move |_| delete(id) />
                                        })}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            <Show when=move || !list.is_loading() && list.state.with(|s| s.items().is_empty())>
                <p class="empty">"No records"</p>
            </Show>
            <Pagination
                page=Signal::derive(move || list.page())
                total_pages=Signal::derive(move || list.total_pages())
                on_select=move |n| list.set_page(n)
            />
            <RecordFormModal<R> form=form resource=resource notifier=notifier />
            <UploadModal upload=upload resource=R::RESOURCE services=services notifier=notifier />
            <PreviewModal preview=preview slot=slot />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contract;

    fn contract(amount: f64) -> Contract {
        Contract {
            id: 7,
            number: "C-7".to_string(),
            client_name: "Acme".to_string(),
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_edited_row_gets_new_key() {
        let before = contract(1200.0);
        let after = contract(1500.0);
        assert_eq!(before.id(), after.id());
        assert_ne!(row_key(&before), row_key(&after));
        assert_eq!(row_key(&before), row_key(&contract(1200.0)));
    }

    #[test]
    fn test_signed_date_change_gets_new_key() {
        let before = contract(1200.0);
        let mut after = before.clone();
        after.signed_at = Some("2024-03-01".to_string());
        assert_ne!(row_key(&before), row_key(&after));
    }
}
