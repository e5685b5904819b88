//! Record Form Component
//!
//! Create/edit dialog generated from a record type's form fields.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{HttpClient, RestResource};
use crate::components::Modal;
use crate::hooks::ModalHandle;
use crate::modal::ModalResolution;
use crate::models::{FieldKind, Record, RecordDraft};
use crate::notify::Notifier;

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Date => "date",
        // Free text so "99,5" survives until validation
        FieldKind::Text | FieldKind::Number => "text",
    }
}

/// Dialog bound to `form`; a new draft creates, a draft with an id updates
#[component]
pub fn RecordFormModal<R: Record>(
    form: ModalHandle<RecordDraft>,
    resource: StoredValue<RestResource<R, HttpClient>>,
    notifier: Notifier,
) -> impl IntoView {
    let on_cancel = form.on_cancel();
    let (saving, set_saving) = signal(false);

    let title = Signal::derive(move || {
        let editing = form.state.with(|m| m.draft().id.is_some());
        format!("{} {}", if editing { "Edit" } else { "New" }, R::RESOURCE.label)
    });

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let draft = form.state.with_untracked(|m| m.draft().clone());
        let body = match draft.validate(R::FIELDS) {
            Ok(body) => body,
            Err(err) => {
                form.settle(&Err::<(), _>(err));
                return;
            }
        };

        set_saving.set(true);
        let resource = resource.get_value();
        spawn_local(async move {
            let result = match draft.id {
                Some(id) => resource.update(id, &body).await,
                None => resource.create(&body).await,
            };
            set_saving.try_set(false);
            match (form.settle(&result), &result) {
                (ModalResolution::Succeeded, _) => notifier.success(format!("{} saved", R::RESOURCE.label)),
                (ModalResolution::Failed, Err(err)) => notifier.api_error(err),
                _ => {}
            }
        });
    };

    view! {
        <Modal title=title open=Signal::derive(move || form.is_open()) on_cancel=on_cancel>
            <form class="record-form" on:submit=submit>
                {R::FIELDS
                    .iter()
                    .map(|f| {
                        let key = f.key;
                        view! {
                            <label class="form-field">
                                <span>{f.label} {f.required.then_some(" *")}</span>
                                <input
                                    type=input_type(f.kind)
                                    prop:value=move || form.state.with(|m| m.draft().get(key).to_string())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        form.edit(|d| d.set(key, value));
                                    }
                                />
                            </label>
                        }
                    })
                    .collect_view()}
                <Show when=move || form.error().is_some()>
                    <p class="form-error">{move || form.error().unwrap_or_default()}</p>
                </Show>
                <div class="form-actions">
                    <button type="button" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        "Save"
                    </button>
                </div>
            </form>
        </Modal>
    }
}
