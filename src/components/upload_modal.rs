//! Upload Modal Component
//!
//! File picker for an upload attachment (signed PDF, Word document).

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{Attachment, FilePart, Resource};
use crate::components::Modal;
use crate::context::AppContext;
use crate::error::ApiError;
use crate::hooks::ModalHandle;
use crate::modal::ModalResolution;
use crate::notify::Notifier;

/// Record and attachment the dialog uploads to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadTarget {
    pub id: u64,
    pub attachment: Option<Attachment>,
}

#[component]
pub fn UploadModal(
    upload: ModalHandle<UploadTarget>,
    resource: Resource,
    services: StoredValue<AppContext>,
    notifier: Notifier,
) -> impl IntoView {
    let picked = StoredValue::new_local(None::<FilePart>);
    let (uploading, set_uploading) = signal(false);

    let on_cancel = Callback::new(move |_| {
        picked.set_value(None);
        upload.cancel();
    });

    let title = Signal::derive(move || {
        upload
            .state
            .with(|m| m.draft().attachment.map(|a| format!("{} #{}", a.label(), m.draft().id)))
            .unwrap_or_default()
    });

    let accept = move || {
        upload.state.with(|m| {
            m.draft()
                .attachment
                .map(|a| a.accepted_mime_types().join(","))
                .unwrap_or_default()
        })
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if uploading.get_untracked() {
            return;
        }
        let target = upload.state.with_untracked(|m| m.draft().clone());
        let Some(attachment) = target.attachment else {
            return;
        };
        let Some(file) = picked.get_value() else {
            upload.settle(&Err::<(), _>(ApiError::Validation("Choose a file first".to_string())));
            return;
        };

        set_uploading.set(true);
        let gateway = services.with_value(|c| c.blob_gateway());
        spawn_local(async move {
            let path = attachment.path(&resource, target.id);
            let result = gateway
                .upload_file(&path, &file, attachment.accepted_mime_types())
                .await;
            set_uploading.try_set(false);
            match (upload.settle(&result), &result) {
                (ModalResolution::KeptOpen, _) => return,
                (ModalResolution::Succeeded, _) => notifier.success(format!("{} uploaded", file.name)),
                (ModalResolution::Failed, Err(err)) => notifier.api_error(err),
                _ => {}
            }
            picked.try_update_value(|p| *p = None);
        });
    };

    view! {
        <Modal title=title open=Signal::derive(move || upload.is_open()) on_cancel=on_cancel>
            <form class="upload-form" on:submit=submit>
                <input
                    type="file"
                    accept=accept
                    on:change=move |ev| {
                        let input = event_target::<web_sys::HtmlInputElement>(&ev);
                        let file = input.files().and_then(|list| list.get(0)).map(FilePart::from_browser);
                        picked.set_value(file);
                    }
                />
                <Show when=move || upload.error().is_some()>
                    <p class="form-error">{move || upload.error().unwrap_or_default()}</p>
                </Show>
                <div class="form-actions">
                    <button type="button" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button type="submit" class="primary-btn" disabled=move || uploading.get()>
                        "Upload"
                    </button>
                </div>
            </form>
        </Modal>
    }
}
