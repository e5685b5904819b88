//! Preview Modal Component
//!
//! Shows a QR code or face image fetched as a blob. The object URL lives in
//! a `BlobSlot` and is revoked when the dialog closes or the page unmounts.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_blob::{BlobHost, BlobSlot};

use crate::api::Transport;
use crate::blob::BlobTransferGateway;
use crate::components::Modal;
use crate::error::ApiError;
use crate::hooks::ModalHandle;
use crate::notify::Notifier;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewTarget {
    pub title: String,
    pub path: String,
}

/// Open the dialog and load `path` into `slot`. A failed fetch closes it again.
pub fn open_preview<C, H>(
    preview: ModalHandle<PreviewTarget>,
    slot: BlobSlot,
    gateway: BlobTransferGateway<C, H>,
    target: PreviewTarget,
    notifier: Notifier,
) where
    C: Transport + 'static,
    H: BlobHost + Clone + 'static,
{
    slot.release();
    let path = target.path.clone();
    preview.open_with(target);

    spawn_local(async move {
        let result = gateway.fetch_display_blob(&path).await;
        let still_wanted = preview
            .state
            .try_with_untracked(|m| m.is_open() && m.draft().path == path)
            .unwrap_or(false);
        match result {
            Ok(handle) if still_wanted => {
                slot.put(handle);
            }
            Ok(_) => log::debug!("[Preview] {} arrived after close, released", path),
            Err(err) if still_wanted => {
                preview.settle(&Err::<(), ApiError>(err.clone()));
                notifier.api_error(&err);
            }
            Err(err) => log::debug!("[Preview] {} failed after close: {}", path, err),
        }
    });
}

#[component]
pub fn PreviewModal(preview: ModalHandle<PreviewTarget>, slot: BlobSlot) -> impl IntoView {
    let on_cancel = Callback::new(move |_| {
        slot.release();
        preview.cancel();
    });
    let title = Signal::derive(move || preview.state.with(|m| m.draft().title.clone()));

    view! {
        <Modal title=title open=Signal::derive(move || preview.is_open()) on_cancel=on_cancel>
            {move || match slot.url() {
                Some(url) => view! { <img class="preview-image" src=url /> }.into_any(),
                None => view! { <p class="loading">"Loading..."</p> }.into_any(),
            }}
        </Modal>
    }
}
