//! Leptos Blob Utilities
//!
//! Object URLs for binary payloads fetched from a backend: creation,
//! explicit release, and the synthetic anchor click used for file saves.
//! A `BlobHandle` owns exactly one object URL and revokes it when dropped.

use std::fmt;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Host operations behind object URLs.
///
/// The browser implementation is [`BrowserBlobHost`]; tests provide their own.
pub trait BlobHost {
    /// Wrap `bytes` in a blob of type `mime` and return its object URL
    fn create_object_url(&self, bytes: &[u8], mime: &str) -> Result<String, String>;
    /// Release an object URL created by `create_object_url`
    fn revoke_object_url(&self, url: &str);
    /// Save the blob behind `url` as `file_name` via a synthetic anchor click
    fn click_download(&self, url: &str, file_name: &str) -> Result<(), String>;
}

// ========================
// BlobHandle
// ========================

/// An object URL plus the bytes it was created from.
///
/// Dropping the handle revokes the URL.
pub struct BlobHandle {
    object_url: String,
    source: Vec<u8>,
    content_type: String,
    revoke: Rc<dyn Fn(&str)>,
}

impl BlobHandle {
    pub fn new<H>(host: &H, source: Vec<u8>, content_type: &str) -> Result<Self, String>
    where
        H: BlobHost + Clone + 'static,
    {
        let object_url = host.create_object_url(&source, content_type)?;
        let host = host.clone();
        Ok(Self {
            object_url,
            source,
            content_type: content_type.to_string(),
            revoke: Rc::new(move |url| host.revoke_object_url(url)),
        })
    }

    pub fn object_url(&self) -> &str {
        &self.object_url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.source
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        (self.revoke)(&self.object_url);
    }
}

impl fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobHandle")
            .field("object_url", &self.object_url)
            .field("content_type", &self.content_type)
            .field("len", &self.source.len())
            .finish()
    }
}

// ========================
// Browser host
// ========================

/// `Blob` / `URL.createObjectURL` / `<a download>` in the current window
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserBlobHost;

impl BlobHost for BrowserBlobHost {
    fn create_object_url(&self, bytes: &[u8], mime: &str) -> Result<String, String> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| format!("Blob creation failed: {:?}", e))?;
        web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|e| format!("createObjectURL failed: {:?}", e))
    }

    fn revoke_object_url(&self, url: &str) {
        if let Err(e) = web_sys::Url::revoke_object_url(url) {
            log::warn!("[Blob] revokeObjectURL failed for {}: {:?}", url, e);
        }
    }

    fn click_download(&self, url: &str, file_name: &str) -> Result<(), String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| "No document available".to_string())?;
        let body = document.body().ok_or_else(|| "No document body".to_string())?;

        let anchor = document
            .create_element("a")
            .map_err(|e| format!("{:?}", e))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "Element is not an anchor".to_string())?;
        anchor.set_href(url);
        anchor.set_download(file_name);

        body.append_child(&anchor).map_err(|e| format!("{:?}", e))?;
        anchor.click();
        let _ = body.remove_child(&anchor);
        Ok(())
    }
}

// ========================
// Leptos slot
// ========================

/// Component-owned storage for at most one `BlobHandle`.
///
/// Replacing or releasing the handle revokes the previous URL, and the slot
/// releases itself when the owning component is torn down.
#[derive(Clone, Copy)]
pub struct BlobSlot {
    handle: StoredValue<Option<BlobHandle>, LocalStorage>,
    url: RwSignal<Option<String>>,
}

impl BlobSlot {
    /// Store `handle`, dropping (and revoking) whatever was there.
    /// Returns false if the owner is gone; the handle is revoked then too.
    pub fn put(&self, handle: BlobHandle) -> bool {
        let url = handle.object_url().to_string();
        if self.handle.try_update_value(|slot| *slot = Some(handle)).is_none() {
            return false;
        }
        self.url.try_set(Some(url));
        true
    }

    /// Drop the current handle, if any
    pub fn release(&self) {
        self.url.try_set(None);
        self.handle.try_update_value(|slot| {
            slot.take();
        });
    }

    /// Current object URL (reactive)
    pub fn url(&self) -> Option<String> {
        self.url.get()
    }
}

/// Create a `BlobSlot` tied to the current component's lifetime
pub fn use_blob_slot() -> BlobSlot {
    let slot = BlobSlot {
        handle: StoredValue::new_local(None),
        url: RwSignal::new(None),
    };
    on_cleanup(move || slot.release());
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Clone, Default)]
    struct FakeHost {
        live: Rc<RefCell<Vec<String>>>,
        created: Rc<RefCell<u32>>,
    }

    impl BlobHost for FakeHost {
        fn create_object_url(&self, _bytes: &[u8], _mime: &str) -> Result<String, String> {
            let mut n = self.created.borrow_mut();
            *n += 1;
            let url = format!("blob:fake/{}", n);
            self.live.borrow_mut().push(url.clone());
            Ok(url)
        }

        fn revoke_object_url(&self, url: &str) {
            self.live.borrow_mut().retain(|u| u != url);
        }

        fn click_download(&self, _url: &str, _file_name: &str) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_handle_revokes_on_drop() {
        let host = FakeHost::default();
        let handle = BlobHandle::new(&host, vec![1, 2, 3], "image/png").unwrap();
        assert_eq!(handle.object_url(), "blob:fake/1");
        assert_eq!(handle.bytes(), &[1, 2, 3]);
        assert_eq!(host.live.borrow().len(), 1);

        drop(handle);
        assert!(host.live.borrow().is_empty());
    }

    #[test]
    fn test_handles_are_independent() {
        let host = FakeHost::default();
        let a = BlobHandle::new(&host, vec![0], "application/pdf").unwrap();
        let b = BlobHandle::new(&host, vec![1], "application/pdf").unwrap();
        drop(a);
        assert_eq!(*host.live.borrow(), vec![b.object_url().to_string()]);
    }

    #[test]
    fn test_slot_releases_on_owner_cleanup() {
        let host = FakeHost::default();
        let owner = Owner::new();
        let slot = owner.with(|| {
            let slot = use_blob_slot();
            assert!(slot.put(BlobHandle::new(&host, vec![9], "image/png").unwrap()));
            slot
        });
        assert_eq!(host.live.borrow().len(), 1);

        owner.cleanup();
        assert!(host.live.borrow().is_empty());

        // A fetch landing after teardown is revoked, not stored
        let late = BlobHandle::new(&host, vec![8], "image/png").unwrap();
        assert!(!slot.put(late));
        assert!(host.live.borrow().is_empty());
    }

    #[test]
    fn test_slot_put_replaces_previous() {
        let host = FakeHost::default();
        let owner = Owner::new();
        owner.with(|| {
            let slot = use_blob_slot();
            slot.put(BlobHandle::new(&host, vec![1], "image/png").unwrap());
            slot.put(BlobHandle::new(&host, vec![2], "image/png").unwrap());
            assert_eq!(*host.live.borrow(), vec!["blob:fake/2".to_string()]);
            assert_eq!(slot.url.get_untracked().as_deref(), Some("blob:fake/2"));

            slot.release();
            assert!(host.live.borrow().is_empty());
            assert_eq!(slot.url.get_untracked(), None);
        });
    }
}
