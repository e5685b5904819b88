//! Blob Transfer
//!
//! Moves binary payloads (QR codes, PDFs, Word documents, face images)
//! between the backend and the browser: inline display, save-to-disk,
//! and multipart upload with a client-side MIME check.

use leptos_blob::{BlobHandle, BlobHost};
use serde_json::Value;

use crate::api::{FilePart, Transport};
use crate::error::ApiError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";

/// Multipart field name every upload endpoint expects
pub const UPLOAD_FIELD: &str = "file";

/// Backend acknowledgment of an upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub ack: Value,
}

pub struct BlobTransferGateway<C, H> {
    client: C,
    host: H,
}

impl<C, H> BlobTransferGateway<C, H>
where
    C: Transport,
    H: BlobHost + Clone + 'static,
{
    pub fn new(client: C, host: H) -> Self {
        Self { client, host }
    }

    /// Fetch `path` and expose it as an object URL for `<img>`.
    /// An empty body counts as missing.
    pub async fn fetch_display_blob(&self, path: &str) -> Result<BlobHandle, ApiError> {
        let body = self.client.get_bytes(path).await?;
        if body.bytes.is_empty() {
            return Err(ApiError::NotFound(path.to_string()));
        }
        BlobHandle::new(&self.host, body.bytes, &body.content_type).map_err(ApiError::Transport)
    }

    /// Fetch `path` and save it as `suggested_name`. The object URL is
    /// revoked right after the click.
    pub async fn download_as_file(&self, path: &str, suggested_name: &str) -> Result<(), ApiError> {
        let body = self.client.get_bytes(path).await?;
        let handle = BlobHandle::new(&self.host, body.bytes, &body.content_type)
            .map_err(ApiError::Transport)?;
        let clicked = self.host.click_download(handle.object_url(), suggested_name);
        drop(handle);
        log::info!("[Blob] downloaded {} as {}", path, suggested_name);
        clicked.map_err(ApiError::Transport)
    }

    /// Upload `file` to `path` if its type is in `allowed_mime_types`
    pub async fn upload_file(
        &self,
        path: &str,
        file: &FilePart,
        allowed_mime_types: &[&str],
    ) -> Result<UploadResult, ApiError> {
        check_mime(file, allowed_mime_types)?;
        let ack = self.client.post_multipart(path, UPLOAD_FIELD, file).await?;
        log::info!("[Blob] uploaded {} to {}", file.name, path);
        Ok(UploadResult { ack })
    }
}

/// Client-side type check. The backend validates again.
pub fn check_mime(file: &FilePart, allowed: &[&str]) -> Result<(), ApiError> {
    if allowed.is_empty() {
        return Ok(());
    }
    let mime = effective_mime(file);
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(&mime)) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "{} is not an accepted file type ({})",
            file.name,
            allowed.iter().map(|a| describe_mime(a)).collect::<Vec<_>>().join(", ")
        )))
    }
}

/// Browser-reported type without parameters, or a guess from the extension
fn effective_mime(file: &FilePart) -> String {
    let reported = file.mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    if !reported.is_empty() {
        return reported;
    }
    let ext = file
        .name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MIME,
        "docx" => DOCX_MIME,
        "doc" => DOC_MIME,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn describe_mime(mime: &str) -> &str {
    match mime {
        PDF_MIME => "PDF",
        DOCX_MIME => "DOCX",
        DOC_MIME => "DOC",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resource::tests::FakeTransport;
    use crate::api::BinaryBody;
    use crate::modal::{ModalLifecycle, ModalResolution};
    use crate::refresh::RefreshSignal;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeHost {
        live: Rc<RefCell<Vec<String>>>,
        created: Rc<RefCell<u32>>,
        clicks: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl BlobHost for FakeHost {
        fn create_object_url(&self, _bytes: &[u8], _mime: &str) -> Result<String, String> {
            let mut n = self.created.borrow_mut();
            *n += 1;
            let url = format!("blob:test/{}", n);
            self.live.borrow_mut().push(url.clone());
            Ok(url)
        }

        fn revoke_object_url(&self, url: &str) {
            self.live.borrow_mut().retain(|u| u != url);
        }

        fn click_download(&self, url: &str, file_name: &str) -> Result<(), String> {
            self.clicks.borrow_mut().push((url.to_string(), file_name.to_string()));
            Ok(())
        }
    }

    fn png() -> BinaryBody {
        BinaryBody { bytes: vec![0x89, b'P', b'N', b'G'], content_type: "image/png".into() }
    }

    fn gateway() -> (BlobTransferGateway<FakeTransport, FakeHost>, FakeTransport, FakeHost) {
        let transport = FakeTransport::default();
        let host = FakeHost::default();
        (BlobTransferGateway::new(transport.clone(), host.clone()), transport, host)
    }

    #[test]
    fn test_display_blob_lives_until_dropped() {
        let (gateway, transport, host) = gateway();
        transport.respond_bytes("qrcode/7", Ok(png()));

        let handle = block_on(gateway.fetch_display_blob("qrcode/7")).unwrap();
        assert_eq!(handle.content_type(), "image/png");
        assert_eq!(host.live.borrow().len(), 1);

        drop(handle);
        assert!(host.live.borrow().is_empty());
    }

    #[test]
    fn test_empty_display_blob_is_not_found() {
        let (gateway, transport, host) = gateway();
        transport.respond_bytes("faceimage/3", Ok(BinaryBody { bytes: vec![], content_type: "image/jpeg".into() }));

        let err = block_on(gateway.fetch_display_blob("faceimage/3")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(*host.created.borrow(), 0);
    }

    #[test]
    fn test_downloads_never_accumulate_urls() {
        let (gateway, transport, host) = gateway();
        transport.respond_bytes("download-pdf/1", Ok(png()));

        for _ in 0..5 {
            block_on(gateway.download_as_file("download-pdf/1", "contract-1.pdf")).unwrap();
            assert!(host.live.borrow().is_empty());
        }
        assert_eq!(*host.created.borrow(), 5);
        assert_eq!(host.clicks.borrow().len(), 5);
        assert_eq!(host.clicks.borrow()[0].1, "contract-1.pdf");
    }

    #[test]
    fn test_failed_download_allocates_nothing() {
        let (gateway, _transport, host) = gateway();
        let err = block_on(gateway.download_as_file("download-word/9", "x.docx")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(*host.created.borrow(), 0);
        assert!(host.clicks.borrow().is_empty());
    }

    #[test]
    fn test_qr_404_closes_modal_without_leak() {
        let (gateway, _transport, host) = gateway();
        let mut refresh = RefreshSignal::default();
        let mut modal = ModalLifecycle::<()>::new();
        modal.open();

        let result = block_on(gateway.fetch_display_blob("qrcode/404"));
        assert_eq!(modal.settle(&result, &mut refresh), ModalResolution::Failed);
        assert!(!modal.is_open());
        assert!(host.live.borrow().is_empty());
        assert_eq!(refresh, RefreshSignal::default());
    }

    #[test]
    fn test_wrong_type_rejected_before_network() {
        let (gateway, transport, _host) = gateway();
        let mut refresh = RefreshSignal::default();
        let mut modal = ModalLifecycle::<()>::new();
        modal.open();

        let file = FilePart::from_bytes("notes.txt", "text/plain", b"hello".to_vec());
        let result = block_on(gateway.upload_file("contract/upload/1", &file, &[PDF_MIME]));

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(transport.request_count(), 0);
        assert_eq!(modal.settle(&result, &mut refresh), ModalResolution::KeptOpen);
        assert!(modal.is_open());
        assert!(modal.error().unwrap_or_default().contains("PDF"));
    }

    #[test]
    fn test_upload_uses_file_field() {
        let (gateway, transport, _host) = gateway();
        transport.respond("contract/upload/1", Ok(json!({ "ok": true })));

        let file = FilePart::from_bytes("signed.PDF", "", b"%PDF-1.7".to_vec());
        let result = block_on(gateway.upload_file("contract/upload/1", &file, &[PDF_MIME])).unwrap();

        assert_eq!(result.ack, json!({ "ok": true }));
        assert_eq!(
            transport.uploads.borrow()[0],
            ("contract/upload/1".to_string(), "file".to_string(), "signed.PDF".to_string())
        );
    }

    #[test]
    fn test_upload_surfaces_backend_message() {
        let (gateway, transport, _host) = gateway();
        let err = ApiError::from_response(400, &json!({ "message": "Contract is already signed" }));
        transport.respond("contract/upload/2", Err(err));

        let file = FilePart::from_bytes("a.pdf", "application/pdf", vec![1]);
        let err = block_on(gateway.upload_file("contract/upload/2", &file, &[PDF_MIME])).unwrap_err();
        assert_eq!(err.user_message(), "Contract is already signed");
    }

    #[test]
    fn test_mime_parameters_ignored() {
        let file = FilePart::from_bytes("a.pdf", "Application/PDF; charset=binary", vec![]);
        assert!(check_mime(&file, &[PDF_MIME]).is_ok());
        assert!(check_mime(&file, &[]).is_ok());
    }
}
