//! Resource Endpoints
//!
//! Endpoint layout of one record type and the `ListSource` / CRUD
//! bindings built on top of any `Transport`.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{Method, Transport};
use crate::error::ApiError;
use crate::list_controller::ListSource;
use crate::paging::{PagedQuery, PagedResult};

/// Endpoint layout for one record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Path prefix, e.g. `contract`
    pub base: &'static str,
    /// Human-readable name for tabs and toasts
    pub label: &'static str,
    /// List requests carry the session's selected year as `year`
    pub year_scoped: bool,
}

impl Resource {
    pub fn list_path(&self) -> String {
        format!("{}/list", self.base)
    }

    pub fn search_path(&self) -> String {
        format!("{}/search", self.base)
    }

    pub fn create_path(&self) -> String {
        self.base.to_string()
    }

    pub fn item_path(&self, id: u64) -> String {
        format!("{}/{}", self.base, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Shown inline in a modal
    Preview,
    /// Saved to disk
    Download,
    /// Picked from disk and sent to the backend
    Upload,
}

/// Binary payloads a record row can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    QrCode,
    Pdf,
    Word,
    FaceImage,
    PdfUpload,
    WordUpload,
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Self::QrCode | Self::FaceImage => AttachmentKind::Preview,
            Self::Pdf | Self::Word => AttachmentKind::Download,
            Self::PdfUpload | Self::WordUpload => AttachmentKind::Upload,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::QrCode => "QR",
            Self::Pdf => "PDF",
            Self::Word => "Word",
            Self::FaceImage => "Photo",
            Self::PdfUpload => "Upload PDF",
            Self::WordUpload => "Upload Word",
        }
    }

    pub fn path(&self, resource: &Resource, id: u64) -> String {
        match self {
            Self::QrCode => format!("qrcode/{}", id),
            Self::Pdf => format!("download-pdf/{}", id),
            Self::Word => format!("download-word/{}", id),
            Self::FaceImage => format!("faceimage/{}", id),
            Self::PdfUpload => format!("{}/upload/{}", resource.base, id),
            Self::WordUpload => format!("{}/upload-word/{}", resource.base, id),
        }
    }

    /// Suggested file name for downloads
    pub fn file_name(&self, resource: &Resource, id: u64) -> String {
        let ext = match self {
            Self::Pdf => "pdf",
            Self::Word => "docx",
            _ => "png",
        };
        format!("{}-{}.{}", resource.base, id, ext)
    }

    /// MIME types accepted by upload endpoints (empty for the rest)
    pub fn accepted_mime_types(&self) -> &'static [&'static str] {
        match self {
            Self::PdfUpload => &[crate::blob::PDF_MIME],
            Self::WordUpload => &[crate::blob::DOCX_MIME, crate::blob::DOC_MIME],
            _ => &[],
        }
    }
}

// ========================
// RestResource
// ========================

/// `ListSource` and CRUD calls for records of type `R`
pub struct RestResource<R, C> {
    client: C,
    resource: Resource,
    _record: PhantomData<fn() -> R>,
}

impl<R, C: Clone> Clone for RestResource<R, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            resource: self.resource,
            _record: PhantomData,
        }
    }
}

impl<R, C: Transport> RestResource<R, C> {
    pub fn new(client: C, resource: Resource) -> Self {
        Self { client, resource, _record: PhantomData }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn create(&self, body: &Value) -> Result<Value, ApiError> {
        self.client
            .request_json(Method::Post, &self.resource.create_path(), &[], Some(body))
            .await
    }

    pub async fn update(&self, id: u64, body: &Value) -> Result<Value, ApiError> {
        self.client
            .request_json(Method::Put, &self.resource.item_path(id), &[], Some(body))
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<Value, ApiError> {
        self.client
            .request_json(Method::Delete, &self.resource.item_path(id), &[], None)
            .await
    }
}

impl<R: DeserializeOwned, C: Transport> ListSource<R> for RestResource<R, C> {
    async fn fetch_page(&self, query: &PagedQuery) -> Result<PagedResult<R>, ApiError> {
        let body = self
            .client
            .request_json(Method::Get, &self.resource.list_path(), &query.to_params(), None)
            .await?;
        PagedResult::from_envelope(body)
    }

    async fn search(&self, keyword: &str, query: &PagedQuery) -> Result<PagedResult<R>, ApiError> {
        let body = self
            .client
            .request_json(
                Method::Post,
                &self.resource.search_path(),
                &query.to_params(),
                Some(&json!({ "keyword": keyword })),
            )
            .await?;
        PagedResult::from_envelope(body)
    }
}
