//! Backend API
//!
//! REST bindings for the dashboard backend, organized by concern.
//! `Transport` is the seam the rest of the app talks to; `HttpClient`
//! implements it with the browser's `fetch`.

mod http;
pub(crate) mod resource;

use serde_json::Value;

use crate::error::ApiError;

pub use http::{build_url, HttpClient};
pub use resource::{Attachment, AttachmentKind, Resource, RestResource};

// ========================
// Types
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Raw response body of a binary endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Where the bytes of an upload live
#[derive(Debug, Clone)]
pub enum FileBody {
    /// Picked through an `<input type="file">`
    Browser(web_sys::File),
    Bytes(Vec<u8>),
}

/// A file about to be uploaded as a multipart field
#[derive(Debug, Clone)]
pub struct FilePart {
    pub name: String,
    /// MIME type reported by the browser; may be empty
    pub mime: String,
    pub body: FileBody,
}

impl FilePart {
    pub fn from_browser(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            mime: file.type_(),
            body: FileBody::Browser(file),
        }
    }

    pub fn from_bytes(name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            body: FileBody::Bytes(bytes),
        }
    }
}

// ========================
// Transport
// ========================

/// Authenticated access to the backend
pub trait Transport {
    /// JSON request; an empty response body decodes to `Value::Null`
    async fn request_json(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError>;

    /// GET a binary payload
    async fn get_bytes(&self, path: &str) -> Result<BinaryBody, ApiError>;

    /// POST `file` as the multipart field `field`
    async fn post_multipart(&self, path: &str, field: &str, file: &FilePart) -> Result<Value, ApiError>;
}
