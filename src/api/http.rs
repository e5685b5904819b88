//! HTTP Client
//!
//! `fetch`-based implementation of `Transport`. Attaches the bearer token,
//! maps status codes onto `ApiError`, and handles session expiry globally.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{BinaryBody, FileBody, FilePart, Method, Transport};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::session::{BrowserStorage, Session, SessionStore};

/// Unreserved characters stay literal in query strings
const QUERY: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// `base/path?k=v&...` with percent-encoded keys and values
pub fn build_url(base: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    if !query.is_empty() {
        let pairs: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", utf8_percent_encode(k, QUERY), utf8_percent_encode(v, QUERY)))
            .collect();
        url.push('?');
        url.push_str(&pairs.join("&"));
    }
    url
}

enum Body {
    Json(String),
    Form(web_sys::FormData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClient {
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &AppConfig, session: &Session) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            token: session.token.clone(),
        }
    }

    async fn send(&self, method: Method, url: &str, body: Option<Body>) -> Result<web_sys::Response, ApiError> {
        let init = web_sys::RequestInit::new();
        init.set_method(method.as_str());
        init.set_mode(web_sys::RequestMode::Cors);

        let headers = web_sys::Headers::new()?;
        if let Some(token) = &self.token {
            headers.set("Authorization", &format!("Bearer {}", token))?;
        }
        match body {
            Some(Body::Json(text)) => {
                headers.set("Content-Type", "application/json")?;
                init.set_body(&JsValue::from_str(&text));
            }
            // the browser sets the multipart boundary itself
            Some(Body::Form(form)) => init.set_body(&form),
            None => {}
        }
        init.set_headers(&headers);

        let request = web_sys::Request::new_with_str_and_init(url, &init)?;
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("No window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let response: web_sys::Response = value
            .dyn_into()
            .map_err(|_| ApiError::Transport("fetch did not return a Response".to_string()))?;

        log::debug!("[Http] {} {} -> {}", method.as_str(), url, response.status());
        match response.status() {
            200..=299 => Ok(response),
            401 => {
                expire_session();
                Err(ApiError::Unauthorized)
            }
            status => {
                let body = read_json(&response).await.unwrap_or(Value::Null);
                Err(ApiError::from_status(status, url, &body))
            }
        }
    }
}

impl Transport for HttpClient {
    async fn request_json(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = build_url(&self.base_url, path, query);
        let body = body.map(|b| Body::Json(b.to_string()));
        let response = self.send(method, &url, body).await?;
        read_json(&response).await
    }

    async fn get_bytes(&self, path: &str) -> Result<BinaryBody, ApiError> {
        let url = build_url(&self.base_url, path, &[]);
        let response = self.send(Method::Get, &url, None).await?;
        let content_type = header(&response, "content-type")
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let buffer = JsFuture::from(response.array_buffer()?).await?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        Ok(BinaryBody { bytes, content_type })
    }

    async fn post_multipart(&self, path: &str, field: &str, file: &FilePart) -> Result<Value, ApiError> {
        let form = web_sys::FormData::new()?;
        match &file.body {
            FileBody::Browser(blob) => form.append_with_blob_and_filename(field, blob, &file.name)?,
            FileBody::Bytes(bytes) => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(&file.mime);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&js_sys::Array::of1(&array), &options)?;
                form.append_with_blob_and_filename(field, &blob, &file.name)?;
            }
        }

        let url = build_url(&self.base_url, path, &[]);
        let response = self.send(Method::Post, &url, Some(Body::Form(form))).await?;
        read_json(&response).await
    }
}

fn header(response: &web_sys::Response, name: &str) -> Option<String> {
    response.headers().get(name).ok().flatten()
}

async fn read_json(response: &web_sys::Response) -> Result<Value, ApiError> {
    let is_json = header(response, "content-type").map_or(false, |ct| ct.contains("json"));
    if is_json && response.status() != 204 {
        let value = JsFuture::from(response.json()?).await?;
        return serde_wasm_bindgen::from_value(value).map_err(|e| ApiError::Decode(e.to_string()));
    }

    let text = JsFuture::from(response.text()?).await?.as_string().unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// 401: drop everything we know about the session and start over
fn expire_session() {
    log::warn!("[Http] session expired, clearing storage and reloading");
    SessionStore::open(BrowserStorage).clear_all();
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_and_encodes() {
        let query = vec![
            ("page".to_string(), "2".to_string()),
            ("keyword".to_string(), "Acme & Sons".to_string()),
        ];
        assert_eq!(
            build_url("/api/", "/contract/list", &query),
            "/api/contract/list?page=2&keyword=Acme%20%26%20Sons"
        );
        assert_eq!(build_url("/api", "qrcode/7", &[]), "/api/qrcode/7");
    }

    #[test]
    fn test_build_url_keeps_unreserved() {
        let query = vec![("date_from".to_string(), "2024-01-01".to_string())];
        assert_eq!(build_url("", "x", &query), "/x?date_from=2024-01-01");
    }
}
