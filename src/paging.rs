//! Paging Types
//!
//! Request and response shapes shared by every list and search endpoint.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Scalar filter value sent as a query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

pub type Filters = BTreeMap<String, FilterValue>;

/// One page request. Built fresh for every fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedQuery {
    pub page: u32,
    pub limit: u32,
    pub filters: Filters,
}

impl PagedQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            filters: Filters::new(),
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// `page`, `limit`, then filters in key order
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.to_string())));
        params
    }
}

/// Normalized list/search response
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Always >= 1, even for an empty result
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self { items, total_pages: total_pages.max(1) }
    }
}

impl<T: DeserializeOwned> PagedResult<T> {
    /// Accepts `{result, pages}` at the top level or nested under `data`
    pub fn from_envelope(mut body: Value) -> Result<Self, ApiError> {
        let nested = body
            .get("data")
            .map_or(false, |d| d.get("result").is_some() || d.get("pages").is_some());
        let envelope = if nested { body["data"].take() } else { body };

        let items = match envelope.get("result") {
            None | Some(Value::Null) => Vec::new(),
            Some(result) => serde_json::from_value(result.clone())?,
        };
        let total_pages = envelope.get("pages").and_then(parse_pages).unwrap_or(1);

        Ok(Self::new(items, total_pages))
    }
}

fn parse_pages(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.ceil() as u64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .map(|n| n.min(u32::MAX as u64) as u32)
}

/// Clamp a requested page into `[1, total_pages]`
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Page numbers to show around `current`, at most `span` of them
pub fn page_window(current: u32, total_pages: u32, span: u32) -> Vec<u32> {
    let total = total_pages.max(1);
    let span = span.clamp(1, total);
    let current = clamp_page(current, total);

    let mut start = current.saturating_sub(span / 2).max(1);
    if start + span - 1 > total {
        start = total - span + 1;
    }
    (start..start + span).collect()
}
