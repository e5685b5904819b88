//! Notifications
//!
//! Toast messages kept in the app store. Each toast dismisses itself
//! after `AppConfig::toast_duration_ms`.

use std::sync::atomic::{AtomicU64, Ordering};

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::error::ApiError;
use crate::store::{AppStateStoreFields, AppStore};

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
            Self::Info => "toast toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            text: text.into(),
        }
    }
}

/// Append `toast`; identical text already on screen is not repeated
fn push(toasts: &mut Vec<Toast>, toast: Toast) -> Option<u64> {
    if toasts.iter().any(|t| t.kind == toast.kind && t.text == toast.text) {
        return None;
    }
    let id = toast.id;
    toasts.push(toast);
    Some(id)
}

fn dismiss(toasts: &mut Vec<Toast>, id: u64) {
    toasts.retain(|t| t.id != id);
}

/// Handle for raising toasts from components and async tasks
#[derive(Clone, Copy)]
pub struct Notifier {
    store: AppStore,
    duration_ms: u32,
}

impl Notifier {
    pub fn new(store: AppStore, duration_ms: u32) -> Self {
        Self { store, duration_ms }
    }

    pub fn notify(&self, kind: ToastKind, text: impl Into<String>) {
        let toast = Toast::new(kind, text);
        log::debug!("[Notify] {:?}: {}", toast.kind, toast.text);
        let Some(id) = push(&mut self.store.toasts().write(), toast) else {
            return;
        };
        if self.duration_ms == 0 {
            return;
        }
        let notifier = *self;
        spawn_local(async move {
            TimeoutFuture::new(notifier.duration_ms).await;
            notifier.dismiss(id);
        });
    }

    pub fn success(&self, text: impl Into<String>) {
        self.notify(ToastKind::Success, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.notify(ToastKind::Info, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.notify(ToastKind::Error, text);
    }

    /// Error toast for a failed request. A 401 reloads the page, so it stays silent.
    pub fn api_error(&self, err: &ApiError) {
        if *err == ApiError::Unauthorized {
            return;
        }
        self.error(err.user_message());
    }

    pub fn dismiss(&self, id: u64) {
        dismiss(&mut self.store.toasts().write(), id);
    }
}

/// Get the notifier from context
pub fn use_notifier() -> Notifier {
    expect_context::<Notifier>()
}
