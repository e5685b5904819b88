//! Modal Lifecycle
//!
//! Open/close state for a dialog and its draft. Closing always resets the
//! draft; only a successful submit triggers a refresh. Cancel never does.

use crate::error::ApiError;
use crate::refresh::RefreshSignal;

/// What `settle` did with the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalResolution {
    /// Submit succeeded: closed and refresh triggered
    Succeeded,
    /// Request failed: closed without refresh, caller shows a toast
    Failed,
    /// Client-side validation failed: still open, nothing was sent
    KeptOpen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalLifecycle<D> {
    open: bool,
    draft: D,
    error: Option<String>,
}

impl<D: Default> Default for ModalLifecycle<D> {
    fn default() -> Self {
        Self {
            open: false,
            draft: D::default(),
            error: None,
        }
    }
}

impl<D: Default> ModalLifecycle<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    /// Inline validation message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Open with an empty draft
    pub fn open(&mut self) {
        self.open_with(D::default());
    }

    /// Open pre-filled (edit dialogs)
    pub fn open_with(&mut self, draft: D) {
        self.draft = draft;
        self.error = None;
        self.open = true;
    }

    /// User dismissed the dialog. Never touches the refresh signal.
    pub fn cancel(&mut self) {
        self.close_and_reset();
    }

    /// Mutation went through: close and ask the list to refetch
    pub fn succeed(&mut self, refresh: &mut RefreshSignal) {
        self.close_and_reset();
        refresh.trigger();
    }

    /// Keep the dialog open and show `message`
    pub fn reject(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Route the result of a submit through the close/refresh policy
    pub fn settle<T>(&mut self, result: &Result<T, ApiError>, refresh: &mut RefreshSignal) -> ModalResolution {
        match result {
            Ok(_) => {
                self.succeed(refresh);
                ModalResolution::Succeeded
            }
            Err(err) if err.is_validation() => {
                self.reject(err.to_string());
                ModalResolution::KeptOpen
            }
            Err(_) => {
                self.cancel();
                ModalResolution::Failed
            }
        }
    }

    fn close_and_reset(&mut self) {
        self.open = false;
        self.draft = D::default();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Draft {
        name: String,
    }

    fn opened() -> ModalLifecycle<Draft> {
        let mut modal = ModalLifecycle::new();
        modal.open_with(Draft { name: "Acme".into() });
        modal
    }

    #[test]
    fn test_cancel_resets_draft() {
        let mut modal = opened();
        modal.reject("bad");
        modal.cancel();
        assert!(!modal.is_open());
        assert_eq!(modal.draft(), &Draft::default());
        assert_eq!(modal.error(), None);
    }

    #[test]
    fn test_success_always_refreshes() {
        let mut refresh = RefreshSignal::default();
        for _ in 0..3 {
            let before = refresh;
            let mut modal = opened();
            let res = modal.settle(&Ok::<_, ApiError>(()), &mut refresh);
            assert_eq!(res, ModalResolution::Succeeded);
            assert!(!modal.is_open());
            assert_ne!(refresh, before);
        }
    }

    #[test]
    fn test_failure_closes_without_refresh() {
        let mut refresh = RefreshSignal::default();
        let mut modal = opened();
        let res = modal.settle(&Err::<(), _>(ApiError::NotFound("/qrcode/7".into())), &mut refresh);
        assert_eq!(res, ModalResolution::Failed);
        assert!(!modal.is_open());
        assert_eq!(modal.draft(), &Draft::default());
        assert_eq!(refresh, RefreshSignal::default());
    }

    #[test]
    fn test_validation_keeps_open() {
        let mut refresh = RefreshSignal::default();
        let mut modal = opened();
        let res = modal.settle(&Err::<(), _>(ApiError::Validation("Only PDF files".into())), &mut refresh);
        assert_eq!(res, ModalResolution::KeptOpen);
        assert!(modal.is_open());
        assert_eq!(modal.error(), Some("Only PDF files"));
        assert_eq!(modal.draft().name, "Acme");
        assert_eq!(refresh, RefreshSignal::default());
    }

    #[test]
    fn test_reopen_clears_error() {
        let mut modal = opened();
        modal.reject("bad");
        modal.cancel();
        modal.open();
        assert_eq!(modal.error(), None);
    }
}
