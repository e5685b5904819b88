//! Reactive Hooks
//!
//! Leptos bindings for `ListState` and `ModalLifecycle`. The state lives in
//! signals owned by the calling component; async responses are applied with
//! `try_update`, so a response that lands after the component was torn down
//! is dropped instead of touching disposed state.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::error::ApiError;
use crate::list_controller::{execute, FetchOutcome, ListSource, ListState, Settled};
use crate::modal::{ModalLifecycle, ModalResolution};
use crate::notify::Notifier;
use crate::paging::{FilterValue, Filters};
use crate::refresh::RefreshSignal;

// ========================
// List
// ========================

pub struct ListHandle<T: 'static> {
    pub state: RwSignal<ListState<T>>,
    /// Bumped by mutations elsewhere on the page
    pub refresh: RwSignal<RefreshSignal>,
    /// Bumped when page, query or filters change
    epoch: RwSignal<u64>,
}

impl<T: 'static> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for ListHandle<T> {}

/// Keep a list in sync with `source`: fetch on mount, then again whenever
/// page, query, filters or the refresh signal change.
pub fn use_list_controller<T, S>(source: S, state: ListState<T>, notifier: Notifier) -> ListHandle<T>
where
    T: Clone + Send + Sync + 'static,
    S: ListSource<T> + Clone + 'static,
{
    let handle = ListHandle::new(state);
    let ListHandle { state, refresh, epoch } = handle;

    Effect::new(move |_| {
        epoch.track();
        let generation = refresh.with(|r| r.generation());
        let Some(plan) = state.try_update(|s| s.begin()) else {
            return;
        };
        log::debug!("[ListController] fetch #{} (refresh generation {})", plan.seq, generation);
        let source = source.clone();
        spawn_local(async move {
            let outcome = execute(&source, &plan).await;
            match handle.settle(plan.seq, outcome) {
                None => log::debug!("[ListController] list gone, dropping response #{}", plan.seq),
                Some(Settled::Stale(err)) => notifier.api_error(&err),
                Some(Settled::Fresh { fell_back: true }) => {
                    notifier.info("Search is unavailable, showing all records")
                }
                Some(_) => {}
            }
        });
    });

    handle
}

impl<T: Clone + Send + Sync + 'static> ListHandle<T> {
    /// Signals only; `use_list_controller` adds the fetch effect
    pub fn new(state: ListState<T>) -> Self {
        Self {
            state: RwSignal::new(state),
            refresh: RwSignal::new(RefreshSignal::default()),
            epoch: RwSignal::new(0),
        }
    }

    /// Apply a response. `None` once the owning page is gone.
    pub fn settle(&self, seq: u64, outcome: FetchOutcome<T>) -> Option<Settled> {
        self.state.try_update(|s| s.complete(seq, outcome))
    }

    pub fn items(&self) -> Vec<T> {
        self.state.with(|s| s.items().to_vec())
    }

    pub fn page(&self) -> u32 {
        self.state.with(|s| s.page())
    }

    pub fn total_pages(&self) -> u32 {
        self.state.with(|s| s.total_pages())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading())
    }

    pub fn set_page(&self, n: u32) {
        if self.state.try_update(|s| s.set_page(n)).unwrap_or(false) {
            self.bump();
        }
    }

    pub fn set_query(&self, raw: &str) {
        if self.state.try_update(|s| s.set_query(raw)).unwrap_or(false) {
            self.bump();
        }
    }

    pub fn set_filter(&self, key: &str, value: Option<FilterValue>) {
        if self.state.try_update(|s| s.set_filter(key, value)).unwrap_or(false) {
            self.bump();
        }
    }

    pub fn trigger_refresh(&self) {
        self.refresh.try_update(|r| r.trigger());
    }

    fn bump(&self) {
        self.epoch.try_update(|e| *e = e.wrapping_add(1));
    }
}

/// Initial state for a list page
pub fn list_state<T>(limit: u32, search_min_length: usize, filters: Filters) -> ListState<T> {
    let mut state = ListState::new(limit, search_min_length);
    for (key, value) in filters {
        state.set_filter(&key, Some(value));
    }
    state
}

// ========================
// Modal
// ========================

pub struct ModalHandle<D: 'static> {
    pub state: RwSignal<ModalLifecycle<D>>,
    refresh: RwSignal<RefreshSignal>,
}

impl<D: 'static> Clone for ModalHandle<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: 'static> Copy for ModalHandle<D> {}

/// Modal whose successful submit bumps `refresh`
pub fn use_modal<D>(refresh: RwSignal<RefreshSignal>) -> ModalHandle<D>
where
    D: Default + Send + Sync + 'static,
{
    ModalHandle {
        state: RwSignal::new(ModalLifecycle::new()),
        refresh,
    }
}

impl<D: Clone + Default + Send + Sync + 'static> ModalHandle<D> {
    pub fn is_open(&self) -> bool {
        self.state.with(|m| m.is_open())
    }

    pub fn draft(&self) -> D {
        self.state.with(|m| m.draft().clone())
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|m| m.error().map(str::to_string))
    }

    pub fn open(&self) {
        self.state.update(|m| m.open());
    }

    pub fn open_with(&self, draft: D) {
        self.state.update(|m| m.open_with(draft));
    }

    pub fn edit(&self, f: impl FnOnce(&mut D)) {
        self.state.update(|m| f(m.draft_mut()));
    }

    pub fn cancel(&self) {
        self.state.try_update(|m| m.cancel());
    }

    /// Apply a submit result; see `ModalLifecycle::settle`
    pub fn settle<T>(&self, result: &Result<T, ApiError>) -> ModalResolution {
        let Some(mut signal) = self.refresh.try_get_untracked() else {
            return ModalResolution::Failed;
        };
        let resolution = self
            .state
            .try_update(|m| m.settle(result, &mut signal))
            .unwrap_or(ModalResolution::Failed);
        if resolution == ModalResolution::Succeeded {
            self.refresh.try_set(signal);
        }
        resolution
    }

    /// `on_cancel` for dialog components; success goes through `settle`
    pub fn on_cancel(&self) -> Callback<()> {
        let this = *self;
        Callback::new(move |_| this.cancel())
    }
}
