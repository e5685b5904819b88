//! List Controller
//!
//! Pagination, server-side search and refresh for one record list.
//!
//! `ListState` is the synchronous half: it decides *what* to fetch (`begin`)
//! and reconciles the answer (`complete`). `execute` runs a plan against a
//! `ListSource`. `ListController` glues the two for callers that own the
//! state directly; the Leptos hook in `hooks` keeps the state in a signal.

use crate::error::ApiError;
use crate::paging::{clamp_page, FilterValue, Filters, PagedQuery, PagedResult};
use crate::refresh::RefreshSignal;
use crate::search::{SearchIntent, SearchState};

/// Backend endpoints for one record type
pub trait ListSource<T> {
    async fn fetch_page(&self, query: &PagedQuery) -> Result<PagedResult<T>, ApiError>;
    async fn search(&self, keyword: &str, query: &PagedQuery) -> Result<PagedResult<T>, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Loaded,
}

/// How overlapping responses are reconciled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseOrdering {
    /// Whatever resolves last is shown, even if it was issued first
    #[default]
    LastWriteWins,
    /// Responses older than the latest issued request are dropped
    LatestIssued,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMode {
    List,
    Search(String),
}

/// One request about to be issued
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub seq: u64,
    pub mode: FetchMode,
    pub query: PagedQuery,
}

#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub result: Result<PagedResult<T>, ApiError>,
    /// The search failed and the plain list was fetched instead
    pub fell_back: bool,
}

/// How a fetch ended, from the caller's point of view
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    /// New rows are on screen
    Fresh { fell_back: bool },
    /// Request failed; previous rows are still shown
    Stale(ApiError),
    /// A newer request was issued; this response was dropped
    Discarded,
    /// Nothing was requested
    Skipped,
}

// ========================
// ListState
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    items: Vec<T>,
    page: u32,
    total_pages: u32,
    limit: u32,
    phase: ListPhase,
    search: SearchState,
    filters: Filters,
    ordering: ResponseOrdering,
    issued: u64,
    in_flight: u32,
}

impl<T> ListState<T> {
    pub fn new(limit: u32, search_min_length: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            limit: limit.max(1),
            phase: ListPhase::Idle,
            search: SearchState::new(search_min_length),
            filters: Filters::new(),
            ordering: ResponseOrdering::default(),
            issued: 0,
            in_flight: 0,
        }
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn mode(&self) -> FetchMode {
        match self.search.keyword() {
            Some(keyword) => FetchMode::Search(keyword.to_string()),
            None => FetchMode::List,
        }
    }

    /// Move to page `n`, clamped into `[1, total_pages]`. Returns true if a fetch is needed.
    pub fn set_page(&mut self, n: u32) -> bool {
        let target = clamp_page(n, self.total_pages);
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    /// Feed the search box text through the min-length gate.
    /// Returns true if a fetch is needed.
    pub fn set_query(&mut self, raw: &str) -> bool {
        let (intent, changed) = self.search.apply(raw);
        if changed {
            if let SearchIntent::Dispatch(_) = intent {
                self.page = 1;
            }
        }
        changed
    }

    /// Set or remove a filter. Returns true if a fetch is needed.
    pub fn set_filter(&mut self, key: &str, value: Option<FilterValue>) -> bool {
        let changed = match value {
            Some(value) => self.filters.insert(key.to_string(), value.clone()) != Some(value),
            None => self.filters.remove(key).is_some(),
        };
        if changed {
            self.page = 1;
        }
        changed
    }

    /// Start a fetch in the current mode
    pub fn begin(&mut self) -> FetchPlan {
        let mode = self.mode();
        self.begin_with(mode)
    }

    fn begin_with(&mut self, mode: FetchMode) -> FetchPlan {
        self.issued += 1;
        self.in_flight += 1;
        self.phase = ListPhase::Loading;
        FetchPlan {
            seq: self.issued,
            mode,
            query: PagedQuery::new(self.page, self.limit).with_filters(self.filters.clone()),
        }
    }

    /// Apply the answer to request `seq`
    pub fn complete(&mut self, seq: u64, outcome: FetchOutcome<T>) -> Settled {
        self.in_flight = self.in_flight.saturating_sub(1);
        let latest = seq == self.issued;
        if self.in_flight == 0 || (latest && self.ordering == ResponseOrdering::LatestIssued) {
            self.phase = ListPhase::Loaded;
        }

        if !latest && self.ordering == ResponseOrdering::LatestIssued {
            log::debug!("[ListController] dropping response #{} (latest is #{})", seq, self.issued);
            return Settled::Discarded;
        }

        match outcome.result {
            Ok(result) => {
                log::debug!(
                    "[ListController] #{} loaded {} rows (page {}/{})",
                    seq,
                    result.items.len(),
                    self.page,
                    result.total_pages
                );
                self.items = result.items;
                self.total_pages = result.total_pages;
                self.page = clamp_page(self.page, self.total_pages);
                Settled::Fresh { fell_back: outcome.fell_back }
            }
            Err(err) => {
                log::warn!("[ListController] #{} failed, keeping {} stale rows: {}", seq, self.items.len(), err);
                Settled::Stale(err)
            }
        }
    }
}

/// Run `plan` against `source`. A failed search degrades to the plain list.
pub async fn execute<T, S: ListSource<T>>(source: &S, plan: &FetchPlan) -> FetchOutcome<T> {
    match &plan.mode {
        FetchMode::List => FetchOutcome {
            result: source.fetch_page(&plan.query).await,
            fell_back: false,
        },
        FetchMode::Search(keyword) => match source.search(keyword, &plan.query).await {
            Ok(result) => FetchOutcome { result: Ok(result), fell_back: false },
            Err(ApiError::Unauthorized) => FetchOutcome {
                result: Err(ApiError::Unauthorized),
                fell_back: false,
            },
            Err(err) => {
                log::warn!("[ListController] search '{}' failed ({}), showing list instead", keyword, err);
                FetchOutcome {
                    result: source.fetch_page(&plan.query).await,
                    fell_back: true,
                }
            }
        },
    }
}

// ========================
// ListController
// ========================

/// `ListState` plus the source it reads from
pub struct ListController<T, S> {
    state: ListState<T>,
    source: S,
    refresh: RefreshSignal,
}

impl<T, S: ListSource<T>> ListController<T, S> {
    pub fn new(source: S, limit: u32, search_min_length: usize) -> Self {
        Self {
            state: ListState::new(limit, search_min_length),
            source,
            refresh: RefreshSignal::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.state = self.state.with_ordering(ordering);
        self
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn refresh_signal(&self) -> RefreshSignal {
        self.refresh
    }

    /// Fetch the current page in the current mode
    pub async fn load(&mut self) -> Settled {
        let plan = self.state.begin();
        self.run(plan).await
    }

    /// Fetch `page` from the list endpoint with `extra_filters` merged in
    pub async fn fetch_page(&mut self, page: u32, extra_filters: Filters) -> Settled {
        self.state.filters.extend(extra_filters);
        self.state.page = page.max(1);
        let plan = self.state.begin_with(FetchMode::List);
        self.run(plan).await
    }

    /// Search for `query` at `page`; too-short queries send nothing
    pub async fn search(&mut self, query: &str, page: u32) -> Settled {
        match self.state.search.apply(query).0 {
            SearchIntent::Hold => Settled::Skipped,
            SearchIntent::Clear | SearchIntent::Dispatch(_) => {
                self.state.page = page.max(1);
                self.load().await
            }
        }
    }

    pub async fn set_page(&mut self, n: u32) -> Settled {
        if self.state.set_page(n) {
            self.load().await
        } else {
            Settled::Skipped
        }
    }

    pub async fn set_query(&mut self, raw: &str) -> Settled {
        if self.state.set_query(raw) {
            self.load().await
        } else {
            Settled::Skipped
        }
    }

    /// Something changed on the server: refetch in the current mode
    pub async fn trigger_refresh(&mut self) -> Settled {
        self.refresh.trigger();
        self.load().await
    }

    async fn run(&mut self, plan: FetchPlan) -> Settled {
        let outcome = execute(&self.source, &plan).await;
        self.state.complete(plan.seq, outcome)
    }
}
