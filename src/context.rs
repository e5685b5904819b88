//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use leptos_blob::BrowserBlobHost;

use crate::api::{HttpClient, RestResource};
use crate::blob::BlobTransferGateway;
use crate::config::AppConfig;
use crate::models::Record;
use crate::session::{BrowserStorage, Session, SessionStore};

/// App-wide services provided via context
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    /// Authenticated client; the token is fixed for the page's lifetime
    pub client: HttpClient,
    /// Session value plus its storage; the selected year is the only mutable part
    session: RwSignal<SessionStore<BrowserStorage>>,
}

impl AppContext {
    /// Read the session once and build the client from it
    pub fn new(config: AppConfig) -> Self {
        let sessions = SessionStore::open(BrowserStorage);
        let client = HttpClient::new(&config, sessions.session());
        Self {
            config,
            client,
            session: RwSignal::new(sessions),
        }
    }

    pub fn session(&self) -> Session {
        self.session.with(|s| s.session().clone())
    }

    /// Selected year, tracked
    pub fn selected_year(&self) -> i32 {
        self.session.with(|s| s.session().selected_year)
    }

    pub fn selected_year_untracked(&self) -> i32 {
        self.session.with_untracked(|s| s.session().selected_year)
    }

    pub fn set_selected_year(&self, year: i32) {
        if self.selected_year_untracked() == year {
            return;
        }
        log::info!("[Session] selected year {}", year);
        self.session.update(|s| s.set_selected_year(year));
    }

    /// List and CRUD endpoints for `R`
    pub fn resource<R: Record>(&self) -> RestResource<R, HttpClient> {
        RestResource::new(self.client.clone(), R::RESOURCE)
    }

    pub fn blob_gateway(&self) -> BlobTransferGateway<HttpClient, BrowserBlobHost> {
        BlobTransferGateway::new(self.client.clone(), BrowserBlobHost)
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
