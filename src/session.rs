//! Session
//!
//! Read-once view of the values the dashboard keeps in local storage
//! (bearer token, role id, selected year). Components receive the
//! `Session` through context instead of touching storage themselves.

use chrono::Datelike;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_ID_KEY: &str = "roleId";
pub const SELECTED_YEAR_KEY: &str = "selectedYear";

/// Synchronous string key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn clear(&self);
}

/// `window.localStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("[Session] could not persist {}", key);
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.clear();
        }
    }
}

/// Snapshot of the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role_id: Option<u32>,
    pub selected_year: i32,
}

impl Session {
    pub fn load(store: &impl KeyValueStore) -> Self {
        let token = store.get(TOKEN_KEY).filter(|t| !t.trim().is_empty());
        let role_id = store.get(ROLE_ID_KEY).and_then(|r| r.trim().parse().ok());
        let selected_year = store
            .get(SELECTED_YEAR_KEY)
            .and_then(|y| y.trim().parse().ok())
            .unwrap_or_else(current_year);
        Self { token, role_id, selected_year }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Owns the storage backend and the session value; all writes go through here
#[derive(Debug, Clone)]
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    session: Session,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn open(store: S) -> Self {
        let session = Session::load(&store);
        log::info!(
            "[Session] loaded (authenticated={}, year={})",
            session.is_authenticated(),
            session.selected_year
        );
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_selected_year(&mut self, year: i32) {
        self.store.set(SELECTED_YEAR_KEY, &year.to_string());
        self.session.selected_year = year;
    }

    /// Wipe storage and forget the token
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.session.token = None;
        self.session.role_id = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        pub(crate) values: Rc<RefCell<HashMap<String, String>>>,
    }

    impl MemoryStore {
        pub(crate) fn with(pairs: &[(&str, &str)]) -> Self {
            let store = Self::default();
            for (k, v) in pairs {
                store.set(k, v);
            }
            store
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.values.borrow_mut().insert(key.to_string(), value.to_string());
        }

        fn clear(&self) {
            self.values.borrow_mut().clear();
        }
    }

    #[test]
    fn test_load_reads_all_keys() {
        let store = MemoryStore::with(&[("token", "abc"), ("roleId", "2"), ("selectedYear", "2024")]);
        let session = Session::load(&store);
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.role_id, Some(2));
        assert_eq!(session.selected_year, 2024);
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_missing_values_default() {
        let store = MemoryStore::with(&[("token", " "), ("selectedYear", "soon")]);
        let session = Session::load(&store);
        assert!(!session.is_authenticated());
        assert_eq!(session.role_id, None);
        assert_eq!(session.selected_year, current_year());
    }

    #[test]
    fn test_year_write_through() {
        let store = MemoryStore::default();
        let mut sessions = SessionStore::open(store.clone());
        sessions.set_selected_year(2022);
        assert_eq!(sessions.session().selected_year, 2022);
        assert_eq!(store.get(SELECTED_YEAR_KEY).as_deref(), Some("2022"));
    }

    #[test]
    fn test_clear_all() {
        let store = MemoryStore::with(&[("token", "abc"), ("roleId", "1")]);
        let mut sessions = SessionStore::open(store.clone());
        sessions.clear_all();
        assert!(!sessions.session().is_authenticated());
        assert!(store.values.borrow().is_empty());
    }
}
