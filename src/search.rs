//! Search Gate
//!
//! Decides whether a keystroke in a search box should reach the backend.
//! Trimmed text shorter than the minimum length (but not empty) is ignored,
//! an empty box clears the search, anything else is dispatched.

/// What the list should do with the latest search text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchIntent {
    /// Empty box: go back to the plain list endpoint
    Clear,
    /// Too short: keep showing what is on screen
    Hold,
    /// Send this (trimmed) keyword to the search endpoint
    Dispatch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// Last keyword that was dispatched
    pub query: String,
    pub min_length: usize,
    /// True while the list shows search results
    pub active: bool,
}

impl SearchState {
    pub fn new(min_length: usize) -> Self {
        Self {
            query: String::new(),
            min_length: min_length.max(1),
            active: false,
        }
    }

    pub fn evaluate(&self, raw: &str) -> SearchIntent {
        let trimmed = raw.trim();
        match trimmed.chars().count() {
            0 => SearchIntent::Clear,
            n if n < self.min_length => SearchIntent::Hold,
            _ => SearchIntent::Dispatch(trimmed.to_string()),
        }
    }

    /// Evaluate `raw` and update the state. Returns the intent plus whether
    /// a fetch is needed. `Clear` always needs one.
    pub fn apply(&mut self, raw: &str) -> (SearchIntent, bool) {
        let intent = self.evaluate(raw);
        let changed = match &intent {
            SearchIntent::Clear => {
                self.query.clear();
                self.active = false;
                true
            }
            SearchIntent::Hold => false,
            SearchIntent::Dispatch(keyword) => {
                let changed = !self.active || self.query != *keyword;
                self.query = keyword.clone();
                self.active = true;
                changed
            }
        };
        (intent, changed)
    }

    /// Keyword to search for, if a search is active
    pub fn keyword(&self) -> Option<&str> {
        self.active.then_some(self.query.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_query_holds() {
        let state = SearchState::new(3);
        assert_eq!(state.evaluate("a"), SearchIntent::Hold);
        assert_eq!(state.evaluate(" ab "), SearchIntent::Hold);
        assert_eq!(state.evaluate("abc"), SearchIntent::Dispatch("abc".into()));
    }

    #[test]
    fn test_whitespace_clears() {
        let state = SearchState::new(3);
        assert_eq!(state.evaluate(""), SearchIntent::Clear);
        assert_eq!(state.evaluate("   "), SearchIntent::Clear);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let state = SearchState::new(3);
        assert_eq!(state.evaluate("Иван"), SearchIntent::Dispatch("Иван".into()));
        assert_eq!(state.evaluate("Ив"), SearchIntent::Hold);
    }

    #[test]
    fn test_apply_tracks_changes() {
        let mut state = SearchState::new(3);

        assert_eq!(state.apply("ab"), (SearchIntent::Hold, false));
        assert_eq!(state.keyword(), None);

        let (_, changed) = state.apply("abc");
        assert!(changed);
        assert_eq!(state.keyword(), Some("abc"));

        // same keyword with padding is not a new search
        let (_, changed) = state.apply(" abc ");
        assert!(!changed);

        // shrinking below the minimum keeps the active search
        assert_eq!(state.apply("ab"), (SearchIntent::Hold, false));
        assert_eq!(state.keyword(), Some("abc"));

        assert_eq!(state.apply(""), (SearchIntent::Clear, true));
        assert_eq!(state.keyword(), None);
        // clearing always refetches the plain list
        assert_eq!(state.apply(""), (SearchIntent::Clear, true));
    }
}
