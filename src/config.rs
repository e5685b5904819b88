//! Application Configuration
//!
//! Build-time settings with defaults, provided to components via context.

use log::LevelFilter;

/// Rows per page requested from every list endpoint
pub const DEFAULT_PAGE_LIMIT: u32 = 30;
/// Shortest trimmed query that is sent to a search endpoint
pub const DEFAULT_SEARCH_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend base URL, no trailing slash
    pub api_base_url: String,
    pub page_limit: u32,
    pub search_min_length: usize,
    pub search_debounce_ms: u32,
    pub toast_duration_ms: u32,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api".to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            search_min_length: DEFAULT_SEARCH_MIN_LENGTH,
            search_debounce_ms: 300,
            toast_duration_ms: 4000,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Read `ADMIN_API_BASE_URL` and `ADMIN_LOG_LEVEL` at compile time
    pub fn from_env() -> Self {
        Self::from_values(option_env!("ADMIN_API_BASE_URL"), option_env!("ADMIN_LOG_LEVEL"))
    }

    fn from_values(base_url: Option<&str>, log_level: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(level) = log_level.and_then(|l| l.parse().ok()) {
            config.log_level = level;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_values(None, None);
        assert_eq!(config.page_limit, 30);
        assert_eq!(config.search_min_length, 3);
        assert_eq!(config.api_base_url, "/api");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_values(Some("https://erp.example.com/v1/ "), Some("debug"));
        assert_eq!(config.api_base_url, "https://erp.example.com/v1");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_bad_level_keeps_default() {
        let config = AppConfig::from_values(None, Some("loud"));
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
