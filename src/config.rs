//! Service configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PARKING_SEARCH_ADDR` | `0.0.0.0:7860` |
//! | `PARKING_SEARCH_LISTINGS` | `listings.json` |
//! | `PARKING_SEARCH_TIME_LIMIT_MS` | `5000` |
//! | `PARKING_SEARCH_NODE_LIMIT` | `50000000` |
//! | `PARKING_SEARCH_PREFILTER` | `head` |
//!
//! Either limit can be turned off with the value `none`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::search::{PrefilterPolicy, SearchConfig};

pub const DEFAULT_ADDR: &str = "0.0.0.0:7860";
pub const DEFAULT_LISTINGS_PATH: &str = "listings.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server and search configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub listings_path: PathBuf,
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 7860)),
            listings_path: PathBuf::from(DEFAULT_LISTINGS_PATH),
            search: SearchConfig::bounded(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys fall back to
    /// defaults.
    ///
    /// ```
    /// use parking_search::config::AppConfig;
    ///
    /// let config = AppConfig::from_lookup(|key| match key {
    ///     "PARKING_SEARCH_NODE_LIMIT" => Some("5000".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.search.node_limit, Some(5000));
    /// assert!(config.search.time_limit.is_some());
    /// assert_eq!(config.addr.port(), 7860);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("PARKING_SEARCH_ADDR") {
            config.addr = parse_var("PARKING_SEARCH_ADDR", value)?;
        }
        if let Some(value) = lookup("PARKING_SEARCH_LISTINGS") {
            config.listings_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("PARKING_SEARCH_TIME_LIMIT_MS") {
            let millis: Option<u64> = parse_limit("PARKING_SEARCH_TIME_LIMIT_MS", value)?;
            config.search.time_limit = millis.map(Duration::from_millis);
        }
        if let Some(value) = lookup("PARKING_SEARCH_NODE_LIMIT") {
            config.search.node_limit = parse_limit("PARKING_SEARCH_NODE_LIMIT", value)?;
        }
        if let Some(value) = lookup("PARKING_SEARCH_PREFILTER") {
            config.search.prefilter = parse_var::<PrefilterPolicy>("PARKING_SEARCH_PREFILTER", value)?;
        }

        Ok(config)
    }
}

/// Parses a limit; `none` disables it.
fn parse_limit(var: &'static str, value: String) -> Result<Option<u64>, ConfigError> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_var(var, value).map(Some)
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{DEFAULT_NODE_LIMIT, DEFAULT_TIME_LIMIT_MS};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.listings_path, PathBuf::from(DEFAULT_LISTINGS_PATH));
        assert_eq!(config.search.node_limit, Some(DEFAULT_NODE_LIMIT));
        assert_eq!(
            config.search.time_limit,
            Some(Duration::from_millis(DEFAULT_TIME_LIMIT_MS))
        );
        assert_eq!(config.search.prefilter, PrefilterPolicy::HeadRequirement);
    }

    #[test]
    fn test_none_disables_limits() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PARKING_SEARCH_TIME_LIMIT_MS", "none"),
            ("PARKING_SEARCH_NODE_LIMIT", "NONE"),
        ]))
        .unwrap();
        assert!(config.search.node_limit.is_none());
        assert!(config.search.time_limit.is_none());
    }

    #[test]
    fn test_all_variables_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PARKING_SEARCH_ADDR", "127.0.0.1:9000"),
            ("PARKING_SEARCH_LISTINGS", "/data/listings.json"),
            ("PARKING_SEARCH_TIME_LIMIT_MS", "250"),
            ("PARKING_SEARCH_NODE_LIMIT", "100000"),
            ("PARKING_SEARCH_PREFILTER", "longest"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.listings_path, PathBuf::from("/data/listings.json"));
        assert_eq!(config.search.time_limit, Some(Duration::from_millis(250)));
        assert_eq!(config.search.node_limit, Some(100_000));
        assert_eq!(config.search.prefilter, PrefilterPolicy::LongestRequirement);
    }

    #[test]
    fn test_invalid_value_reports_variable() {
        let err = AppConfig::from_lookup(lookup_from(&[("PARKING_SEARCH_NODE_LIMIT", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("PARKING_SEARCH_NODE_LIMIT"));
        assert!(err.to_string().contains("lots"));
    }
}
