// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the search gateway

use std::env;

use crate::types::SafeSearchLevel;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Configuration surface consumed by the gateway
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Brave Search API key
    pub api_key: String,
    /// Provider base URL
    pub base_url: String,
    /// Maximum query length in characters (longer queries are truncated)
    pub max_query_length: usize,
    /// Maximum number of results per search
    pub max_results: usize,
    /// Default number of results when the caller does not specify one
    pub default_results: usize,
    /// Default SafeSearch level when the caller does not specify one
    pub default_safesearch: SafeSearchLevel,
    /// Maximum requests per second
    pub per_second_ceiling: u32,
    /// Maximum requests per month (approximated as process lifetime)
    pub per_month_ceiling: u32,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("BRAVE_API_KEY").unwrap_or_default(),
            base_url: env::var("BRAVE_SEARCH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            max_query_length: env_parse("SEARCH_MAX_QUERY_LENGTH", defaults.max_query_length),
            max_results: env_parse("SEARCH_MAX_RESULTS", defaults.max_results),
            default_results: env_parse("SEARCH_DEFAULT_RESULTS", defaults.default_results),
            default_safesearch: env::var("SEARCH_DEFAULT_SAFESEARCH")
                .ok()
                .and_then(|v| SafeSearchLevel::parse(&v.to_lowercase()))
                .unwrap_or(defaults.default_safesearch),
            per_second_ceiling: env_parse(
                "SEARCH_RATE_LIMIT_PER_SECOND",
                defaults.per_second_ceiling,
            ),
            per_month_ceiling: env_parse(
                "SEARCH_RATE_LIMIT_PER_MONTH",
                defaults.per_month_ceiling,
            ),
            request_timeout_ms: env_parse("SEARCH_REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("BRAVE_API_KEY is required".to_string());
        }
        if self.max_results == 0 {
            return Err("Max results must be greater than 0".to_string());
        }
        if self.default_results == 0 || self.default_results > self.max_results {
            return Err("Default results must be in 1..=max_results".to_string());
        }
        if self.per_second_ceiling == 0 || self.per_month_ceiling == 0 {
            return Err("Rate limit ceilings must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_query_length: 400,
            max_results: 10,
            default_results: 10,
            default_safesearch: SafeSearchLevel::Strict,
            per_second_ceiling: 1,
            per_month_ceiling: 15000,
            request_timeout_ms: 10000,
        }
    }
}
