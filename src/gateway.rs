// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search gateway orchestration
//!
//! Coordinates rate limiting, query sanitization, the outbound provider
//! call, result normalization and text rendering. The public entry point
//! always returns text; every failure is translated into a descriptive
//! message instead of propagating to the caller.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::normalize::{normalize, parse_response};
use crate::rate_limiter::RateLimiter;
use crate::sanitize::sanitize;
use crate::types::{NormalizedResult, SafeSearchLevel, SearchError};

/// Gateway to the external search provider
pub struct SearchGateway {
    client: Client,
    rate_limiter: RateLimiter,
    config: SearchConfig,
}

impl SearchGateway {
    /// Create a new gateway from configuration
    pub fn new(config: SearchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        let rate_limiter =
            RateLimiter::new(config.per_second_ceiling, config.per_month_ceiling);

        Self {
            client,
            rate_limiter,
            config,
        }
    }

    /// Perform a search and render the outcome as text.
    ///
    /// Never fails: rate-limit, network, provider and parse errors all
    /// become a descriptive message embedding the original query.
    pub async fn perform_search(
        &self,
        query: &str,
        count: Option<usize>,
        safesearch: Option<SafeSearchLevel>,
        freshness: Option<&str>,
    ) -> String {
        match self.execute(query, count, safesearch, freshness).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Search failed for {:?}: {}", query, e);
                format!("Search failed for \"{}\": {}", query, e)
            }
        }
    }

    /// Requests left in the month budget
    pub fn remaining_month_budget(&self) -> u32 {
        self.rate_limiter.remaining_month()
    }

    async fn execute(
        &self,
        query: &str,
        count: Option<usize>,
        safesearch: Option<SafeSearchLevel>,
        freshness: Option<&str>,
    ) -> Result<String, SearchError> {
        self.rate_limiter.check()?;

        let sanitized = sanitize(query, self.config.max_query_length);
        let count = count
            .unwrap_or(self.config.default_results)
            .clamp(1, self.config.max_results.max(1));
        let level = safesearch.unwrap_or(self.config.default_safesearch);

        debug!(
            query = %sanitized,
            count,
            safesearch = level.as_str(),
            "Dispatching search request"
        );

        let start = Instant::now();

        // The outbound safesearch parameter stays pinned to "strict"; the
        // requested level is accepted and logged but not forwarded. Kept as
        // observed upstream behavior, flagged in DESIGN.md.
        let count_param = count.to_string();
        let mut request = self
            .client
            .get(&self.config.base_url)
            .header("X-Subscription-Token", &self.config.api_key)
            .header("Accept", "application/json")
            .query(&[
                ("q", sanitized.as_str()),
                ("count", count_param.as_str()),
                ("safesearch", "strict"),
            ]);
        if let Some(freshness) = freshness {
            request = request.query(&[("freshness", freshness)]);
        }

        let response = request.send().await.map_err(|e| SearchError::NetworkFailure {
            message: if e.is_timeout() {
                format!("request timed out after {}ms", self.config.request_timeout_ms)
            } else {
                e.to_string()
            },
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let body: Value = response.json().await.map_err(|e| SearchError::ProviderError {
            status: status.as_u16(),
            message: format!("invalid JSON body: {}", e),
        })?;

        let (sections, hint) = parse_response(&body);
        let results = normalize(&sections, hint.as_deref(), count);

        info!(
            query = %sanitized,
            results = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(render_results(query, &results))
    }
}

fn status_error(status: StatusCode, body: String) -> SearchError {
    if status == StatusCode::UNAUTHORIZED {
        SearchError::AuthorizationFailure
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        SearchError::ProviderRateLimited
    } else {
        SearchError::ProviderError {
            status: status.as_u16(),
            message: if body.is_empty() {
                "unexpected provider response".to_string()
            } else {
                body
            },
        }
    }
}

fn render_results(query: &str, results: &[NormalizedResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{}\"", query);
    }

    let mut out = format!(
        "Search results for \"{}\" ({} result{}):\n",
        query,
        results.len(),
        if results.len() == 1 { "" } else { "s" }
    );

    for (i, result) in results.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. {} {}\n",
            i + 1,
            result.result_type.marker(),
            result.title
        );
        if !result.description.is_empty() {
            let _ = writeln!(out, "{}", result.description);
        }
        let _ = writeln!(out, "{}", result.url);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultType;

    fn result(title: &str, result_type: ResultType) -> NormalizedResult {
        NormalizedResult {
            title: title.to_string(),
            description: format!("about {}", title),
            url: format!("https://example.com/{}", title),
            result_type,
        }
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            SearchError::AuthorizationFailure
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            SearchError::ProviderRateLimited
        ));
        match status_error(StatusCode::BAD_GATEWAY, "upstream down".to_string()) {
            SearchError::ProviderError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_render_results_layout() {
        let results = vec![
            result("First", ResultType::Web),
            NormalizedResult {
                title: "Second".to_string(),
                description: String::new(),
                url: "https://example.com/2".to_string(),
                result_type: ResultType::Video,
            },
        ];

        let text = render_results("rust async", &results);
        assert!(text.starts_with("Search results for \"rust async\" (2 results):"));
        assert!(text.contains("1. 🌐 First\nabout First\nhttps://example.com/First"));
        // Empty description collapses to heading + link
        assert!(text.contains("2. 🎥 Second\nhttps://example.com/2"));
    }

    #[test]
    fn test_render_no_results_names_original_query() {
        let text = render_results("  weird   query ", &[]);
        assert!(text.contains("No results found"));
        assert!(text.contains("  weird   query "));
    }

    #[test]
    fn test_render_single_result_header() {
        let text = render_results("q", &[result("Only", ResultType::News)]);
        assert!(text.contains("(1 result):"));
        assert!(text.contains("📰 Only"));
    }

    #[tokio::test]
    async fn test_perform_search_network_failure_returns_text() {
        let config = SearchConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9/res/v1/web/search".to_string(),
            request_timeout_ms: 1000,
            ..SearchConfig::default()
        };
        let gateway = SearchGateway::new(config);

        let text = gateway.perform_search("rust lang", None, None, None).await;
        assert!(text.contains("Search failed"));
        assert!(text.contains("rust lang"));
    }

    #[tokio::test]
    async fn test_perform_search_rate_limit_returns_text() {
        let config = SearchConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9/res/v1/web/search".to_string(),
            per_second_ceiling: 100,
            per_month_ceiling: 1,
            request_timeout_ms: 1000,
            ..SearchConfig::default()
        };
        let gateway = SearchGateway::new(config);

        // First call consumes the month budget (and fails on network)
        let _ = gateway.perform_search("q", None, None, None).await;
        assert_eq!(gateway.remaining_month_budget(), 0);

        let text = gateway.perform_search("q", None, None, None).await;
        assert!(text.contains("Rate limit exceeded"));
        assert!(text.contains("per-month"));
    }
}
