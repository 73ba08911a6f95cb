// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Brave Search gateway
//!
//! Exposes web search through a single text-returning entry point:
//! rate limiting → query sanitization → provider call → result
//! normalization → rendering. Failures never propagate to callers;
//! every outcome is a human-readable text blob.

pub mod config;
pub mod gateway;
pub mod normalize;
pub mod rate_limiter;
pub mod sanitize;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use gateway::SearchGateway;
pub use rate_limiter::RateLimiter;
pub use sanitize::sanitize;
pub use types::{NormalizedResult, ResultType, SafeSearchLevel, SearchError};
