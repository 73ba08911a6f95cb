// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the search gateway

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a normalized search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Web,
    News,
    Video,
}

impl ResultType {
    /// Visual marker used when rendering results as text
    pub fn marker(&self) -> &'static str {
        match self {
            ResultType::Web => "🌐",
            ResultType::News => "📰",
            ResultType::Video => "🎥",
        }
    }
}

/// A single search result after normalization
///
/// Immutable unit consumed by the text formatter. Description may be
/// empty when the provider supplied neither a description nor a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    /// Title of the search result
    pub title: String,
    /// Description or snippet (possibly empty)
    pub description: String,
    /// URL of the search result
    pub url: String,
    /// Which section this result came from
    pub result_type: ResultType,
}

/// SafeSearch filtering level accepted from callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearchLevel {
    #[default]
    Strict,
    Moderate,
    Off,
}

impl SafeSearchLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafeSearchLevel::Strict => "strict",
            SafeSearchLevel::Moderate => "moderate",
            SafeSearchLevel::Off => "off",
        }
    }

    /// Parse a level from its lowercase name, None for anything else
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "strict" => Some(SafeSearchLevel::Strict),
            "moderate" => Some(SafeSearchLevel::Moderate),
            "off" => Some(SafeSearchLevel::Off),
            _ => None,
        }
    }
}

/// Errors that can occur during a search
///
/// None of these escape `SearchGateway::perform_search`, which translates
/// each into a user-facing text message.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Local request budget exhausted
    #[error("Rate limit exceeded ({window} window)")]
    RateLimitExceeded {
        /// Which window tripped: "per-second" or "per-month"
        window: &'static str,
    },

    /// Provider rejected the API credentials (HTTP 401)
    #[error("Authorization failed: invalid or missing API key")]
    AuthorizationFailure,

    /// Provider-side throttling (HTTP 429)
    #[error("Provider rate limit exceeded, slow down")]
    ProviderRateLimited,

    /// Any other non-success provider response
    #[error("Provider error: {status} - {message}")]
    ProviderError {
        /// HTTP status code
        status: u16,
        /// Error message or response body excerpt
        message: String,
    },

    /// Transport-level failure reaching the provider
    #[error("Network failure: {message}")]
    NetworkFailure {
        /// Underlying transport error
        message: String,
    },
}
