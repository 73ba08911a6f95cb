// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider response parsing and result normalization
//!
//! The provider returns up to three heterogeneous result sections (web,
//! news, video) plus an optional `mixed.main` ordering hint describing how
//! to interleave them. This module degrades malformed sections to empty
//! lists instead of failing the whole response, then merges the sections
//! into one ordered, capped list.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::types::{NormalizedResult, ResultType};

/// A provider-native result record, before normalization
///
/// Type-specific extras (publication date, duration, breaking flag) are
/// ignored; only the fields every section shares survive normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// One directive of the provider's mixed ordering hint
#[derive(Debug, Clone, Deserialize)]
pub struct MixedDirective {
    /// Section the directive addresses: "web", "news" or "videos"
    #[serde(rename = "type")]
    pub section: String,
    /// Take the single item at this index within the section
    #[serde(default)]
    pub index: Option<usize>,
    /// Take the entire section
    #[serde(default)]
    pub all: bool,
}

/// The three raw sections extracted from a provider response
#[derive(Debug, Default)]
pub struct RawSections {
    pub web: Vec<RawRecord>,
    pub news: Vec<RawRecord>,
    pub video: Vec<RawRecord>,
}

/// Extract sections and ordering hint from a parsed provider response body.
///
/// Shape per provider contract: `web` is an array (or null) at the top
/// level, `news` and `videos` nest their arrays under `results`, and the
/// ordering hint lives at `mixed.main`. A section that is present but not
/// shaped as an array of records is logged and treated as empty.
pub fn parse_response(body: &Value) -> (RawSections, Option<Vec<MixedDirective>>) {
    let sections = RawSections {
        web: lenient_records(body.get("web"), "web"),
        news: lenient_records(body.get("news").and_then(|n| n.get("results")), "news"),
        video: lenient_records(body.get("videos").and_then(|v| v.get("results")), "videos"),
    };

    let hint = match body.get("mixed").and_then(|m| m.get("main")) {
        None | Some(Value::Null) => None,
        Some(main) => match serde_json::from_value::<Vec<MixedDirective>>(main.clone()) {
            Ok(directives) => Some(directives),
            Err(e) => {
                warn!("Malformed mixed ordering hint, falling back: {}", e);
                None
            }
        },
    };

    (sections, hint)
}

fn lenient_records(value: Option<&Value>, section: &str) -> Vec<RawRecord> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(v) => match serde_json::from_value::<Vec<RawRecord>>(v.clone()) {
            Ok(records) => records,
            Err(e) => {
                warn!("Malformed {} section, treating as empty: {}", section, e);
                Vec::new()
            }
        },
    }
}

/// Merge the three sections into one ordered list of at most `count` results.
///
/// With a hint, directives are applied in order until the hint is exhausted
/// or `count` results have accumulated; without one, sections concatenate
/// in web, news, video order. Duplicates the hint asks for are kept as-is.
pub fn normalize(
    sections: &RawSections,
    hint: Option<&[MixedDirective]>,
    count: usize,
) -> Vec<NormalizedResult> {
    let web = map_section(&sections.web, ResultType::Web);
    let news = map_section(&sections.news, ResultType::News);
    let video = map_section(&sections.video, ResultType::Video);

    let mut out = Vec::new();
    match hint {
        Some(directives) => {
            for directive in directives {
                let list = match directive.section.as_str() {
                    "web" => &web,
                    "news" => &news,
                    "videos" => &video,
                    other => {
                        warn!("Unknown section type in ordering hint: {}", other);
                        continue;
                    }
                };

                if directive.all {
                    out.extend_from_slice(list);
                } else if let Some(index) = directive.index {
                    match list.get(index) {
                        Some(item) => out.push(item.clone()),
                        None => warn!(
                            "Ordering hint index {} out of bounds for {} ({} items)",
                            index,
                            directive.section,
                            list.len()
                        ),
                    }
                } else {
                    warn!("Ordering hint directive has neither `all` nor `index`");
                }

                if out.len() >= count {
                    break;
                }
            }
        }
        None => {
            out.extend(web);
            out.extend(news);
            out.extend(video);
        }
    }

    out.truncate(count);
    out
}

fn map_section(records: &[RawRecord], result_type: ResultType) -> Vec<NormalizedResult> {
    records
        .iter()
        .map(|r| NormalizedResult {
            title: r.title.clone(),
            description: r
                .description
                .clone()
                .or_else(|| r.snippet.clone())
                .unwrap_or_default(),
            url: r.url.clone(),
            result_type,
        })
        .collect()
}
