//! Types for the search pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetcher::FetchError;

/// A validated search request.
///
/// Categories behave as a set: they are kept sorted and deduplicated, so two
/// queries that differ only in category order are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    categories: Vec<u32>,
    safe_only: bool,
}

impl Query {
    pub fn new(
        text: impl Into<String>,
        categories: impl IntoIterator<Item = u32>,
        safe_only: bool,
    ) -> Result<Self, QueryError> {
        let text = text.into();
        if text.is_empty() {
            return Err(QueryError::EmptyText);
        }

        let mut categories: Vec<u32> = categories.into_iter().collect();
        categories.sort_unstable();
        categories.dedup();
        if categories.is_empty() {
            return Err(QueryError::NoCategories);
        }

        Ok(Self {
            text,
            categories,
            safe_only,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Categories in ascending order.
    pub fn categories(&self) -> &[u32] {
        &self.categories
    }

    pub fn safe_only(&self) -> bool {
        self.safe_only
    }
}

/// Reasons a [`Query`] cannot be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query text must not be empty")]
    EmptyText,

    #[error("at least one category is required")]
    NoCategories,
}

/// A single record as returned by the indexer aggregator.
///
/// Only the fields the filter reads are modelled; anything else in the
/// upstream payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub magnet_uri: Option<String>,
    #[serde(default)]
    pub tracker: Option<String>,
    #[serde(default)]
    pub seeders: Option<u64>,
    #[serde(default)]
    pub peers: Option<u64>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Vec<u32>>,
}

/// The public, cacheable shape of a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredResult {
    pub title: String,
    pub category: Vec<u32>,
    #[serde(rename = "magnetUri")]
    pub magnet_uri: String,
    pub seeders: u64,
    pub size: u64,
    pub peers: u64,
    pub description: String,
    pub tracker: String,
}

/// Errors that can occur while serving a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Upstream search failed: {0}")]
    Upstream(#[from] FetchError),
}
