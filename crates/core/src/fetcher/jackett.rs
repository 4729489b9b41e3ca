//! Jackett aggregate-search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::JackettConfig;
use crate::search::RawResult;

use super::{FetchError, Fetcher};

/// Client for Jackett's `all` indexer endpoint.
///
/// Build one at startup and share it; the inner `reqwest::Client` pools
/// connections.
pub struct JackettFetcher {
    client: Client,
    config: JackettConfig,
}

impl JackettFetcher {
    /// Create a new JackettFetcher with the given configuration.
    pub fn new(config: JackettConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| {
                FetchError::ConnectionFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Build the Jackett API URL for a search across all indexers.
    fn build_search_url(&self, text: &str, categories: &[u32]) -> String {
        let mut url = format!(
            "{}/api/v2.0/indexers/all/results?apikey={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key),
        );

        for category in categories {
            url.push_str(&format!("&Category[]={}", category));
        }

        url.push_str(&format!("&Query={}", urlencoding::encode(text)));
        url
    }
}

#[async_trait]
impl Fetcher for JackettFetcher {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn fetch(&self, text: &str, categories: &[u32]) -> Result<Vec<RawResult>, FetchError> {
        let url = self.build_search_url(text, categories);
        debug!(query = %text, categories = ?categories, "Searching Jackett");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_connect() {
                FetchError::ConnectionFailed(e.to_string())
            } else {
                FetchError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::InvalidResponse(e.to_string())
            }
        })?;

        let jackett_response = parse_response(&body)?;

        for indexer in &jackett_response.Indexers {
            if let Some(error) = indexer.Error.as_deref().filter(|e| !e.is_empty()) {
                warn!(
                    indexer = indexer.Name.as_deref().unwrap_or("unknown"),
                    error = %error,
                    "Indexer reported an error"
                );
            }
        }

        debug!(
            results = jackett_response.Results.len(),
            indexers = jackett_response.Indexers.len(),
            "Jackett search complete"
        );

        Ok(jackett_response.Results)
    }
}

fn parse_response(body: &[u8]) -> Result<JackettResponse, FetchError> {
    serde_json::from_slice(body)
        .map_err(|e| FetchError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

// Jackett API response types
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<RawResult>,
    #[serde(default)]
    Indexers: Vec<JackettIndexer>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettIndexer {
    #[serde(default)]
    Name: Option<String>,
    #[serde(default)]
    Error: Option<String>,
}
