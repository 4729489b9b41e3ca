//! Search API handler.

use std::sync::Arc;

use axum::{
    extract::{Query as QueryParams, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use torrent_search_core::{FetchError, FilteredResult, Page, PageRequest, Query, SearchError};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Raw query-string parameters. Everything arrives as text and is validated
/// by [`parse_search_params`].
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default, rename = "safeOnly")]
    pub safe_only: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub per_page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Validation
// ============================================================================

/// Turn raw parameters into a validated query and a normalized page request.
///
/// Page and page size are lenient (bad values fall back to defaults); query,
/// categories and the safe flag are strict.
pub fn parse_search_params(params: &SearchParams) -> Result<(Query, PageRequest), String> {
    let text = params.query.as_deref().map(str::trim).unwrap_or_default();
    let categories_str = params.categories.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() || categories_str.is_empty() {
        return Err("query and categories parameters are required".to_string());
    }

    let categories = categories_str
        .split(',')
        .map(|c| c.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("invalid category format: {:?}", categories_str))?;

    let safe_only = parse_flag(params.safe_only.as_deref())?;

    let query = Query::new(text, categories, safe_only).map_err(|e| e.to_string())?;

    let page = PageRequest::from_raw(
        parse_lenient(params.page.as_deref()),
        parse_lenient(params.per_page.as_deref()),
    );

    Ok((query, page))
}

fn parse_flag(value: Option<&str>) -> Result<bool, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v == "0" || v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(format!("invalid safeOnly value: {:?}", v)),
    }
}

fn parse_lenient(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /search, GET /api/v1/search
///
/// Search the upstream indexers (or the cache) and return one page.
pub async fn search(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Page<FilteredResult>>, ApiError> {
    let (query, page) =
        parse_search_params(&params).map_err(|e| error(StatusCode::BAD_REQUEST, e))?;

    match state.orchestrator().search(&query, page).await {
        Ok(page) => {
            debug!(
                query = %query.text(),
                page = page.page,
                returned = page.items.len(),
                total_items = page.total_items,
                "Search served"
            );
            Ok(Json(page))
        }
        Err(SearchError::Upstream(FetchError::Timeout)) => Err(error(
            StatusCode::GATEWAY_TIMEOUT,
            "Upstream search timed out",
        )),
        Err(e) => Err(error(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}
