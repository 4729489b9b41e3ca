//! Cache key derivation.
//!
//! Format: `search:q=<len>:<text>;c=<count>:<c1>,<c2>,...;s=<0|1>`
//!
//! The text is length-prefixed (in bytes), so separator characters inside it
//! cannot move a field boundary. Categories come from [`Query::categories`],
//! which is already sorted and deduplicated.

use super::Query;

const KEY_PREFIX: &str = "search:";

/// Derive the cache key for a query.
pub fn build_cache_key(query: &Query) -> String {
    let text = query.text();
    let categories = query
        .categories()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}q={}:{};c={}:{};s={}",
        KEY_PREFIX,
        text.len(),
        text,
        query.categories().len(),
        categories,
        u8::from(query.safe_only())
    )
}
