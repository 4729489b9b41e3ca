//! Reduces raw upstream records to [`FilteredResult`]s.

use super::{FilteredResult, RawResult};

/// Tracker name accepted in safe mode unless configured otherwise.
pub const DEFAULT_TRUSTED_TRACKER: &str = "Internet Archive";

/// Keep records that carry a magnet URI, and in safe mode only those from
/// `trusted_tracker`. Upstream order is preserved.
pub fn filter_results(
    raw: Vec<RawResult>,
    safe_only: bool,
    trusted_tracker: &str,
) -> Vec<FilteredResult> {
    raw.into_iter()
        .filter_map(|r| {
            let tracker = r.tracker.unwrap_or_default();
            if safe_only && tracker != trusted_tracker {
                return None;
            }

            let magnet_uri = r.magnet_uri.filter(|m| !m.is_empty())?;

            Some(FilteredResult {
                title: r.title.unwrap_or_default(),
                category: r.category.unwrap_or_default(),
                magnet_uri,
                seeders: r.seeders.unwrap_or(0),
                size: r.size.unwrap_or(0),
                peers: r.peers.unwrap_or(0),
                description: r.description.unwrap_or_default(),
                tracker,
            })
        })
        .collect()
}
