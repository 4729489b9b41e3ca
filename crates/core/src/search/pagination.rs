//! Page-window arithmetic over an ordered result list.

use serde::Serialize;

/// Page size used when the caller asks for none, or for an invalid one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// A normalized page request: `page >= 1`, `per_page` in `1..=MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Normalize caller-supplied values. A missing or non-positive page becomes
    /// 1; a missing or out-of-range page size becomes [`DEFAULT_PER_PAGE`].
    pub fn from_raw(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => 1,
        };
        let per_page = match per_page {
            Some(pp) if (1..=i64::from(MAX_PER_PAGE)).contains(&pp) => pp as u32,
            _ => DEFAULT_PER_PAGE,
        };
        Self { page, per_page }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results, serialized as the public response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: usize,
    pub total_pages: u32,
}

/// Slice `items` into the requested page.
///
/// A page past the end is clamped to the last page, so any positive request
/// yields a valid window. An empty list yields an empty page 1 with
/// `total_pages == 0`. The reported page is always the one actually served.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total_items = items.len();
    let per_page = request.per_page.max(1);

    if total_items == 0 {
        return Page {
            items: Vec::new(),
            page: 1,
            per_page,
            total_items,
            total_pages: 0,
        };
    }

    let per_page_len = per_page as usize;
    let total_pages = total_items.div_ceil(per_page_len);
    let page = (request.page.max(1) as usize).min(total_pages);

    let mut start = (page - 1) * per_page_len;
    if start >= total_items {
        start = total_items.saturating_sub(per_page_len);
    }
    let end = (start + per_page_len).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page: page as u32,
        per_page,
        total_items,
        total_pages: total_pages as u32,
    }
}
