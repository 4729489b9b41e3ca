//! The search pipeline.
//!
//! A request flows through [`build_cache_key`], the
//! [`ResultCache`](crate::cache::ResultCache), and on a miss through the
//! [`Fetcher`](crate::fetcher::Fetcher) and [`filter_results`], before
//! [`paginate`] cuts out the requested page. [`SearchOrchestrator`] ties the
//! steps together.

mod cache_key;
mod filter;
mod orchestrator;
mod pagination;
mod types;

pub use cache_key::build_cache_key;
pub use filter::{filter_results, DEFAULT_TRUSTED_TRACKER};
pub use orchestrator::SearchOrchestrator;
pub use pagination::{paginate, Page, PageRequest, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use types::*;
