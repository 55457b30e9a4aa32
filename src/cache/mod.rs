//! Bounded FIFO caching of processed completions.

pub mod response_cache;

pub use response_cache::{CacheStats, ResponseCache, DEFAULT_CAPACITY};
