//! LRU caching for LLM extraction responses.

mod extraction_cache;

pub use extraction_cache::ExtractionCache;
