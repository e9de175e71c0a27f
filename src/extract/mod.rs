//! Pluggable entity and relation extraction backends.
//!
//! The pipeline stages only see these traits; the regex heuristics and the
//! LLM-backed extractors are interchangeable implementations.

mod llm;
mod pattern;

pub use llm::{LlmClient, LlmEntityExtractor, LlmRelationExtractor};
pub use pattern::{PatternEntityExtractor, PatternRelationExtractor};

use async_trait::async_trait;

use crate::error::Result;
use crate::state::Triple;

/// Extracts candidate entity names from raw text.
///
/// Implementations return raw mentions; deduplication and topic inclusion
/// are handled by the entity extractor stage.
#[async_trait]
pub trait EntityExtraction: Send + Sync {
    async fn extract_entities(&self, text: &str) -> Result<Vec<String>>;
}

/// Extracts relation triples between known entities from raw text.
/// Duplicate triples are allowed; downstream stages tolerate them.
#[async_trait]
pub trait RelationExtraction: Send + Sync {
    async fn extract_relations(&self, text: &str, entities: &[String]) -> Result<Vec<Triple>>;
}
