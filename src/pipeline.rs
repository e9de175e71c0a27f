//! Stage routing and the pipeline driver.
//!
//! The driver owns the pluggable collaborators (text source, extraction
//! backends) and runs the state machine: read the dispatch key, invoke the
//! named stage, repeat until the terminal sentinel. Errors propagate to the
//! caller unchanged; a failed run is restarted from a fresh state.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::ExtractionCache;
use crate::config::{BackendKind, Config, LlmConfig, SourceKind};
use crate::error::{KgForgeError, Result};
use crate::extract::{
    EntityExtraction, LlmClient, LlmEntityExtractor, LlmRelationExtractor,
    PatternEntityExtractor, PatternRelationExtractor, RelationExtraction,
};
use crate::gather::{FileSource, PlaceholderSource, TextSource};
use crate::stages::{
    data_gatherer, entity_extractor, entity_resolver, graph_integrator, graph_validator,
    relation_extractor,
};
use crate::state::{KgState, Stage};

/// Read the dispatch key for the next stage. Pure lookup, no side effects;
/// the driver decides what to do with it.
pub fn router(state: &KgState) -> Stage {
    state.current_stage
}

/// Drives the graph-build state machine from initialization to completion.
pub struct Pipeline {
    source: Box<dyn TextSource>,
    entities: Box<dyn EntityExtraction>,
    relations: Box<dyn RelationExtraction>,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn TextSource>,
        entities: Box<dyn EntityExtraction>,
        relations: Box<dyn RelationExtraction>,
    ) -> Self {
        Self {
            source,
            entities,
            relations,
        }
    }

    /// Default configuration: placeholder text source and regex heuristics.
    pub fn with_patterns() -> Self {
        Self::new(
            Box::new(PlaceholderSource),
            Box::new(PatternEntityExtractor),
            Box::new(PatternRelationExtractor),
        )
    }

    /// Build a pipeline from configuration, selecting the text source and
    /// extraction backend.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source: Box<dyn TextSource> = match config.gather.source {
            SourceKind::Placeholder => Box::new(PlaceholderSource),
            SourceKind::File => {
                let path = config.gather.text_path.as_ref().ok_or_else(|| {
                    KgForgeError::Config(
                        "gather.text_path is required when gather.source = \"file\"".to_string(),
                    )
                })?;
                Box::new(FileSource::new(path))
            }
        };

        match config.extraction.backend {
            BackendKind::Pattern => Ok(Self::new(
                source,
                Box::new(PatternEntityExtractor),
                Box::new(PatternRelationExtractor),
            )),
            BackendKind::Llm => {
                let llm = Arc::new(build_llm_client(&config.llm)?);
                let cache = if config.llm.cache_capacity > 0 {
                    Some(Arc::new(ExtractionCache::new(config.llm.cache_capacity)))
                } else {
                    None
                };
                Ok(Self::new(
                    source,
                    Box::new(LlmEntityExtractor::new(llm.clone(), cache.clone())),
                    Box::new(LlmRelationExtractor::new(llm, cache)),
                ))
            }
        }
    }

    /// Run the pipeline to completion and return the final state.
    ///
    /// A caller-supplied `initial_state` (e.g. with `raw_text` pre-populated
    /// via [`KgState::with_raw_text`]) is used as-is; otherwise a fresh state
    /// is created from the topic.
    pub async fn run(&self, topic: &str, initial_state: Option<KgState>) -> Result<KgState> {
        let mut state = initial_state.unwrap_or_else(|| KgState::new(topic));
        log::info!(
            "Starting knowledge graph pipeline for '{}' (run {})",
            state.topic,
            state.run_id
        );

        loop {
            state = match router(&state) {
                Stage::DataGatherer => data_gatherer(state, self.source.as_ref()).await?,
                Stage::EntityExtractor => {
                    entity_extractor(state, self.entities.as_ref()).await?
                }
                Stage::RelationExtractor => {
                    relation_extractor(state, self.relations.as_ref()).await?
                }
                Stage::EntityResolver => entity_resolver(state)?,
                Stage::GraphIntegrator => graph_integrator(state)?,
                Stage::GraphValidator => graph_validator(state)?,
                Stage::Done => break,
            };
        }

        log::info!(
            "Knowledge graph construction complete for '{}'",
            state.topic
        );
        Ok(state)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_patterns()
    }
}

fn build_llm_client(config: &LlmConfig) -> Result<LlmClient> {
    let api_key = match &config.api_key_env {
        Some(var) => Some(std::env::var(var).map_err(|_| {
            KgForgeError::Config(format!("Environment variable {} not set", var))
        })?),
        None => None,
    };

    Ok(LlmClient::new(
        config.endpoint.clone(),
        config.model.clone(),
        api_key,
        Duration::from_millis(config.timeout_ms),
        config.max_retries,
    ))
}
