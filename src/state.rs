//! Shared state threaded through the graph-build stages.
//!
//! One `KgState` value is created per pipeline run, handed to each stage in
//! turn, and returned to the caller once the validator marks completion.
//! Stages take the state by value and return a new value; nothing aliases it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::KgForgeError;
use crate::graph::{KnowledgeGraph, ValidationReport};

/// A single (subject, predicate, object) relation triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

/// Pipeline stage identifiers, the dispatch key read by the router.
/// `Done` is the terminal sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DataGatherer,
    EntityExtractor,
    RelationExtractor,
    EntityResolver,
    GraphIntegrator,
    GraphValidator,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::DataGatherer => "data_gatherer",
            Stage::EntityExtractor => "entity_extractor",
            Stage::RelationExtractor => "relation_extractor",
            Stage::EntityResolver => "entity_resolver",
            Stage::GraphIntegrator => "graph_integrator",
            Stage::GraphValidator => "graph_validator",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = KgForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data_gatherer" => Ok(Stage::DataGatherer),
            "entity_extractor" => Ok(Stage::EntityExtractor),
            "relation_extractor" => Ok(Stage::RelationExtractor),
            "entity_resolver" => Ok(Stage::EntityResolver),
            "graph_integrator" => Ok(Stage::GraphIntegrator),
            "graph_validator" => Ok(Stage::GraphValidator),
            "done" => Ok(Stage::Done),
            other => Err(KgForgeError::UnknownStage(other.to_string())),
        }
    }
}

/// Graph-build state, one per pipeline invocation.
///
/// Field ownership by stage: `raw_text` is written once by the data gatherer,
/// `entities` by the entity extractor, `relations` by the relation extractor,
/// `resolved_relations` by the entity resolver, `graph` by the integrator and
/// `validation` by the validator. `messages` is append-only; every stage adds
/// exactly one entry.
#[derive(Debug, Clone)]
pub struct KgState {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Subject driving data gathering; immutable after initialization.
    pub topic: String,
    pub raw_text: String,
    /// Deduplicated candidate entity names. Always contains the topic once
    /// the entity extractor has run.
    pub entities: Vec<String>,
    pub relations: Vec<Triple>,
    /// Same length and order as `relations`, endpoints canonicalized.
    pub resolved_relations: Vec<Triple>,
    pub graph: Option<KnowledgeGraph>,
    pub validation: Option<ValidationReport>,
    pub messages: Vec<String>,
    pub current_stage: Stage,
}

impl KgState {
    /// Fresh initial state for a topic: empty collections, a single seed
    /// trace entry, and the data gatherer as the entry stage.
    pub fn new(topic: impl Into<String>) -> Self {
        let topic = topic.into();
        let messages = vec![format!("Build a knowledge graph about {}", topic)];
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            topic,
            raw_text: String::new(),
            entities: Vec::new(),
            relations: Vec::new(),
            resolved_relations: Vec::new(),
            graph: None,
            validation: None,
            messages,
            current_stage: Stage::DataGatherer,
        }
    }

    /// Pre-populate `raw_text` so the data gatherer passes it through
    /// instead of consulting its text source.
    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }

    pub fn is_complete(&self) -> bool {
        self.current_stage == Stage::Done
    }

    /// Replace `entities` with the names deduplicated in first-seen order.
    /// The topic is always prepended, so it survives deduplication first.
    pub fn set_entities(&mut self, found: Vec<String>) {
        let mut seen = HashSet::new();
        let mut entities = Vec::with_capacity(found.len() + 1);
        for name in std::iter::once(self.topic.clone()).chain(found) {
            if seen.insert(name.clone()) {
                entities.push(name);
            }
        }
        self.entities = entities;
    }
}
