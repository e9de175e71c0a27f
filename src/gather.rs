//! Text sources feeding the data-gatherer stage.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Supplies raw source text for a topic.
///
/// The pipeline treats retrieval as an external collaborator: any failure
/// here propagates to the caller unchanged.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn gather(&self, topic: &str) -> Result<String>;
}

/// Deterministic placeholder paragraph mentioning the topic and three
/// synthetic entities, so the pattern-based extractors have something to
/// find without a real retrieval backend.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderSource;

#[async_trait]
impl TextSource for PlaceholderSource {
    async fn gather(&self, topic: &str) -> Result<String> {
        Ok(format!(
            "{} is an important concept. It relates to various entities like EntityA, \
             EntityB, and EntityC. EntityA influences EntityB. EntityC is a type of EntityB.",
            topic
        ))
    }
}

/// Reads the source text for every topic from a UTF-8 file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TextSource for FileSource {
    async fn gather(&self, _topic: &str) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
