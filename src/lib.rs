pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod gather;
pub mod graph;
pub mod pipeline;
pub mod stages;
pub mod state;

pub use config::Config;
pub use error::{KgForgeError, Result};
pub use graph::{GraphExport, KnowledgeGraph, ValidationReport};
pub use pipeline::{router, Pipeline};
pub use state::{KgState, Stage, Triple};
