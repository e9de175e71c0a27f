//! Graph export for rendering and interchange (Graphviz DOT, JSON).

use serde::{Deserialize, Serialize};

use super::KnowledgeGraph;
use crate::error::Result;

/// Serializable node/edge-list view of a knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeExport>,
}

/// A single labeled edge in the export shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: String,
    pub relation: String,
    pub target: String,
}

impl GraphExport {
    pub fn from_graph(graph: &KnowledgeGraph) -> Self {
        Self {
            nodes: graph.nodes().map(str::to_string).collect(),
            edges: graph
                .relations()
                .map(|(s, p, o)| EdgeExport {
                    source: s.to_string(),
                    relation: p.to_string(),
                    target: o.to_string(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render the graph in Graphviz DOT format with predicate edge labels.
pub fn to_dot(graph: &KnowledgeGraph) -> String {
    let mut out = String::from("digraph knowledge_graph {\n");
    for node in graph.nodes() {
        out.push_str(&format!("    \"{}\";\n", escape(node)));
    }
    for (subject, predicate, object) in graph.relations() {
        out.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
            escape(subject),
            escape(object),
            escape(predicate)
        ));
    }
    out.push_str("}\n");
    out
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
