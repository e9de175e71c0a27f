//! Knowledge graph module: directed labeled graph plus structural validation.
//!
//! Nodes are canonical entity names, edges carry the relation predicate.
//! One edge per ordered node pair; re-adding a relation between the same
//! pair overwrites the previous predicate.

mod export;

pub use export::{to_dot, EdgeExport, GraphExport};

use std::collections::HashMap;

use petgraph::algo::{connected_components, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// Structural diagnostics computed by the graph validator stage.
///
/// `is_connected` is weak connectivity (single component ignoring edge
/// direction); both flags are vacuously false on the empty graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_connected: bool,
    pub has_cycles: bool,
}

/// Directed graph of entity names with predicate-labeled edges.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    graph: DiGraph<String, String>,
    /// Name to node index, for duplicate-free insertion and lookups.
    node_map: HashMap<String, NodeIndex>,
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeGraph {
    /// Create a new empty knowledge graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a node, or return the existing index if the name is already present
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.node_map.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    /// Add a directed relation subject -> object labeled with the predicate.
    ///
    /// Missing endpoint nodes are created. If an edge between the pair
    /// already exists its label is overwritten (last predicate wins).
    pub fn add_relation(&mut self, subject: &str, predicate: &str, object: &str) {
        let s = self.add_node(subject);
        let o = self.add_node(object);
        match self.graph.find_edge(s, o) {
            Some(edge) => self.graph[edge] = predicate.to_string(),
            None => {
                self.graph.add_edge(s, o, predicate.to_string());
            }
        }
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Predicate on the subject -> object edge, if one exists
    pub fn relation_between(&self, subject: &str, object: &str) -> Option<&str> {
        let s = self.node_map.get(subject)?;
        let o = self.node_map.get(object)?;
        let edge = self.graph.find_edge(*s, *o)?;
        Some(self.graph[edge].as_str())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate node names in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(move |idx| self.graph[idx].as_str())
    }

    /// Iterate edges as (subject, predicate, object) name triples
    pub fn relations(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].as_str(),
                edge.weight().as_str(),
                self.graph[edge.target()].as_str(),
            )
        })
    }

    /// Weak connectivity: one component when edge direction is ignored.
    /// Vacuously false for the empty graph.
    pub fn is_weakly_connected(&self) -> bool {
        if self.graph.node_count() == 0 {
            return false;
        }
        connected_components(&self.graph) == 1
    }

    /// Cycle presence: true iff the graph is not a DAG.
    /// Vacuously false for the empty graph.
    pub fn has_cycles(&self) -> bool {
        if self.graph.node_count() == 0 {
            return false;
        }
        is_cyclic_directed(&self.graph)
    }

    /// Compute the full validation report in one pass
    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            num_nodes: self.node_count(),
            num_edges: self.edge_count(),
            is_connected: self.is_weakly_connected(),
            has_cycles: self.has_cycles(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_dedup() {
        let mut graph = KnowledgeGraph::new();
        let a1 = graph.add_node("a");
        let a2 = graph.add_node("a");
        assert_eq!(a1, a2);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_relation_creates_nodes() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "influences", "b");
        assert!(graph.contains_node("a"));
        assert!(graph.contains_node("b"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.relation_between("a", "b"), Some("influences"));
    }

    #[test]
    fn test_add_relation_overwrites_label() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "relates_to", "b");
        graph.add_relation("a", "influences", "b");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.relation_between("a", "b"), Some("influences"));
    }

    #[test]
    fn test_relation_between_direction_sensitive() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "influences", "b");
        assert_eq!(graph.relation_between("b", "a"), None);
    }

    #[test]
    fn test_empty_graph_vacuous_diagnostics() {
        let graph = KnowledgeGraph::new();
        let report = graph.validate();
        assert_eq!(
            report,
            ValidationReport {
                num_nodes: 0,
                num_edges: 0,
                is_connected: false,
                has_cycles: false,
            }
        );
    }

    #[test]
    fn test_weak_connectivity_single_chain() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "influences", "b");
        graph.add_relation("c", "influences", "b");
        // a -> b <- c is connected when direction is ignored
        assert!(graph.is_weakly_connected());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_weak_connectivity_two_components() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "influences", "b");
        graph.add_relation("c", "influences", "d");
        assert!(!graph.is_weakly_connected());
    }

    #[test]
    fn test_isolated_node_breaks_connectivity() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "influences", "b");
        graph.add_node("lonely");
        assert!(!graph.is_weakly_connected());
    }

    #[test]
    fn test_cycle_detection() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "influences", "b");
        graph.add_relation("b", "influences", "c");
        assert!(!graph.has_cycles());
        graph.add_relation("c", "influences", "a");
        assert!(graph.has_cycles());
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "relates_to", "a");
        assert!(graph.has_cycles());
    }

    #[test]
    fn test_relations_iteration() {
        let mut graph = KnowledgeGraph::new();
        graph.add_relation("a", "influences", "b");
        graph.add_relation("b", "is_type_of", "c");
        let mut rels: Vec<_> = graph.relations().collect();
        rels.sort();
        assert_eq!(
            rels,
            vec![("a", "influences", "b"), ("b", "is_type_of", "c")]
        );
    }
}
