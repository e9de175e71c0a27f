use crate::error::Result;
use crate::graph::KnowledgeGraph;
use crate::state::{KgState, Stage};

/// Assemble the directed graph from resolved triples. Endpoint nodes are
/// created on first sight; an edge between the same ordered pair keeps only
/// the most recently added predicate.
pub fn graph_integrator(mut state: KgState) -> Result<KgState> {
    log::info!("Graph integrator: building the knowledge graph");

    let mut graph = KnowledgeGraph::new();
    for triple in &state.resolved_relations {
        graph.add_relation(&triple.subject, &triple.predicate, &triple.object);
    }

    state.messages.push(format!(
        "Built graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    ));
    state.graph = Some(graph);
    state.current_stage = Stage::GraphValidator;
    Ok(state)
}
