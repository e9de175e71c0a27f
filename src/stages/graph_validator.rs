use crate::error::{KgForgeError, Result};
use crate::state::{KgState, Stage};

/// Compute structural diagnostics over the built graph and mark the
/// pipeline complete.
pub fn graph_validator(mut state: KgState) -> Result<KgState> {
    log::info!("Graph validator: validating knowledge graph");

    let graph = state.graph.as_ref().ok_or_else(|| {
        KgForgeError::State("graph validator requires the graph built by the integrator".to_string())
    })?;

    let report = graph.validate();
    log::debug!("Validation report: {:?}", report);

    state.messages.push(format!(
        "Validation report: {} nodes, {} edges, connected: {}, cycles: {}",
        report.num_nodes, report.num_edges, report.is_connected, report.has_cycles
    ));
    state.validation = Some(report);
    state.current_stage = Stage::Done;
    Ok(state)
}
