use std::collections::HashMap;

use crate::error::Result;
use crate::state::{KgState, Stage, Triple};

/// Canonical form of an entity name: lowercase, spaces underscored.
pub fn canonicalize(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Rewrite every relation's endpoints through the canonical-name map built
/// from `entities`. A 1:1 rewrite: same length, same order, predicates
/// untouched. Names absent from the map pass through unchanged.
pub fn entity_resolver(mut state: KgState) -> Result<KgState> {
    log::info!("Entity resolver: resolving duplicate entities");

    let entity_map: HashMap<&str, String> = state
        .entities
        .iter()
        .map(|e| (e.as_str(), canonicalize(e)))
        .collect();

    state.resolved_relations = state
        .relations
        .iter()
        .map(|triple| {
            let subject = entity_map
                .get(triple.subject.as_str())
                .cloned()
                .unwrap_or_else(|| triple.subject.clone());
            let object = entity_map
                .get(triple.object.as_str())
                .cloned()
                .unwrap_or_else(|| triple.object.clone());
            Triple::new(subject, triple.predicate.clone(), object)
        })
        .collect();

    state
        .messages
        .push(format!("Resolved relations: {:?}", state.resolved_relations));
    state.current_stage = Stage::GraphIntegrator;
    Ok(state)
}
