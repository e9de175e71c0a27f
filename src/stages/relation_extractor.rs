use crate::error::Result;
use crate::extract::RelationExtraction;
use crate::state::{KgState, Stage};

/// Delegate the ordered-pair relation scan to the extraction backend.
/// Duplicate triples are allowed and kept.
pub async fn relation_extractor(
    mut state: KgState,
    extractor: &dyn RelationExtraction,
) -> Result<KgState> {
    log::info!("Relation extractor: identifying relationships between entities");

    let found = extractor
        .extract_relations(&state.raw_text, &state.entities)
        .await?;
    state.relations = found;
    log::debug!("Found relations: {:?}", state.relations);

    state
        .messages
        .push(format!("Extracted relations: {:?}", state.relations));
    state.current_stage = Stage::EntityResolver;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PatternRelationExtractor;
    use crate::state::Triple;

    #[tokio::test]
    async fn test_extracts_relations_between_known_entities() {
        let mut state =
            KgState::new("ontology").with_raw_text("EntityA influences EntityB.");
        state.set_entities(vec!["EntityA".to_string(), "EntityB".to_string()]);

        let state = relation_extractor(state, &PatternRelationExtractor)
            .await
            .unwrap();
        assert!(state
            .relations
            .contains(&Triple::new("EntityA", "influences", "EntityB")));
        assert_eq!(state.current_stage, Stage::EntityResolver);
    }

    #[tokio::test]
    async fn test_no_entities_yields_no_relations() {
        // Entities were never extracted; the pair scan has nothing to do
        let state = KgState::new("ontology").with_raw_text("EntityA influences EntityB.");
        let state = relation_extractor(state, &PatternRelationExtractor)
            .await
            .unwrap();
        assert!(state.relations.is_empty());
    }

    #[tokio::test]
    async fn test_appends_exactly_one_message() {
        let state = KgState::new("ontology").with_raw_text("text");
        let before = state.messages.len();
        let state = relation_extractor(state, &PatternRelationExtractor)
            .await
            .unwrap();
        assert_eq!(state.messages.len(), before + 1);
    }
}
