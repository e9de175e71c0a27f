use crate::error::Result;
use crate::extract::EntityExtraction;
use crate::state::{KgState, Stage};

/// Scan `raw_text` for candidate entities. The topic always counts as an
/// entity; the result is deduplicated in first-seen order.
pub async fn entity_extractor(
    mut state: KgState,
    extractor: &dyn EntityExtraction,
) -> Result<KgState> {
    log::info!("Entity extractor: identifying entities in the text");

    let found = extractor.extract_entities(&state.raw_text).await?;
    state.set_entities(found);
    log::debug!("Found entities: {:?}", state.entities);

    state
        .messages
        .push(format!("Extracted entities: {:?}", state.entities));
    state.current_stage = Stage::RelationExtractor;
    Ok(state)
}
