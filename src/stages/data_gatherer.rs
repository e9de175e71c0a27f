use crate::error::Result;
use crate::gather::TextSource;
use crate::state::{KgState, Stage};

/// Populate `raw_text`, consulting the text source only when the caller did
/// not supply text up front.
pub async fn data_gatherer(mut state: KgState, source: &dyn TextSource) -> Result<KgState> {
    log::info!("Data gatherer: collecting text about '{}'", state.topic);

    if state.raw_text.is_empty() {
        state.raw_text = source.gather(&state.topic).await?;
    }

    state
        .messages
        .push(format!("Collected raw text about {}", state.topic));
    state.current_stage = Stage::EntityExtractor;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gather::PlaceholderSource;

    #[tokio::test]
    async fn test_fills_empty_raw_text_from_source() {
        let state = KgState::new("ontology");
        let state = data_gatherer(state, &PlaceholderSource).await.unwrap();
        assert!(state.raw_text.contains("EntityA influences EntityB."));
        assert_eq!(state.current_stage, Stage::EntityExtractor);
    }

    #[tokio::test]
    async fn test_preserves_caller_supplied_raw_text() {
        let state = KgState::new("ontology").with_raw_text("Custom corpus text.");
        let state = data_gatherer(state, &PlaceholderSource).await.unwrap();
        assert_eq!(state.raw_text, "Custom corpus text.");
    }

    #[tokio::test]
    async fn test_appends_exactly_one_message() {
        let state = KgState::new("ontology");
        let before = state.messages.len();
        let state = data_gatherer(state, &PlaceholderSource).await.unwrap();
        assert_eq!(state.messages.len(), before + 1);
        assert!(state.messages.last().unwrap().contains("ontology"));
    }
}
