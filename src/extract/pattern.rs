//! Regex-based extraction heuristics (the default backend).

use async_trait::async_trait;
use regex::Regex;

use super::{EntityExtraction, RelationExtraction};
use crate::error::{KgForgeError, Result};
use crate::state::Triple;

/// Relation types tried against every ordered entity pair, in this order.
const RELATION_TYPES: [&str; 3] = ["relates_to", "influences", "is_type_of"];

/// Finds tokens of the form `Entity` followed by one uppercase letter
/// (the synthetic placeholder format). A toy heuristic, not general NER.
#[derive(Debug, Clone, Default)]
pub struct PatternEntityExtractor;

#[async_trait]
impl EntityExtraction for PatternEntityExtractor {
    async fn extract_entities(&self, text: &str) -> Result<Vec<String>> {
        let pattern = Regex::new(r"Entity[A-Z]").expect("Invalid regex pattern");
        Ok(pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

/// Ordered-pair relation scan over all known entities.
///
/// For each pair (e1, e2) and each relation type, a triple is emitted when
/// either the keyworded pattern `e1 .* <type> .* e2` matches the text with
/// underscores replaced by spaces, or the loose pattern `e1 .* e2` matches
/// the unmodified text (both case-insensitive). The loose pattern ignores
/// the relation keyword entirely, so a pair that only satisfies it yields a
/// triple for every relation type. Known over-generation quirk of this
/// heuristic, preserved as-is; use the LLM backend when precision matters.
#[derive(Debug, Clone, Default)]
pub struct PatternRelationExtractor;

#[async_trait]
impl RelationExtraction for PatternRelationExtractor {
    async fn extract_relations(&self, text: &str, entities: &[String]) -> Result<Vec<Triple>> {
        let mut relations = Vec::new();
        let despaced = text.replace('_', " ");

        for e1 in entities {
            for e2 in entities {
                if e1 == e2 {
                    continue;
                }
                let loose_hit = pair_pattern(e1, e2)?.is_match(text);
                for rel_type in RELATION_TYPES {
                    if loose_hit || keyword_pattern(e1, rel_type, e2)?.is_match(&despaced) {
                        relations.push(Triple::new(e1.as_str(), rel_type, e2.as_str()));
                    }
                }
            }
        }

        Ok(relations)
    }
}

/// `e1 .* <relation type> .* e2`, case-insensitive. Entity names are escaped;
/// the relation type is a plain snake_case token and needs no escaping.
fn keyword_pattern(e1: &str, rel_type: &str, e2: &str) -> Result<Regex> {
    compile(&format!(
        "(?i){}.*{}.*{}",
        regex::escape(e1),
        rel_type,
        regex::escape(e2)
    ))
}

/// `e1 .* e2`, case-insensitive.
fn pair_pattern(e1: &str, e2: &str) -> Result<Regex> {
    compile(&format!(
        "(?i){}.*{}",
        regex::escape(e1),
        regex::escape(e2)
    ))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| KgForgeError::Extraction(format!("bad relation pattern: {}", e)))
}
