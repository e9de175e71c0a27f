//! LLM-backed extraction via an OpenAI-compatible chat-completions API.
//!
//! Drop-in replacement for the regex heuristics: same trait contracts,
//! arbitrary internal logic. Works against hosted OpenAI or a local Ollama
//! endpoint (bearer auth is optional).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EntityExtraction, RelationExtraction};
use crate::cache::ExtractionCache;
use crate::error::{KgForgeError, Result};
use crate::state::Triple;

const ENTITY_SYSTEM_PROMPT: &str = "You extract named entities from text. \
    Respond with a JSON array of entity name strings and nothing else.";

const RELATION_SYSTEM_PROMPT: &str = "You extract relations between known entities. \
    Respond with a JSON array of [subject, predicate, object] string triples and nothing else. \
    Use snake_case predicates.";

/// Request structure for the chat-completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Response structure from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Chat-completions client used by the LLM extraction backend
///
/// Handles timeout-bounded requests with retry on rate-limit and server
/// errors (exponential backoff).
pub struct LlmClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_retries: usize,
}

impl LlmClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of an OpenAI-compatible API (e.g. "https://api.openai.com/v1"
    ///   or "http://localhost:11434/v1")
    /// * `model` - Model name
    /// * `api_key` - Bearer token; None for endpoints without auth
    /// * `timeout` - Per-request timeout
    /// * `max_retries` - Maximum retry attempts for retryable errors
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in normal operation)
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
        max_retries: usize,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint,
            model,
            api_key,
            max_retries,
        }
    }

    /// Send one prompt and return the completion text, retrying 429/5xx
    /// responses with exponential backoff.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.complete_internal(system, user).await {
                Ok(content) => return Ok(content),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    log::warn!(
                        "Retry {}/{} after error: {}",
                        attempt + 1,
                        self.max_retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn complete_internal(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user.to_string(),
                },
            ],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let mut req = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req
            .send()
            .await
            .map_err(|e| KgForgeError::Llm(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(KgForgeError::Llm(format!("API error {}: {}", status, body)));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| KgForgeError::Llm(format!("Failed to parse response: {}", e)))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| KgForgeError::Llm("Empty response from chat API".to_string()))
    }
}

fn is_retryable(e: &KgForgeError) -> bool {
    let msg = e.to_string();
    msg.contains("429")
        || msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("504")
}

/// Strip the Markdown code fences models sometimes wrap around JSON output.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn parse_entities(payload: &str) -> Result<Vec<String>> {
    serde_json::from_str(payload)
        .map_err(|e| KgForgeError::Llm(format!("Malformed entity payload: {}", e)))
}

fn parse_triples(payload: &str) -> Result<Vec<Triple>> {
    let raw: Vec<(String, String, String)> = serde_json::from_str(payload)
        .map_err(|e| KgForgeError::Llm(format!("Malformed relation payload: {}", e)))?;
    Ok(raw
        .into_iter()
        .map(|(s, p, o)| Triple::new(s, p, o))
        .collect())
}

/// LLM-backed entity extraction with optional response caching
pub struct LlmEntityExtractor {
    llm: Arc<LlmClient>,
    cache: Option<Arc<ExtractionCache>>,
}

impl LlmEntityExtractor {
    pub fn new(llm: Arc<LlmClient>, cache: Option<Arc<ExtractionCache>>) -> Self {
        Self { llm, cache }
    }
}

#[async_trait]
impl EntityExtraction for LlmEntityExtractor {
    async fn extract_entities(&self, text: &str) -> Result<Vec<String>> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get("entities", text) {
                log::debug!("Extraction cache hit for entities");
                return parse_entities(&cached);
            }
        }

        let content = self
            .llm
            .complete(ENTITY_SYSTEM_PROMPT, &format!("Text:\n{}", text))
            .await?;
        let payload = strip_code_fences(&content);
        let entities = parse_entities(payload)?;

        if let Some(cache) = &self.cache {
            cache.put("entities", text, payload.to_string());
        }
        Ok(entities)
    }
}

/// LLM-backed relation extraction with optional response caching
pub struct LlmRelationExtractor {
    llm: Arc<LlmClient>,
    cache: Option<Arc<ExtractionCache>>,
}

impl LlmRelationExtractor {
    pub fn new(llm: Arc<LlmClient>, cache: Option<Arc<ExtractionCache>>) -> Self {
        Self { llm, cache }
    }
}

#[async_trait]
impl RelationExtraction for LlmRelationExtractor {
    async fn extract_relations(&self, text: &str, entities: &[String]) -> Result<Vec<Triple>> {
        let user = format!(
            "Known entities: {}\n\nText:\n{}",
            entities.join(", "),
            text
        );

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get("relations", &user) {
                log::debug!("Extraction cache hit for relations");
                return parse_triples(&cached);
            }
        }

        let content = self.llm.complete(RELATION_SYSTEM_PROMPT, &user).await?;
        let payload = strip_code_fences(&content);
        let triples = parse_triples(payload)?;

        if let Some(cache) = &self.cache {
            cache.put("relations", &user, payload.to_string());
        }
        Ok(triples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = LlmClient::new(
            "http://localhost:11434/v1".to_string(),
            "llama3".to_string(),
            None,
            Duration::from_secs(30),
            3,
        );
        assert_eq!(client.model, "llama3");
        assert_eq!(client.max_retries, 3);
    }

    #[test]
    fn test_strip_code_fences_plain() {
        assert_eq!(strip_code_fences(r#"["a","b"]"#), r#"["a","b"]"#);
    }

    #[test]
    fn test_strip_code_fences_json_fence() {
        let fenced = "```json\n[\"a\",\"b\"]\n```";
        assert_eq!(strip_code_fences(fenced), r#"["a","b"]"#);
    }

    #[test]
    fn test_strip_code_fences_bare_fence() {
        let fenced = "```\n[]\n```";
        assert_eq!(strip_code_fences(fenced), "[]");
    }

    #[test]
    fn test_parse_entities() {
        let entities = parse_entities(r#"["EntityA", "EntityB"]"#).unwrap();
        assert_eq!(entities, vec!["EntityA", "EntityB"]);
    }

    #[test]
    fn test_parse_entities_malformed() {
        let err = parse_entities("not json").unwrap_err();
        assert!(matches!(err, KgForgeError::Llm(_)));
    }

    #[test]
    fn test_parse_triples() {
        let triples =
            parse_triples(r#"[["EntityA", "influences", "EntityB"]]"#).unwrap();
        assert_eq!(triples, vec![Triple::new("EntityA", "influences", "EntityB")]);
    }

    #[test]
    fn test_parse_triples_wrong_arity() {
        let err = parse_triples(r#"[["EntityA", "influences"]]"#).unwrap_err();
        assert!(matches!(err, KgForgeError::Llm(_)));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(is_retryable(&KgForgeError::Llm(
            "API error 429 Too Many Requests: slow down".to_string()
        )));
        assert!(is_retryable(&KgForgeError::Llm(
            "API error 503 Service Unavailable: busy".to_string()
        )));
        assert!(!is_retryable(&KgForgeError::Llm(
            "API error 401 Unauthorized: bad key".to_string()
        )));
    }
}
