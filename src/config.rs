use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gather: GatherConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Text-source configuration for the data-gatherer stage
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatherConfig {
    #[serde(default)]
    pub source: SourceKind,
    /// Path to a UTF-8 text file; required when `source = "file"`.
    #[serde(default)]
    pub text_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Placeholder,
    File,
}

/// Extraction backend selection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Pattern,
    Llm,
}

/// Chat-completions settings for the LLM extraction backend
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key. Leave unset for endpoints
    /// that do not require auth (e.g. local Ollama).
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Extraction-response cache size; 0 disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> usize {
    3
}

fn default_cache_capacity() -> usize {
    1000
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KGFORGE_CONFIG environment variable
    /// 2. ./kgforge.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KGFORGE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("kgforge.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse kgforge.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.gather.source == SourceKind::File {
            match &self.gather.text_path {
                None => anyhow::bail!(
                    "gather.text_path must be set when gather.source = \"file\""
                ),
                Some(path) if !path.is_file() => anyhow::bail!(
                    "gather.text_path does not exist or is not a file: {}",
                    path.display()
                ),
                _ => {}
            }
        }

        if self.extraction.backend == BackendKind::Llm {
            if self.llm.endpoint.is_empty() {
                anyhow::bail!("llm.endpoint must not be empty");
            }
            if self.llm.timeout_ms == 0 {
                anyhow::bail!("llm.timeout_ms must be greater than 0");
            }
            // Check both environment variable and .env file (dotenv already loaded in Config::load)
            if let Some(var) = &self.llm.api_key_env {
                std::env::var(var).with_context(|| {
                    format!(
                        "Environment variable {} not set. Set it in your .env file or as an environment variable.",
                        var
                    )
                })?;
            }
        }

        Ok(())
    }
}
