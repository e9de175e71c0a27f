use thiserror::Error;

/// Main error type for kgforge
#[derive(Error, Debug)]
pub enum KgForgeError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction backend errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// LLM API errors
    #[error("LLM API error: {0}")]
    Llm(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unrecognized stage name
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// Pipeline state errors (a stage was invoked without its prior stage's output)
    #[error("Pipeline state error: {0}")]
    State(String),
}

/// Convenient Result type using KgForgeError
pub type Result<T> = std::result::Result<T, KgForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KgForgeError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let kg_err: KgForgeError = io_err.into();
        assert!(matches!(kg_err, KgForgeError::Io(_)));
    }

    #[test]
    fn test_unknown_stage_display() {
        let err = KgForgeError::UnknownStage("frobnicator".to_string());
        assert_eq!(err.to_string(), "Unknown stage: frobnicator");
    }
}
