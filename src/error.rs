//! Error types for the family chat orchestrator

use thiserror::Error;

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Error, Debug)]
pub enum OrchestratorError {

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Enrichment error: {0}")]
    EnrichmentError(String),

    #[error("Responder error: {0}")]
    ResponderError(String),

    #[error("Frame decode error: {0}")]
    FrameDecodeError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
