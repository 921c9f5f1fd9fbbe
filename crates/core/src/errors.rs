//! Error types for the core crate

use thiserror::Error;

/// Errors raised while applying a fitted pipeline or handling model artifacts.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A referenced field does not exist in the record schema, or a value
    /// that should have been imputed upstream is still missing.
    #[error("schema error: {0}")]
    Schema(String),

    /// The artifact payload is unreadable, its checksum does not match,
    /// or its schema disagrees with the compiled-in column order.
    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),

    /// The artifact was written by a newer format revision than this
    /// build supports.
    #[error("unsupported artifact version {found} (supported: <= {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ModelError>;
