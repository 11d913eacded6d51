//! Error types for the planning core
//!
//! Data conditions (no training data, untrained model, unseen categories) are
//! not errors; they are reported through `TrainingOutcome` and `Prediction`.
//! Only infrastructure faults end up here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Artifact store I/O error for '{key}': {source}")]
    ArtifactIo {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact '{key}' could not be decoded: {source}")]
    ArtifactDecode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact encoding error: {0}")]
    ArtifactEncode(#[from] serde_json::Error),

    #[error("Artifact '{0}' failed checksum verification")]
    CorruptArtifact(String),

    #[error("Artifact '{key}' has format version {found}, expected {expected}")]
    IncompatibleArtifact {
        key: String,
        found: u32,
        expected: u32,
    },

    #[error("Invalid artifact key: {0}")]
    InvalidKey(String),
}

/// Result alias for the planning core
pub type PlannerResult<T> = Result<T, PlannerError>;
