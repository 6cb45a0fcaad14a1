//! Error types for the synthesis pipeline

use crate::stage::Stage;
use thiserror::Error;

/// Errors that abort a synthesis run
///
/// None of these are recoverable locally: mutations already applied by
/// completed operations stay in place.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A sub-selection is active on the design
    #[error("This command only operates on fully selected designs")]
    Selection,

    /// Target part is not one of the supported devices
    #[error("Invalid part name: '{0}'")]
    InvalidPart(String),

    /// `-run` argument without the `:` separating its labels
    #[error("Malformed run range '{0}': expected <from_label>:<to_label>")]
    MalformedRange(String),

    /// An invoked transform reported failure
    #[error("Transform '{operation}' failed in stage {stage}: {reason}")]
    Transform {
        stage: Stage,
        operation: String,
        #[source]
        reason: InvokeError,
    },

    /// The synthesis engine failed outside any pipeline operation
    #[error("Synthesis engine failed: {0}")]
    Engine(#[source] InvokeError),

    /// Configuration file could not be interpreted
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a transform invoker
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The transform ran and rejected the design
    #[error("{0}")]
    Failed(String),

    /// The external tool could not be started
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
