//! Error types for cell parameter handling

use thiserror::Error;

/// Errors raised while resolving or configuring a primitive cell
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// Name does not resolve to a catalogued primitive
    #[error("Unknown cell kind: {0}")]
    UnknownCell(String),

    /// LUT width outside the 2..=4 inputs the fabric provides
    #[error("Unsupported LUT width: {0} inputs")]
    LutWidth(u8),

    /// Truth table has bits set above the 2^N entries of the LUT
    #[error("Truth table {table:#x} does not fit a {inputs}-input LUT")]
    TruthTableWidth { inputs: u8, table: u32 },

    /// Parameter value could not be parsed for this cell
    #[error("Invalid value '{value}' for parameter {param} of {cell}")]
    InvalidParameter {
        cell: String,
        param: String,
        value: String,
    },

    /// Counter reload value does not fit the counter width
    #[error("Count value {value} exceeds {width}-bit counter range")]
    CountRange { width: u8, value: u32 },

    /// Kind used where a flip-flop is required
    #[error("{0} is not a flip-flop")]
    NotFlipFlop(String),

    /// Cell affects the enclosing system rather than a local signal
    #[error("{0} has no standalone behavioral model")]
    NotSimulatable(String),
}

/// Result type for cell operations
pub type Result<T> = std::result::Result<T, CellError>;
