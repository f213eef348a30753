//! Error types for code generation.
//!
//! Action-level problems never abort a compilation: they are recorded on the
//! generator as defects and a placeholder operand keeps the emission going
//! (the parser may be in panic-mode recovery, and the artifacts must still
//! be written). Only exporting can fail hard.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for code generation.
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// An identifier with no usable symbol-table record
    #[error("no record for identifier '{0}'")]
    UnknownIdentifier(String),

    /// A lexeme with no opcode mapping reached push_operand
    #[error("no opcode for operator '{0}'")]
    UnknownOperator(String),

    /// An action needed more semantic-stack entries than were present
    #[error("semantic stack underflow in {0}")]
    StackUnderflow(&'static str),

    /// A semantic-stack entry of the wrong flavour for its consumer
    #[error("semantic stack holds no usable value for {0}")]
    StackMismatch(&'static str),

    /// The final jump patch found no slot or no main record
    #[error("no entry point to patch: {0}")]
    MissingEntryPoint(String),

    /// Writing the program text failed
    #[error("failed to export program to {path}: {source}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for code-generation operations
pub type Result<T> = std::result::Result<T, CodeGenError>;
