//! Error types for grammar loading and diagram construction.

use thiserror::Error;

/// Error type for the grammar loader. Grammar problems are configuration
/// bugs, so loading fails fast instead of limping into a parse.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// A production line without the `->` separator
    #[error("malformed production line: {0:?}")]
    MalformedProduction(String),

    /// An action marker that names no known action
    #[error("unknown action marker: {0:?}")]
    UnknownAction(String),

    /// A scope-frame action with a parameter outside {{f, s, c, t}}
    #[error("unknown scope-frame kind {kind:?} in action {action:?}")]
    UnknownFrameKind { action: String, kind: String },

    /// An action that requires a frame-kind parameter but got none
    #[error("action {0:?} requires a scope-frame parameter")]
    MissingFrameKind(String),

    /// An alternative consisting only of action markers
    #[error("alternative of {0:?} has no grammar symbol to carry its actions")]
    EmptyAlternative(String),

    /// A nonterminal with no FIRST line
    #[error("no FIRST set for nonterminal {0:?}")]
    MissingFirst(String),

    /// A nonterminal with no FOLLOW line
    #[error("no FOLLOW set for nonterminal {0:?}")]
    MissingFollow(String),

    /// The start symbol is absent
    #[error("grammar defines no {0:?} nonterminal")]
    MissingStart(String),

    /// A grammar asset file could not be read
    #[error("failed to read grammar asset {path}: {source}")]
    AssetUnreadable {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for grammar operations
pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
