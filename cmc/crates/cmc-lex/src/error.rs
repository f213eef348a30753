//! Lexical error classes.
//!
//! The `Display` text of each variant is the literal message that appears in
//! `lexical_errors.txt`.

use thiserror::Error;

/// The four classified lexical errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    /// Letter directly following a digit run, e.g. `125a`
    #[error("Invalid number")]
    InvalidNumber,

    /// A byte with no role in the language alphabet
    #[error("Invalid input")]
    InvalidInput,

    /// `*/` encountered with no open comment
    #[error("Unmatched comment")]
    UnmatchedComment,

    /// End of input inside `/* ...`
    #[error("Unclosed comment")]
    UnclosedComment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_literal() {
        assert_eq!(LexError::InvalidNumber.to_string(), "Invalid number");
        assert_eq!(LexError::InvalidInput.to_string(), "Invalid input");
        assert_eq!(LexError::UnmatchedComment.to_string(), "Unmatched comment");
        assert_eq!(LexError::UnclosedComment.to_string(), "Unclosed comment");
    }
}
