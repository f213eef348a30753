//! Token types shared between the scanner and the parser.

use std::fmt;

/// Classification of a scanned lexeme.
///
/// `Whitespace` and `Comment` are produced by the DFA but discarded before
/// parsing; `Eof` terminates the stream exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Id,
    Num,
    Symbol,
    Whitespace,
    Comment,
    Eof,
}

impl TokenKind {
    /// Returns true for the classes the parser never sees.
    pub fn is_skipped(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Id => "ID",
            TokenKind::Num => "NUM",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Whitespace => "WHITE",
            TokenKind::Comment => "COMMENT",
            TokenKind::Eof => "$",
        };
        f.write_str(name)
    }
}

/// A single token: classification, raw text, and the source line it started on.
///
/// Line numbers are 1-based and refer to the line of the token's first
/// character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// The end-of-input marker. Its lexeme prints as `$` in every report.
    pub fn eof(line: u32) -> Self {
        Self::new(TokenKind::Eof, "$", line)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// The symbol the parser matches grammar edges against: the lexeme for
    /// keywords and symbols (so the grammar can say `if` or `;` directly),
    /// the class name for everything else (`ID`, `NUM`, `$`).
    pub fn grammar_symbol(&self) -> &str {
        match self.kind {
            TokenKind::Keyword | TokenKind::Symbol => &self.lexeme,
            TokenKind::Id => "ID",
            TokenKind::Num => "NUM",
            TokenKind::Eof => "$",
            TokenKind::Whitespace => "WHITE",
            TokenKind::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for Token {
    /// Tokens print in the report form `(CLASS, lexeme)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.kind, self.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_report_format() {
        let tok = Token::new(TokenKind::Keyword, "void", 1);
        assert_eq!(tok.to_string(), "(KEYWORD, void)");
        let num = Token::new(TokenKind::Num, "42", 3);
        assert_eq!(num.to_string(), "(NUM, 42)");
    }

    #[test]
    fn grammar_symbol_unifies_classes() {
        assert_eq!(Token::new(TokenKind::Keyword, "if", 1).grammar_symbol(), "if");
        assert_eq!(Token::new(TokenKind::Symbol, ";", 1).grammar_symbol(), ";");
        assert_eq!(Token::new(TokenKind::Id, "main", 1).grammar_symbol(), "ID");
        assert_eq!(Token::new(TokenKind::Num, "7", 1).grammar_symbol(), "NUM");
        assert_eq!(Token::eof(9).grammar_symbol(), "$");
    }

    #[test]
    fn skipped_kinds() {
        assert!(TokenKind::Whitespace.is_skipped());
        assert!(TokenKind::Comment.is_skipped());
        assert!(!TokenKind::Id.is_skipped());
    }
}
