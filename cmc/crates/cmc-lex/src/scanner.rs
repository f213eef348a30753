//! The scanner: drives the DFA over the buffered source.
//!
//! Longest-match rule: keep stepping while the next byte leads anywhere
//! useful; the moment it would lead from an accepting state into the
//! boundary trap, emit the token for the state we are in and leave the byte
//! unread. Error traps instead consume the offending byte, log, and restart.
//!
//! Side effects per emitted token: the token report (whitespace and comments
//! excluded) and the symbol table (identifier and keyword lexemes).

use std::io::Read;

use cmc_util::{LexicalErrorReport, Token, TokenKind, TokenReport};

use crate::buffer::SourceBuffer;
use crate::charset::is_keyword;
use crate::dfa::Dfa;
use crate::dfa_builder::build_dfa;
use crate::error::LexError;
use crate::symbol_table::SymbolTable;

/// How much of an unclosed comment's opener the error log keeps.
const UNCLOSED_PREFIX_LEN: usize = 7;

pub struct Scanner<R: Read> {
    buffer: SourceBuffer<R>,
    dfa: Dfa,
    symbols: SymbolTable,
    tokens: TokenReport,
    errors: LexicalErrorReport,
    done: bool,
}

impl<'a> Scanner<&'a [u8]> {
    /// Scans an in-memory source, mostly for tests.
    pub fn from_str(source: &'a str) -> Self {
        Self::new(SourceBuffer::from_str(source))
    }
}

impl<R: Read> Scanner<R> {
    pub fn new(buffer: SourceBuffer<R>) -> Self {
        Self {
            buffer,
            dfa: build_dfa(),
            symbols: SymbolTable::new(),
            tokens: TokenReport::new(),
            errors: LexicalErrorReport::new(),
            done: false,
        }
    }

    /// The next parser-visible token; `Eof` forever once the input ends.
    /// Whitespace and comments are consumed and discarded here.
    pub fn next_token(&mut self) -> Token {
        loop {
            if self.done || !self.buffer.has_next() {
                self.done = true;
                return Token::eof(self.buffer.line());
            }

            self.dfa.reset();
            let mut lexeme = String::new();
            // Unwrap is safe: has_next above.
            let start_line = self.buffer.peek().map(|(_, line)| line).unwrap_or(1);

            loop {
                let Some((byte, _)) = self.buffer.peek() else {
                    // Input ended mid-token.
                    let state = *self.dfa.current_state();
                    if !state.is_accepting() {
                        if let Some(error) = state.error {
                            // An open comment; keep only the head of it.
                            self.errors
                                .add(start_line, truncate(&lexeme), error.to_string());
                            self.done = true;
                            return Token::eof(self.buffer.line());
                        }
                        // Start state with nothing pending: plain EOF.
                        self.done = true;
                        return Token::eof(self.buffer.line());
                    }
                    match state.accept {
                        Some(class) if !class.is_skipped() => {
                            return self.finish(class, lexeme, start_line);
                        }
                        _ => break, // trailing whitespace or comment
                    }
                };

                let next = *self.dfa.state(self.dfa.peek_step(byte));

                if next.is_error_trap() {
                    // Consume the offending byte, log, restart scanning.
                    self.buffer.advance();
                    lexeme.push(byte as char);
                    let error = next.error.unwrap_or(LexError::InvalidInput);
                    self.errors.add(start_line, lexeme, error.to_string());
                    break;
                }

                if next.trap {
                    let state = *self.dfa.current_state();
                    match state.accept {
                        Some(class) if class.is_skipped() => break,
                        Some(class) => return self.finish(class, lexeme, start_line),
                        // Unreachable with the shipped DFA; consume one byte
                        // so scanning always makes progress.
                        None => {
                            self.buffer.advance();
                            self.errors.add(
                                start_line,
                                (byte as char).to_string(),
                                LexError::InvalidInput.to_string(),
                            );
                            break;
                        }
                    }
                }

                self.dfa.step(byte);
                self.buffer.advance();
                lexeme.push(byte as char);
            }
        }
    }

    /// Classification, reporting, and symbol-table feeding for one token.
    fn finish(&mut self, class: TokenKind, lexeme: String, line: u32) -> Token {
        let kind = if class == TokenKind::Id && is_keyword(&lexeme) {
            TokenKind::Keyword
        } else {
            class
        };
        let token = Token::new(kind, lexeme, line);
        if matches!(kind, TokenKind::Id | TokenKind::Keyword) {
            self.symbols.insert(&token);
        }
        self.tokens.add(token.clone());
        token
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbol_table_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn token_report(&self) -> &TokenReport {
        &self.tokens
    }

    pub fn error_report(&self) -> &LexicalErrorReport {
        &self.errors
    }

    /// The line the next unread byte belongs to.
    pub fn line(&self) -> u32 {
        self.buffer.line()
    }

    /// Tears the scanner apart so the driver can save the artifacts.
    pub fn into_parts(self) -> (SymbolTable, TokenReport, LexicalErrorReport) {
        (self.symbols, self.tokens, self.errors)
    }
}

fn truncate(lexeme: &str) -> String {
    if lexeme.chars().count() > UNCLOSED_PREFIX_LEN {
        let head: String = lexeme.chars().take(UNCLOSED_PREFIX_LEN).collect();
        format!("{head}...")
    } else {
        lexeme.to_string()
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Error-free sources: tokens separated by a space.
    fn token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z][a-z0-9]{0,6}",
            "[0-9]{1,5}",
            Just(";".to_string()),
            Just("==".to_string()),
            Just("=".to_string()),
            Just("+".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
        ]
    }

    proptest! {
        /// Concatenated lexemes equal the source minus whitespace.
        #[test]
        fn round_trip(tokens in proptest::collection::vec(token_strategy(), 0..24)) {
            let source = tokens.join(" ");
            let mut scanner = Scanner::from_str(&source);
            let mut rebuilt = String::new();
            loop {
                let token = scanner.next_token();
                if token.is_eof() {
                    break;
                }
                rebuilt.push_str(&token.lexeme);
            }
            prop_assert!(!scanner.error_report().has_errors());
            prop_assert_eq!(rebuilt, source.replace(' ', ""));
        }

        /// Reserved words always come back as keywords.
        #[test]
        fn keyword_precedence(index in 0usize..7) {
            let word = crate::charset::KEYWORDS[index];
            let mut scanner = Scanner::from_str(word);
            let token = scanner.next_token();
            prop_assert_eq!(token.kind, TokenKind::Keyword);
            prop_assert_eq!(token.lexeme, word);
        }
    }
}
