//! cmc-lex - Lexical Analyzer
//!
//! ============================================================================
//! LEXICAL ANALYSIS
//! ============================================================================
//!
//! This crate turns a character stream into a token stream for a C-minus
//! style language, using a table-driven deterministic finite automaton.
//!
//! PIPELINE:
//! ---------
//! ```text
//! file bytes ──▶ [SourceBuffer] ──▶ [Dfa] ──▶ [Scanner] ──▶ tokens
//!                 chunk refills      128-col      longest       │
//!                 line tracking      table        match         ▼
//!                                               symbol table, reports
//! ```
//!
//! The DFA is total: every `(state, byte)` pair resolves to a state, with
//! unspecified edges falling through to a generic boundary trap. The scanner
//! walks the automaton one byte of lookahead at a time and emits a token the
//! moment the next step would leave an accepting state for a trap. That is
//! the whole longest-match rule: `==x` is `SYMBOL ==` then `ID x`, never two
//! `=` symbols.
//!
//! ERROR CLASSES:
//! --------------
//! - Invalid number     letter directly after a digit run (`125a`)
//! - Invalid input      any byte outside the language alphabet
//! - Unmatched comment  `*/` with no comment open
//! - Unclosed comment   end of input inside `/* ...`
//!
//! Recovery is local: at most the offending byte is consumed, the error is
//! logged with the partial lexeme, and scanning restarts. The parser never
//! hears about any of it.
//!
//! SIDE EFFECTS:
//! -------------
//! Besides tokens, the scanner feeds two collaborators as it goes: the
//! line-keyed token report and the scoped symbol table (every identifier and
//! keyword lexeme, inserted once).

pub mod buffer;
pub mod charset;
pub mod dfa;
pub mod dfa_builder;
pub mod error;
pub mod scanner;
pub mod symbol_table;

pub use buffer::SourceBuffer;
pub use dfa::{Dfa, State, START_STATE, TRAP_STATE};
pub use dfa_builder::build_dfa;
pub use error::LexError;
pub use scanner::Scanner;
pub use symbol_table::{Record, RecordKind, SymbolTable};
