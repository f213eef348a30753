//! Constructs the language's scanner automaton.
//!
//! The topology, state for state:
//!
//! ```text
//! START ──digit──▶ NUM* ──digit──▶ NUM*          (letter ⇒ invalid-number)
//! START ──letter─▶ ID*  ──letter/digit──▶ ID*
//! START ──sym────▶ SYMBOL*                       (one state per plain symbol)
//! START ──'='────▶ EQ* ──'='──▶ EQEQ*
//! START ──'*'────▶ STAR*        ──'/'──▶ unmatched-comment
//! START ──'/'────▶ SLASH*       ──'*'──▶ inner ──'*'──▶ star_seen ──'/'──▶ closed*
//! START ──ws─────▶ WHITE*                        (one state per whitespace byte)
//! START ──other──▶ invalid-input
//! ```
//!
//! Starred states accept. `inner` and `star_seen` are ordinary states that
//! report an unclosed comment if the input ends in them; anything but `/`
//! out of `star_seen` falls back to the body, a repeated `*` included, so
//! `/***/` reads as a still-open comment.

use cmc_util::TokenKind;

use crate::charset::{bytes_where, is_digit, is_illegal, is_letter, is_symbol, is_whitespace};
use crate::dfa::{Dfa, State, START_STATE};
use crate::error::LexError;

/// Builds the full scanner DFA.
pub fn build_dfa() -> Dfa {
    let mut dfa = Dfa::new();

    let digits = bytes_where(is_digit);
    let letters = bytes_where(is_letter);
    let whitespace = bytes_where(is_whitespace);
    let symbols = bytes_where(is_symbol);
    let illegal = bytes_where(is_illegal);
    let sigma = bytes_where(|_| true);
    let except = |set: &[u8], out: &[u8]| -> Vec<u8> {
        set.iter().copied().filter(|b| !out.contains(b)).collect()
    };

    // Shared error traps.
    let invalid_number = dfa.add_state(State::trap(LexError::InvalidNumber));
    let invalid_input = dfa.add_state(State::trap(LexError::InvalidInput));
    dfa.set_high_byte_target(invalid_input);

    // NUM
    let number = dfa.add_state(State::accept(TokenKind::Num));
    dfa.add_edge(START_STATE, number, digits.clone());
    dfa.add_edge(number, number, digits.clone());
    dfa.add_edge(number, invalid_number, letters.clone());
    dfa.add_edge(number, invalid_input, illegal.clone());

    // Plain single-byte symbols: everything except the three that need
    // lookahead handling.
    for &symbol in &except(&symbols, &[b'*', b'/', b'=']) {
        let state = dfa.add_state(State::accept(TokenKind::Symbol));
        dfa.add_edge(START_STATE, state, [symbol]);
    }

    // '*' stands alone unless a '/' follows, which is a stray comment close.
    let star = dfa.add_state(State::accept(TokenKind::Symbol));
    let unmatched = dfa.add_state(State::trap(LexError::UnmatchedComment));
    dfa.add_edge(START_STATE, star, [b'*']);
    dfa.add_edge(star, unmatched, [b'/']);
    dfa.add_edge(star, invalid_input, illegal.clone());

    // '=' and '=='.
    let eq = dfa.add_state(State::accept(TokenKind::Symbol));
    let eq_eq = dfa.add_state(State::accept(TokenKind::Symbol));
    dfa.add_edge(START_STATE, eq, [b'=']);
    dfa.add_edge(eq, eq_eq, [b'=']);
    dfa.add_edge(eq, invalid_input, illegal.clone());

    // '/' stands alone unless a '*' opens a comment body.
    let slash = dfa.add_state(State::accept(TokenKind::Symbol));
    let inner = dfa.add_state(State::pending(LexError::UnclosedComment));
    let star_seen = dfa.add_state(State::pending(LexError::UnclosedComment));
    let closed = dfa.add_state(State::accept(TokenKind::Comment));
    dfa.add_edge(START_STATE, slash, [b'/']);
    dfa.add_edge(slash, invalid_input, illegal.clone());
    dfa.add_edge(slash, inner, [b'*']);
    dfa.add_edge(inner, inner, except(&sigma, &[b'*']));
    dfa.add_edge(inner, star_seen, [b'*']);
    dfa.add_edge(star_seen, inner, except(&sigma, &[b'/']));
    dfa.add_edge(star_seen, closed, [b'/']);

    // Whitespace, one accepting state per byte.
    for &ws in &whitespace {
        let state = dfa.add_state(State::accept(TokenKind::Whitespace));
        dfa.add_edge(START_STATE, state, [ws]);
    }

    // ID / KEYWORD (the scanner reclassifies reserved words afterwards).
    let ident = dfa.add_state(State::accept(TokenKind::Id));
    dfa.add_edge(START_STATE, ident, letters.clone());
    dfa.add_edge(ident, ident, letters);
    dfa.add_edge(ident, ident, digits);
    dfa.add_edge(ident, invalid_input, illegal.clone());

    // Anything else straight from the start state is invalid input.
    dfa.add_edge(START_STATE, invalid_input, illegal);

    dfa
}
