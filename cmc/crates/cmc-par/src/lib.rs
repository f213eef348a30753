//! cmc-par - Parser (Syntactic Analyzer)
//!
//! ============================================================================
//! PARSING MODEL
//! ============================================================================
//!
//! This parser is LL(1)-driven recursive descent, but the procedures are not
//! hand-written: they are *transition diagrams*, one directed graph per
//! grammar nonterminal, loaded from three external text files at startup:
//!
//! - grammar.txt   productions `LHS -> rhs | rhs`, where a symbol starting
//!                 with `#` is a semantic-action marker, not grammar
//! - first.txt     `NAME tok tok ...` (the pseudo-terminal EPSILON marks a
//!                 nullable nonterminal)
//! - follow.txt    same shape
//!
//! GRAPH SHAPE:
//! ------------
//! Every alternative of a nonterminal is a chain of nodes sharing the same
//! first node; edges carry one grammar symbol each (terminal, nonterminal,
//! or epsilon). Action markers attach to the next real edge as its on_enter
//! list; markers trailing the alternative attach to the last edge as
//! on_exit. The node closing each chain is an accept node.
//!
//! EDGE SELECTION (the LL(1) rule):
//! --------------------------------
//! - epsilon edge:      matches iff lookahead ∈ FOLLOW(nonterminal)
//! - terminal edge t:   matches iff lookahead == t (case-insensitive)
//! - nonterminal edge X: matches iff lookahead ∈ FIRST(X), or X is nullable
//!                      and lookahead ∈ FOLLOW(X)
//!
//! PANIC-MODE RECOVERY:
//! --------------------
//! - lookahead is EOF:             report `Unexpected EOF` once, unwind
//! - lookahead not a sync token:   report `illegal X`, discard one token
//! - lookahead in FOLLOW:          report `missing e`, step past the edge
//!
//! ACTIONS:
//! --------
//! Action markers are parsed once, into a closed enum, when the grammar
//! loads; an unknown marker is a load error. During the walk the parser
//! fires actions into an [`action::ActionSink`]; the code generator
//! implements that trait and owns no reference back to the parser. The
//! symbol table travels alongside as a shared collaborator.

pub mod action;
pub mod diagram;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod tree;

pub use action::{Action, ActionSink, FrameKind, NullSink};
pub use diagram::{Edge, EdgeLabel, TdGraph};
pub use error::{GrammarError, GrammarResult};
pub use grammar::Grammar;
pub use parser::Parser;
pub use tree::ParseNode;
