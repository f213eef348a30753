//! Grammar, FIRST, and FOLLOW loading.
//!
//! The three asset files ship inside the crate and load through
//! [`Grammar::builtin`]; external files (the same formats) can be supplied
//! instead, which is how the original toolchain consumed them.

use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::action::Action;
use crate::error::{GrammarError, GrammarResult};

/// The nonterminal every parse starts from.
pub const START_SYMBOL: &str = "Program";

/// The pseudo-terminal marking nullability inside FIRST sets.
pub const EPSILON: &str = "EPSILON";

/// One right-hand-side element: a grammar symbol or an action marker.
#[derive(Debug, Clone, PartialEq)]
pub enum RhsItem {
    Symbol(String),
    Action(Action),
}

/// A fully loaded, validated grammar.
#[derive(Debug)]
pub struct Grammar {
    productions: IndexMap<String, Vec<Vec<RhsItem>>>,
    terminals: FxHashSet<String>,
    firsts: FxHashMap<String, FxHashSet<String>>,
    follows: FxHashMap<String, FxHashSet<String>>,
}

impl Grammar {
    /// The grammar shipped with the compiler.
    pub fn builtin() -> GrammarResult<Self> {
        Self::parse(
            include_str!("../grammar/grammar.txt"),
            include_str!("../grammar/first.txt"),
            include_str!("../grammar/follow.txt"),
        )
    }

    /// Loads the three asset files from disk.
    pub fn from_files(grammar: &Path, first: &Path, follow: &Path) -> GrammarResult<Self> {
        let read = |path: &Path| -> GrammarResult<String> {
            std::fs::read_to_string(path).map_err(|source| GrammarError::AssetUnreadable {
                path: path.to_path_buf(),
                source,
            })
        };
        Self::parse(&read(grammar)?, &read(first)?, &read(follow)?)
    }

    /// Parses and validates grammar text plus its FIRST/FOLLOW tables.
    pub fn parse(grammar_src: &str, first_src: &str, follow_src: &str) -> GrammarResult<Self> {
        let mut productions: IndexMap<String, Vec<Vec<RhsItem>>> = IndexMap::new();
        let mut rhs_symbols: FxHashSet<String> = FxHashSet::default();

        for line in grammar_src.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (lhs, rhs) = line
                .split_once("->")
                .ok_or_else(|| GrammarError::MalformedProduction(line.to_string()))?;
            let lhs = lhs.trim().to_string();
            for alternative in rhs.split('|') {
                let mut items = Vec::new();
                let mut has_symbol = false;
                for word in alternative.split_whitespace() {
                    if let Some(marker) = word.strip_prefix('#') {
                        items.push(RhsItem::Action(Action::parse(marker)?));
                    } else {
                        has_symbol = true;
                        rhs_symbols.insert(word.to_string());
                        items.push(RhsItem::Symbol(word.to_string()));
                    }
                }
                if !has_symbol {
                    return Err(GrammarError::EmptyAlternative(lhs.clone()));
                }
                productions
                    .entry(lhs.clone())
                    .or_insert_with(Vec::new)
                    .push(items);
            }
        }

        if !productions.contains_key(START_SYMBOL) {
            return Err(GrammarError::MissingStart(START_SYMBOL.to_string()));
        }

        // A terminal is an RHS symbol that is never an LHS (and EPSILON is
        // neither: it marks the empty edge).
        let terminals: FxHashSet<String> = rhs_symbols
            .into_iter()
            .filter(|s| s != EPSILON && !productions.contains_key(s))
            .collect();

        let firsts = parse_sets(first_src);
        let follows = parse_sets(follow_src);
        for nonterminal in productions.keys() {
            if !firsts.contains_key(nonterminal) {
                return Err(GrammarError::MissingFirst(nonterminal.clone()));
            }
            if !follows.contains_key(nonterminal) {
                return Err(GrammarError::MissingFollow(nonterminal.clone()));
            }
        }

        Ok(Self {
            productions,
            terminals,
            firsts,
            follows,
        })
    }

    pub fn productions(&self) -> impl Iterator<Item = (&str, &[Vec<RhsItem>])> {
        self.productions
            .iter()
            .map(|(lhs, alts)| (lhs.as_str(), alts.as_slice()))
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.productions.contains_key(symbol)
    }

    pub fn first_contains(&self, nonterminal: &str, symbol: &str) -> bool {
        self.firsts
            .get(nonterminal)
            .is_some_and(|set| set.contains(symbol))
    }

    pub fn follow_contains(&self, nonterminal: &str, symbol: &str) -> bool {
        self.follows
            .get(nonterminal)
            .is_some_and(|set| set.contains(symbol))
    }

    /// True when EPSILON is in the nonterminal's FIRST set.
    pub fn nullable(&self, nonterminal: &str) -> bool {
        self.first_contains(nonterminal, EPSILON)
    }
}

fn parse_sets(src: &str) -> FxHashMap<String, FxHashSet<String>> {
    let mut sets = FxHashMap::default();
    for line in src.lines() {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else { continue };
        sets.insert(
            name.to_string(),
            words.map(str::to_string).collect::<FxHashSet<_>>(),
        );
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::FrameKind;

    #[test]
    fn builtin_grammar_loads() {
        let grammar = Grammar::builtin().unwrap();
        assert!(grammar.is_nonterminal("Program"));
        assert!(grammar.is_nonterminal("Fun-declaration-prime"));
        assert!(grammar.is_terminal("ID"));
        assert!(grammar.is_terminal(";"));
        assert!(grammar.is_terminal("$"));
        assert!(!grammar.is_terminal(EPSILON));
    }

    #[test]
    fn builtin_sets_are_consistent() {
        let grammar = Grammar::builtin().unwrap();
        assert!(grammar.first_contains("Expression", "ID"));
        assert!(grammar.nullable("Declaration-list"));
        assert!(!grammar.nullable("Declaration"));
        assert!(grammar.follow_contains("Expression", ";"));
        assert!(grammar.follow_contains("Statement", "else"));
    }

    #[test]
    fn actions_resolve_at_load_time() {
        let grammar = Grammar::builtin().unwrap();
        let (_, alternatives) = grammar
            .productions()
            .find(|(lhs, _)| *lhs == "Fun-declaration-prime")
            .unwrap();
        assert!(alternatives[0]
            .iter()
            .any(|item| *item == RhsItem::Action(Action::ScopeStart(FrameKind::Function))));
    }

    #[test]
    fn unknown_action_is_a_load_error() {
        let err = Grammar::parse("S -> #bogus x", "S x", "S $").unwrap_err();
        assert!(matches!(err, GrammarError::UnknownAction(_)));
    }

    #[test]
    fn action_only_alternative_is_rejected() {
        let err = Grammar::parse("S -> x | #pop", "S x EPSILON", "S $").unwrap_err();
        assert!(matches!(err, GrammarError::EmptyAlternative(_)));
    }

    #[test]
    fn missing_sets_are_rejected() {
        assert!(matches!(
            Grammar::parse("Program -> x", "", "Program $"),
            Err(GrammarError::MissingFirst(_))
        ));
        assert!(matches!(
            Grammar::parse("Program -> x", "Program x", ""),
            Err(GrammarError::MissingFollow(_))
        ));
    }

    #[test]
    fn missing_start_symbol_is_rejected() {
        assert!(matches!(
            Grammar::parse("S -> x", "S x", "S $"),
            Err(GrammarError::MissingStart(_))
        ));
    }
}
