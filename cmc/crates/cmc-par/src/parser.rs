//! The transition-diagram walker.
//!
//! One procedure serves every nonterminal: look up its diagram, pick the
//! alternative whose first edge matches the lookahead (the LL(1) rule), then
//! walk the chain, descending on nonterminal edges and consuming on terminal
//! edges. Actions fire on edge entry and exit; the sink decides what they
//! mean. Recovery is panic-mode with FOLLOW-set synchronisation.

use std::io::Read;

use cmc_lex::Scanner;
use cmc_util::{SyntaxErrorReport, Token};

use crate::action::{Action, ActionSink};
use crate::diagram::{Edge, EdgeLabel, TdGraph};
use crate::error::GrammarResult;
use crate::grammar::{Grammar, START_SYMBOL};
use crate::tree::ParseNode;

pub struct Parser<'a, R: Read> {
    grammar: &'a Grammar,
    graph: TdGraph,
    scanner: Scanner<R>,
    sink: &'a mut dyn ActionSink,
    current: Token,
    errors: SyntaxErrorReport,
    eof_reported: bool,
}

impl<'a, R: Read> Parser<'a, R> {
    pub fn new(
        grammar: &'a Grammar,
        scanner: Scanner<R>,
        sink: &'a mut dyn ActionSink,
    ) -> GrammarResult<Self> {
        let graph = TdGraph::build(grammar)?;
        Ok(Self {
            grammar,
            graph,
            scanner,
            sink,
            current: Token::eof(1),
            errors: SyntaxErrorReport::new(),
            eof_reported: false,
        })
    }

    /// Parses the whole input, returning the parse tree. Syntax errors are
    /// collected, never thrown; the tree covers whatever recovery produced.
    pub fn parse(&mut self) -> ParseNode {
        self.advance();
        let mut root = ParseNode::new(START_SYMBOL);
        self.parse_nonterminal(START_SYMBOL, &mut root);
        root
    }

    fn advance(&mut self) {
        // The scanner already discards whitespace and comments.
        self.current = self.scanner.next_token();
    }

    fn fire(&mut self, actions: &[Action]) {
        let line = self.scanner.line();
        for &action in actions {
            tracing::trace!(?action, token = %self.current, "action");
            self.sink
                .run(action, &self.current, line, self.scanner.symbol_table_mut());
        }
    }

    fn edge_match(&self, label: &EdgeLabel, nonterminal: &str, look: &str) -> bool {
        match label {
            EdgeLabel::Epsilon => self.grammar.follow_contains(nonterminal, look),
            EdgeLabel::Terminal(t) => t.eq_ignore_ascii_case(look),
            EdgeLabel::NonTerminal(x) => {
                self.grammar.first_contains(x, look)
                    || (self.grammar.nullable(x) && self.grammar.follow_contains(x, look))
            }
        }
    }

    /// Traverses one matched edge: actions, parse-tree growth, input.
    fn take_edge(&mut self, edge: &Edge, parent: &mut ParseNode) {
        self.fire(&edge.on_enter);
        match &edge.label {
            EdgeLabel::Epsilon => {
                parent.add_child(ParseNode::new("epsilon"));
            }
            EdgeLabel::Terminal(_) => {
                self.fire(&edge.on_exit);
                parent.add_child(ParseNode::new(self.leaf_label()));
                self.advance();
            }
            EdgeLabel::NonTerminal(name) => {
                let name = name.clone();
                let mut child = ParseNode::new(name.clone());
                self.parse_nonterminal(&name, &mut child);
                parent.add_child(child);
                self.fire(&edge.on_exit);
            }
        }
    }

    fn parse_nonterminal(&mut self, nonterminal: &str, parent: &mut ParseNode) -> bool {
        let Some(entry) = self.graph.entry(nonterminal) else {
            return false;
        };
        tracing::trace!(nonterminal, look = %self.current.grammar_symbol(), "descend");
        let mut node_id = entry;

        // Alternative selection: nonterminals with several productions pick
        // the one matching the lookahead.
        if self.graph.node(entry).edges.len() > 1 {
            let edges = self.graph.node(entry).edges.clone();
            let look = self.current.grammar_symbol().to_string();
            let chosen = edges.iter().find(|e| self.edge_match(&e.label, nonterminal, &look));
            match chosen {
                Some(edge) => {
                    self.take_edge(edge, parent);
                    node_id = edge.dest;
                }
                None => {
                    if look == "$" {
                        self.report_eof();
                        return true;
                    }
                    if !self.grammar.follow_contains(nonterminal, &look) {
                        self.errors.add(self.current.line, format!("illegal {look}"));
                        self.advance();
                        // Continue below with this nonterminal's first chain.
                    } else {
                        self.errors
                            .add(self.current.line, format!("missing {nonterminal}"));
                        return false;
                    }
                }
            }
        }

        // Chain walk to the accept node.
        loop {
            if self.graph.node(node_id).is_accept {
                return true;
            }
            let Some(edge) = self.graph.node(node_id).edges.first().cloned() else {
                return true;
            };
            let look = self.current.grammar_symbol().to_string();

            if self.edge_match(&edge.label, nonterminal, &look) {
                self.take_edge(&edge, parent);
                node_id = edge.dest;
                continue;
            }

            // Panic-mode recovery.
            if look == "$" {
                self.report_eof();
                return true;
            }
            let synced = match &edge.label {
                EdgeLabel::NonTerminal(x) => self.grammar.follow_contains(x, &look),
                _ => self.grammar.follow_contains(nonterminal, &look),
            };
            if !synced {
                self.errors.add(self.current.line, format!("illegal {look}"));
                self.advance();
            } else {
                let expected = match &edge.label {
                    EdgeLabel::Terminal(t) => t.as_str(),
                    EdgeLabel::NonTerminal(x) => x.as_str(),
                    EdgeLabel::Epsilon => "epsilon",
                };
                self.errors
                    .add(self.current.line, format!("missing {expected}"));
                node_id = edge.dest;
            }
        }
    }

    fn report_eof(&mut self) {
        if !self.eof_reported {
            self.eof_reported = true;
            self.errors.add(self.scanner.line(), "Unexpected EOF");
        }
    }

    fn leaf_label(&self) -> String {
        if self.current.is_eof() {
            "$".to_string()
        } else {
            format!("{} ", self.current)
        }
    }

    pub fn syntax_errors(&self) -> &SyntaxErrorReport {
        &self.errors
    }

    pub fn scanner(&self) -> &Scanner<R> {
        &self.scanner
    }

    /// Hands the scanner (with its reports and symbol table) and the syntax
    /// errors back to the caller once parsing is done.
    pub fn into_parts(self) -> (Scanner<R>, SyntaxErrorReport) {
        (self.scanner, self.errors)
    }
}
