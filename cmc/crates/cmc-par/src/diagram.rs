//! Transition-diagram construction.
//!
//! One graph per nonterminal: every alternative is a chain of nodes hanging
//! off the nonterminal's shared entry node. Pending action markers ride on
//! the next real edge as `on_enter`; markers after the last real symbol
//! become that edge's `on_exit`. The node that closes a chain accepts.

use rustc_hash::FxHashMap;

use crate::action::Action;
use crate::error::GrammarResult;
use crate::grammar::{Grammar, RhsItem, EPSILON};

/// What an edge consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLabel {
    Terminal(String),
    NonTerminal(String),
    Epsilon,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub label: EdgeLabel,
    pub dest: usize,
    pub on_enter: Vec<Action>,
    pub on_exit: Vec<Action>,
}

#[derive(Debug)]
pub struct Node {
    pub edges: Vec<Edge>,
    pub is_accept: bool,
}

/// All transition diagrams, indexed flat; `entry` maps each nonterminal to
/// its shared first node.
#[derive(Debug)]
pub struct TdGraph {
    nodes: Vec<Node>,
    entry: FxHashMap<String, usize>,
}

impl TdGraph {
    /// Builds every diagram from a loaded grammar.
    pub fn build(grammar: &Grammar) -> GrammarResult<Self> {
        let mut graph = Self {
            nodes: Vec::new(),
            entry: FxHashMap::default(),
        };

        for (lhs, alternatives) in grammar.productions() {
            let entry = graph.add_node(false);
            graph.entry.insert(lhs.to_string(), entry);

            for alternative in alternatives {
                let mut current = entry;
                let mut pending: Vec<Action> = Vec::new();
                let mut last_edge: Option<(usize, usize)> = None;

                let accept_index = alternative
                    .iter()
                    .rposition(|item| matches!(item, RhsItem::Symbol(_)));

                for (index, item) in alternative.iter().enumerate() {
                    match item {
                        RhsItem::Action(action) => pending.push(*action),
                        RhsItem::Symbol(symbol) => {
                            let accept = Some(index) == accept_index;
                            let dest = graph.add_node(accept);
                            let label = if symbol == EPSILON {
                                EdgeLabel::Epsilon
                            } else if grammar.is_nonterminal(symbol) {
                                EdgeLabel::NonTerminal(symbol.clone())
                            } else {
                                EdgeLabel::Terminal(symbol.clone())
                            };
                            let edge_index = graph.nodes[current].edges.len();
                            graph.nodes[current].edges.push(Edge {
                                label,
                                dest,
                                on_enter: std::mem::take(&mut pending),
                                on_exit: Vec::new(),
                            });
                            last_edge = Some((current, edge_index));
                            current = dest;
                        }
                    }
                }

                if !pending.is_empty() {
                    // Trailing actions; the loader guarantees a real edge
                    // exists to carry them.
                    if let Some((node, edge)) = last_edge {
                        graph.nodes[node].edges[edge].on_exit = pending;
                    }
                }
            }
        }

        Ok(graph)
    }

    fn add_node(&mut self, is_accept: bool) -> usize {
        self.nodes.push(Node {
            edges: Vec::new(),
            is_accept,
        });
        self.nodes.len() - 1
    }

    pub fn entry(&self, nonterminal: &str) -> Option<usize> {
        self.entry.get(nonterminal).copied()
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::FrameKind;
    use crate::grammar::Grammar;

    fn tiny(grammar: &str, first: &str, follow: &str) -> TdGraph {
        let grammar = Grammar::parse(grammar, first, follow).unwrap();
        TdGraph::build(&grammar).unwrap()
    }

    #[test]
    fn alternatives_share_the_entry_node() {
        let graph = tiny(
            "Program -> a b | c",
            "Program a c",
            "Program $",
        );
        let entry = graph.entry("Program").unwrap();
        assert_eq!(graph.node(entry).edges.len(), 2);
    }

    #[test]
    fn chains_mark_their_last_edge_dest_as_accept() {
        let graph = tiny("Program -> a b", "Program a", "Program $");
        let entry = graph.entry("Program").unwrap();
        let first = &graph.node(entry).edges[0];
        assert!(!graph.node(first.dest).is_accept);
        let second = &graph.node(first.dest).edges[0];
        assert!(graph.node(second.dest).is_accept);
    }

    #[test]
    fn actions_attach_enter_and_exit() {
        let graph = tiny(
            "Program -> #label a #pop #hold b #push_rv",
            "Program a",
            "Program $",
        );
        let entry = graph.entry("Program").unwrap();
        let first = &graph.node(entry).edges[0];
        assert_eq!(first.on_enter, vec![Action::Label]);
        assert!(first.on_exit.is_empty());
        let second = &graph.node(first.dest).edges[0];
        assert_eq!(second.on_enter, vec![Action::Pop, Action::Hold]);
        assert_eq!(second.on_exit, vec![Action::PushRv]);
    }

    #[test]
    fn epsilon_edges_carry_their_actions() {
        let graph = tiny(
            "Program -> a | #pop EPSILON",
            "Program a EPSILON",
            "Program $",
        );
        let entry = graph.entry("Program").unwrap();
        let eps = &graph.node(entry).edges[1];
        assert_eq!(eps.label, EdgeLabel::Epsilon);
        assert_eq!(eps.on_enter, vec![Action::Pop]);
        assert!(graph.node(eps.dest).is_accept);
    }

    #[test]
    fn builtin_grammar_builds() {
        let grammar = Grammar::builtin().unwrap();
        let graph = TdGraph::build(&grammar).unwrap();
        let entry = graph.entry("Fun-declaration-prime").unwrap();
        let edge = &graph.node(entry).edges[0];
        assert_eq!(edge.label, EdgeLabel::Terminal("(".to_string()));
        assert_eq!(
            edge.on_enter,
            vec![Action::DefineFunction, Action::MainFunction]
        );
        // The frame prologue opens only after the parameters have popped.
        let params = &graph.node(edge.dest).edges[0];
        assert_eq!(params.label, EdgeLabel::NonTerminal("Params".to_string()));
        let close = &graph.node(params.dest).edges[0];
        assert_eq!(close.label, EdgeLabel::Terminal(")".to_string()));
        assert_eq!(
            close.on_enter,
            vec![
                Action::FunctionInputFinish,
                Action::ScopeStart(FrameKind::Function),
            ]
        );
        assert!(graph.entry("NoSuch").is_none());
    }
}
