//! The closed set of semantic actions and the sink they fire into.
//!
//! Grammar files spell actions as `#name` or `#name(k)`. They are resolved
//! to this enum exactly once, at grammar-load time, so a typo in an asset
//! file is a load error rather than a silent no-op mid-parse.

use std::fmt;

use cmc_lex::SymbolTable;
use cmc_util::Token;

use crate::error::{GrammarError, GrammarResult};

/// The four scope-frame kinds the code generator keeps books for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `f`: function bodies
    Function,
    /// `s`: if/else selections
    Selection,
    /// `c`: while loops (and their `break`s)
    Loop,
    /// `t`: plain compound blocks
    Block,
}

impl FrameKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "f" => Some(FrameKind::Function),
            "s" => Some(FrameKind::Selection),
            "c" => Some(FrameKind::Loop),
            "t" => Some(FrameKind::Block),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            FrameKind::Function => "f",
            FrameKind::Selection => "s",
            FrameKind::Loop => "c",
            FrameKind::Block => "t",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Every semantic action a grammar edge may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PushNum,
    PushId,
    PushRv,
    PushArray,
    PushOperand,
    PushZero,
    Pop,
    Hold,
    Label,
    AssignStack,
    OperandExec,
    IfDecide,
    WhileJump,
    DefineId,
    DefineArray,
    DefineFunction,
    MainFunction,
    ScopeStart(FrameKind),
    ScopeFinish(FrameKind),
    FunctionInputStart,
    FunctionInputFinish,
    FunctionInputPass,
    FunctionCall,
    FunctionReturn,
    JumpPlaceholder(FrameKind),
    BackpatchJump(FrameKind),
}

impl Action {
    /// Parses a `#name` / `#name(k)` marker.
    pub fn parse(marker: &str) -> GrammarResult<Self> {
        let body = marker.strip_prefix('#').unwrap_or(marker);
        let (name, param) = match body.split_once('(') {
            Some((name, rest)) => (name, Some(rest.trim_end_matches(')'))),
            None => (body, None),
        };
        let framed = |action: fn(FrameKind) -> Action| -> GrammarResult<Action> {
            let tag = param.ok_or_else(|| GrammarError::MissingFrameKind(marker.to_string()))?;
            let kind = FrameKind::parse(tag).ok_or_else(|| GrammarError::UnknownFrameKind {
                action: marker.to_string(),
                kind: tag.to_string(),
            })?;
            Ok(action(kind))
        };
        match name {
            "push_num" => Ok(Action::PushNum),
            "push_id" => Ok(Action::PushId),
            "push_rv" => Ok(Action::PushRv),
            "push_array" => Ok(Action::PushArray),
            "push_operand" => Ok(Action::PushOperand),
            "push_zero" => Ok(Action::PushZero),
            "pop" => Ok(Action::Pop),
            "hold" => Ok(Action::Hold),
            "label" => Ok(Action::Label),
            "assign_stack" => Ok(Action::AssignStack),
            "operand_exec" => Ok(Action::OperandExec),
            "if_decide" => Ok(Action::IfDecide),
            "while_jump" => Ok(Action::WhileJump),
            "define_id" => Ok(Action::DefineId),
            "define_array" => Ok(Action::DefineArray),
            "define_function" => Ok(Action::DefineFunction),
            "main_function" => Ok(Action::MainFunction),
            "scope_start" => framed(Action::ScopeStart),
            "scope_finish" => framed(Action::ScopeFinish),
            "function_input_start" => Ok(Action::FunctionInputStart),
            "function_input_finish" => Ok(Action::FunctionInputFinish),
            "function_input_pass" => Ok(Action::FunctionInputPass),
            "function_call" => Ok(Action::FunctionCall),
            "function_return" => Ok(Action::FunctionReturn),
            "jump_placeholder" => framed(Action::JumpPlaceholder),
            "backpatch_jump" => framed(Action::BackpatchJump),
            _ => Err(GrammarError::UnknownAction(marker.to_string())),
        }
    }
}

/// Receiver for parser-fired actions.
///
/// The parser hands over the action, the current lookahead token, the line
/// the input buffer stands on, and the symbol table the scanner has been
/// feeding. Implementations must tolerate action sequences produced by
/// error recovery; a fired action is not a promise that the production
/// completed.
pub trait ActionSink {
    fn run(&mut self, action: Action, token: &Token, line: u32, symbols: &mut SymbolTable);
}

/// A sink that ignores every action; parsing-only runs and tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl ActionSink for NullSink {
    fn run(&mut self, _action: Action, _token: &Token, _line: u32, _symbols: &mut SymbolTable) {}
}
