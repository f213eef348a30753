//! cmc-gen - Intermediate-Code Generator
//!
//! ============================================================================
//! CODE GENERATION MODEL
//! ============================================================================
//!
//! The generator is entirely parser-driven: it implements the action sink
//! the parser fires grammar-annotated actions into, and turns them into a
//! linear program of three-address instructions for the companion stack
//! machine.
//!
//! MEMORY LAYOUT (compile-time address allocation):
//! ------------------------------------------------
//! ```text
//! 1000  sp   ┐
//! 1004  fp   │ four dedicated registers at the head of the data block
//! 1008  ra   │
//! 1012  rv   ┘
//! 1020…      data block: globals and per-function locals (word = 4)
//! 2000…      runtime stack, grown by emitted code through sp
//! 3000…      temp block: expression intermediates
//! ```
//!
//! Data and temp watermarks are snapshotted when a scope opens and restored
//! when it closes, so one function's locals are reclaimed for the next.
//!
//! THE SEMANTIC STACK:
//! -------------------
//! A single stack of operands (`#k`, `k`, `@k`), opcode names, and program
//! lines. Expression actions push and pop it; control-flow actions use the
//! line entries for backpatching. Slot 0 holds the line of the final
//! jump-to-main patch from the moment the first function is declared.
//!
//! CONTROL FLOW (backpatching):
//! ----------------------------
//! `hold` reserves a `JPF` slot after a condition; `if_decide` patches it
//! once the guarded statement ends. `while_jump` closes the loop with a `JP`
//! to the saved loop head. Pending unconditional jumps (`break`, skip-else,
//! early return) live in per-kind scope frames and are patched when their
//! scope finishes.
//!
//! FUNCTION CALLS (caller saves everything):
//! -----------------------------------------
//! The caller pushes its live data cells, live temps, then `sp fp ra`, then
//! the arguments; sets `ra = PC+2` and jumps to the callee line. The callee
//! pops the arguments into its parameter cells first, then its frame
//! prologue saves `fp` and rebases it. Returns funnel through the frame
//! epilogue to a single `JP @ra`; the return value travels in `rv` and
//! lands in a fresh caller temp.

pub mod error;
pub mod frame;
pub mod program;

use cmc_lex::{RecordKind, SymbolTable};
use cmc_par::{Action, ActionSink, FrameKind};
use cmc_util::{Token, TokenKind};

pub use error::CodeGenError;
pub use frame::ScopeFrame;
pub use program::{Instruction, Op, Operand, ProgramBlock, Slot};

/// Bytes per machine word.
pub const WORD_SIZE: i64 = 4;
/// First data-block address (registers live at its head).
pub const DATA_ADDRESS: i64 = 1000;
/// First runtime-stack address.
pub const STACK_ADDRESS: i64 = 2000;
/// First temp-block address.
pub const TEMP_ADDRESS: i64 = 3000;

/// Program line of the built-in `output` subroutine.
const OUTPUT_ENTRY: i64 = 5;

/// The four dedicated registers, allocated at the start of the data block
/// in this fixed order.
#[derive(Debug, Clone, Copy)]
pub struct Registers {
    pub sp: i64,
    pub fp: i64,
    pub ra: i64,
    pub rv: i64,
}

/// One semantic-stack entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackItem {
    /// An instruction operand: immediate, direct, or indirect.
    Opd(Operand),
    /// An opcode pushed by `push_operand`, consumed by `operand_exec`.
    Opcode(Op),
    /// A program-block line (loop heads, hold slots, the main patch).
    Line(usize),
}

#[derive(Debug, Default)]
struct Frames {
    function: ScopeFrame,
    selection: ScopeFrame,
    looping: ScopeFrame,
    block: ScopeFrame,
}

impl Frames {
    fn get(&mut self, kind: FrameKind) -> &mut ScopeFrame {
        match kind {
            FrameKind::Function => &mut self.function,
            FrameKind::Selection => &mut self.selection,
            FrameKind::Loop => &mut self.looping,
            FrameKind::Block => &mut self.block,
        }
    }

    fn all(&self) -> [&ScopeFrame; 4] {
        [&self.function, &self.selection, &self.looping, &self.block]
    }
}

/// The code generator. Owns the program block and every compile-time stack;
/// borrows the symbol table only for the duration of each action.
pub struct CodeGen {
    program: ProgramBlock,
    semantic_stack: Vec<StackItem>,
    registers: Registers,
    data_address: i64,
    temp_address: i64,
    frames: Frames,
    /// While set, `define_id` binds function parameters (stack pops) instead
    /// of zero-initialised locals.
    param_mode: bool,
    /// Lexeme of the most recent `define_id`, for the follow-up definition
    /// actions.
    last_defined: Option<String>,
    /// Semantic-stack depths recorded by `function_input_pass`; arguments of
    /// the matching call sit above the mark.
    call_marks: Vec<usize>,
    /// Data/temp watermarks at the current function's entry; a call saves
    /// everything live above them.
    function_data_mark: i64,
    function_temp_mark: i64,
    main_slot_declared: bool,
    defects: Vec<CodeGenError>,
}

impl CodeGen {
    /// A generator with the fixed prologue emitted and the built-in `output`
    /// routine registered in the global scope.
    pub fn new(symbols: &mut SymbolTable) -> Self {
        let mut data_address = DATA_ADDRESS;
        let mut take = || {
            let addr = data_address;
            data_address += WORD_SIZE;
            addr
        };
        let registers = Registers {
            sp: take(),
            fp: take(),
            ra: take(),
            rv: take(),
        };
        let mut gen = Self {
            program: ProgramBlock::new(),
            semantic_stack: Vec::new(),
            registers,
            data_address,
            temp_address: TEMP_ADDRESS,
            frames: Frames::default(),
            param_mode: false,
            last_defined: None,
            call_marks: Vec::new(),
            function_data_mark: data_address,
            function_temp_mark: TEMP_ADDRESS,
            main_slot_declared: false,
            defects: Vec::new(),
        };
        gen.emit_template(symbols);
        gen
    }

    /// The fixed header: register initialisation, a jump over the built-in
    /// `output(n)` subroutine, and the subroutine itself (pop the argument
    /// into `rv`, print it, return through `ra`).
    fn emit_template(&mut self, symbols: &mut SymbolTable) {
        symbols.insert(&Token::new(TokenKind::Id, "output", 0));
        if let Some(record) = symbols.lookup_mut("output") {
            record.address = Some(OUTPUT_ENTRY);
            record.kind = RecordKind::Function;
            record.arg_count = 1;
            record.arg_types.push("int".to_string());
        }

        let r = self.registers;
        self.emit(Instruction::assign(Operand::Imm(STACK_ADDRESS), Operand::Direct(r.sp)));
        self.emit(Instruction::assign(Operand::Imm(STACK_ADDRESS), Operand::Direct(r.fp)));
        self.emit(Instruction::assign(Operand::Imm(9999), Operand::Direct(r.ra)));
        self.emit(Instruction::assign(Operand::Imm(9999), Operand::Direct(r.rv)));
        let header_end = (self.program.len() + 5) as i64;
        self.emit(Instruction::jp(Operand::Direct(header_end)));
        self.stack_pop(Operand::Direct(r.rv));
        self.emit(Instruction::unary(Op::Print, Operand::Direct(r.rv)));
        self.emit(Instruction::jp(Operand::Indirect(r.ra)));

        // One reserved cell between the registers and the first variable.
        self.new_data();
    }

    // ---- allocation ------------------------------------------------------

    fn new_data(&mut self) -> i64 {
        let addr = self.data_address;
        self.data_address += WORD_SIZE;
        addr
    }

    fn new_temp(&mut self) -> i64 {
        let addr = self.temp_address;
        self.temp_address += WORD_SIZE;
        addr
    }

    // ---- emission helpers ------------------------------------------------

    fn emit(&mut self, instruction: Instruction) -> usize {
        self.program.emit(instruction)
    }

    /// `push value` onto the runtime stack.
    fn stack_push(&mut self, value: Operand) {
        let sp = Operand::Direct(self.registers.sp);
        self.emit(Instruction::assign(value, Operand::Indirect(self.registers.sp)));
        self.emit(Instruction::ternary(Op::Add, sp, Operand::Imm(WORD_SIZE), sp));
    }

    /// `pop` the runtime stack into a destination.
    fn stack_pop(&mut self, dest: Operand) {
        let sp = Operand::Direct(self.registers.sp);
        self.emit(Instruction::ternary(Op::Sub, sp, Operand::Imm(WORD_SIZE), sp));
        self.emit(Instruction::assign(Operand::Indirect(self.registers.sp), dest));
    }

    /// Bumps `sp` past `words` fresh stack cells.
    fn stack_allocate(&mut self, words: i64) {
        let sp = Operand::Direct(self.registers.sp);
        self.emit(Instruction::ternary(
            Op::Add,
            Operand::Imm(WORD_SIZE * words),
            sp,
            sp,
        ));
    }

    /// Caller half of the frame protocol: `sp fp ra`, in that order.
    fn stack_store_registers(&mut self) {
        for reg in [self.registers.sp, self.registers.fp, self.registers.ra] {
            self.stack_push(Operand::Direct(reg));
        }
    }

    fn stack_load_registers(&mut self) {
        for reg in [self.registers.ra, self.registers.fp, self.registers.sp] {
            self.stack_pop(Operand::Direct(reg));
        }
    }

    /// Function entry: save the caller's `fp`, rebase it to `sp`.
    fn stack_open_frame(&mut self) {
        self.program.push_blank();
        self.stack_push(Operand::Direct(self.registers.fp));
        self.emit(Instruction::assign(
            Operand::Direct(self.registers.sp),
            Operand::Direct(self.registers.fp),
        ));
    }

    /// Function exit: unwind `sp` to `fp`, restore the saved `fp`.
    fn stack_close_frame(&mut self) {
        self.emit(Instruction::assign(
            Operand::Direct(self.registers.fp),
            Operand::Direct(self.registers.sp),
        ));
        self.stack_pop(Operand::Direct(self.registers.fp));
        self.program.push_blank();
    }

    // ---- semantic-stack helpers -----------------------------------------

    fn defect(&mut self, defect: CodeGenError) {
        tracing::debug!(%defect, "code-gen defect");
        self.defects.push(defect);
    }

    fn pop_item(&mut self, action: &'static str) -> Option<StackItem> {
        let item = self.semantic_stack.pop();
        if item.is_none() {
            self.defect(CodeGenError::StackUnderflow(action));
        }
        item
    }

    /// Pops an entry usable as an operand; lines become direct addresses
    /// (jump targets), anything unusable degrades to `0` with a defect.
    fn pop_operand(&mut self, action: &'static str) -> Operand {
        match self.pop_item(action) {
            Some(StackItem::Opd(operand)) => operand,
            Some(StackItem::Line(line)) => Operand::Direct(line as i64),
            Some(StackItem::Opcode(_)) => {
                self.defect(CodeGenError::StackMismatch(action));
                Operand::Direct(0)
            }
            None => Operand::Direct(0),
        }
    }

    fn pop_line(&mut self, action: &'static str) -> Option<usize> {
        match self.pop_item(action)? {
            StackItem::Line(line) => Some(line),
            _ => {
                self.defect(CodeGenError::StackMismatch(action));
                None
            }
        }
    }

    fn push(&mut self, item: StackItem) {
        self.semantic_stack.push(item);
    }

    // ---- expression actions ---------------------------------------------

    fn push_num(&mut self, token: &Token) {
        let value = token.lexeme.parse::<i64>().unwrap_or_default();
        self.push(StackItem::Opd(Operand::Imm(value)));
    }

    fn push_id(&mut self, token: &Token, symbols: &SymbolTable) {
        match symbols.lookup(&token.lexeme).and_then(|r| r.address) {
            Some(address) => self.push(StackItem::Opd(Operand::Direct(address))),
            None => {
                self.defect(CodeGenError::UnknownIdentifier(token.lexeme.clone()));
                self.push(StackItem::Opd(Operand::Direct(0)));
            }
        }
    }

    fn push_rv(&mut self) {
        self.push(StackItem::Opd(Operand::Direct(self.registers.rv)));
    }

    fn push_zero(&mut self) {
        self.push(StackItem::Opd(Operand::Imm(0)));
    }

    fn push_operand(&mut self, token: &Token) {
        let op = match token.lexeme.as_str() {
            "+" => Op::Add,
            "-" => Op::Sub,
            "*" => Op::Mult,
            "==" => Op::Eq,
            "<" => Op::Lt,
            other => {
                self.defect(CodeGenError::UnknownOperator(other.to_string()));
                return;
            }
        };
        self.push(StackItem::Opcode(op));
    }

    fn operand_exec(&mut self) {
        let rhs = self.pop_operand("operand_exec");
        let op = match self.pop_item("operand_exec") {
            Some(StackItem::Opcode(op)) => op,
            _ => {
                self.defect(CodeGenError::StackMismatch("operand_exec"));
                Op::Add
            }
        };
        let lhs = self.pop_operand("operand_exec");
        let result = self.new_temp();
        self.emit(Instruction::ternary(op, lhs, rhs, Operand::Direct(result)));
        self.push(StackItem::Opd(Operand::Direct(result)));
    }

    /// Pops index and base; leaves `@t` where `t = base + word * index`.
    fn push_array(&mut self) {
        let index = self.pop_operand("push_array");
        let temp = self.new_temp();
        self.emit(Instruction::ternary(
            Op::Mult,
            Operand::Imm(WORD_SIZE),
            index,
            Operand::Direct(temp),
        ));
        let base = self.pop_operand("push_array");
        self.emit(Instruction::ternary(
            Op::Add,
            base,
            Operand::Direct(temp),
            Operand::Direct(temp),
        ));
        self.push(StackItem::Opd(Operand::Indirect(temp)));
    }

    /// `ASSIGN top → top-1`, leaving the destination as the expression's
    /// value (assignment is an expression).
    fn assign_stack(&mut self) {
        let src = self.pop_operand("assign_stack");
        let dest = match self.semantic_stack.last() {
            Some(StackItem::Opd(operand)) => *operand,
            Some(StackItem::Line(line)) => Operand::Direct(*line as i64),
            _ => {
                self.defect(CodeGenError::StackMismatch("assign_stack"));
                return;
            }
        };
        self.emit(Instruction::assign(src, dest));
    }

    fn pop_discard(&mut self) {
        self.semantic_stack.pop();
    }

    // ---- control-flow actions -------------------------------------------

    /// Reserves a conditional-jump slot and remembers its line.
    fn hold(&mut self) {
        let line = self.program.push_placeholder();
        self.push(StackItem::Line(line));
    }

    /// Remembers the current line without reserving anything (loop heads).
    fn label(&mut self) {
        self.push(StackItem::Line(self.program.len()));
    }

    /// Pops the held slot and the condition; the slot becomes
    /// `JPF cond, <here>`.
    fn if_decide(&mut self) {
        let Some(slot) = self.pop_line("if_decide") else {
            return;
        };
        let cond = self.pop_operand("if_decide");
        let target = Operand::Direct(self.program.len() as i64);
        self.program.patch(slot, Instruction::jpf(cond, target));
    }

    /// Emits the back-jump to the loop head, then rearranges the stack so
    /// `if_decide` can patch the exit slot.
    fn while_jump(&mut self) {
        let slot = self.pop_item("while_jump");
        let cond = self.pop_item("while_jump");
        let head = self.pop_line("while_jump");
        if let Some(head) = head {
            self.emit(Instruction::jp(Operand::Direct(head as i64)));
        }
        if let Some(cond) = cond {
            self.push(cond);
        }
        if let Some(slot) = slot {
            self.push(slot);
        }
    }

    fn jump_placeholder(&mut self, kind: FrameKind) {
        self.frames.get(kind).reserve(&mut self.program);
    }

    fn backpatch_jump(&mut self, kind: FrameKind) {
        self.frames.get(kind).backpatch_one(&mut self.program);
    }

    // ---- definition actions ---------------------------------------------

    /// Binds the current identifier to a fresh data cell. Parameters pop
    /// their value from the runtime stack; plain variables zero-initialise.
    fn define_id(&mut self, token: &Token, symbols: &mut SymbolTable) {
        self.last_defined = Some(token.lexeme.clone());
        let address = self.new_data();
        match symbols.lookup_mut(&token.lexeme) {
            Some(record) => record.address = Some(address),
            None => self.defect(CodeGenError::UnknownIdentifier(token.lexeme.clone())),
        }
        if self.param_mode {
            if let Some(function) = symbols.last_function_in_global() {
                function.arg_count += 1;
                function.arg_types.push("int".to_string());
            }
            self.stack_pop(Operand::Direct(address));
        } else {
            self.emit(Instruction::assign(Operand::Imm(0), Operand::Direct(address)));
        }
    }

    /// Pops the size; the variable's cell records the current `sp` (the
    /// array lives on the runtime stack) and `sp` advances past it.
    fn define_array(&mut self, symbols: &mut SymbolTable) {
        let words = match self.pop_item("define_array") {
            Some(StackItem::Opd(Operand::Imm(n))) => n,
            Some(_) | None => {
                self.defect(CodeGenError::StackMismatch("define_array"));
                0
            }
        };
        let cell = self.last_record_address(symbols);
        self.emit(Instruction::assign(
            Operand::Direct(self.registers.sp),
            Operand::Direct(cell),
        ));
        if let Some(name) = self.last_defined.clone() {
            if let Some(record) = symbols.lookup_mut(&name) {
                record.kind = RecordKind::Array;
            }
        }
        self.stack_allocate(words);
    }

    /// Rebinds the just-declared identifier from a data cell to the program
    /// line where its code will start, dropping the cell's initialiser.
    fn define_function(&mut self, symbols: &mut SymbolTable) {
        self.function_data_mark = self.data_address;
        self.function_temp_mark = self.temp_address;
        let entry = self.program.len() as i64;
        if let Some(name) = self.last_defined.clone() {
            if let Some(record) = symbols.lookup_mut(&name) {
                record.address = Some(entry);
                record.kind = RecordKind::Function;
            }
        }
        self.program.clear_last();
    }

    /// First function only: the line before its entry becomes the slot the
    /// final `JP <main>` lands in, kept at the bottom of the semantic stack.
    fn main_function(&mut self) {
        if self.main_slot_declared {
            return;
        }
        self.main_slot_declared = true;
        self.program.pop_last();
        let slot = self.program.push_placeholder();
        self.semantic_stack.insert(0, StackItem::Line(slot));
    }

    fn last_record_address(&mut self, symbols: &SymbolTable) -> i64 {
        let found = self
            .last_defined
            .as_deref()
            .and_then(|name| symbols.lookup(name))
            .and_then(|record| record.address);
        match found {
            Some(address) => address,
            None => {
                let name = self.last_defined.clone().unwrap_or_default();
                self.defect(CodeGenError::UnknownIdentifier(name));
                0
            }
        }
    }

    // ---- scope actions ---------------------------------------------------

    fn scope_start(&mut self, kind: FrameKind, symbols: &mut SymbolTable) {
        symbols.enter_scope();
        let (data, temp) = (self.data_address, self.temp_address);
        self.frames.get(kind).open(data, temp);
        if kind == FrameKind::Function {
            self.stack_open_frame();
        }
    }

    fn scope_finish(&mut self, kind: FrameKind, symbols: &mut SymbolTable) {
        symbols.exit_scope();
        if let Some((data, temp)) = self.frames.get(kind).close(&mut self.program) {
            self.data_address = data;
            self.temp_address = temp;
        }
        if kind == FrameKind::Function {
            self.stack_close_frame();
        }
    }

    // ---- call protocol ---------------------------------------------------

    fn function_input_start(&mut self) {
        self.param_mode = true;
    }

    fn function_input_finish(&mut self) {
        self.param_mode = false;
    }

    fn function_input_pass(&mut self) {
        self.call_marks.push(self.semantic_stack.len());
    }

    /// The caller side of a call, in full: save live data, live temps, and
    /// `sp fp ra`; push the arguments; link and jump; restore everything in
    /// reverse; materialise `rv` into a fresh temp.
    fn function_call(&mut self) {
        let saved_data: Vec<i64> = range_cells(self.function_data_mark, self.data_address);
        let saved_temp: Vec<i64> = range_cells(self.function_temp_mark, self.temp_address);

        for &cell in &saved_data {
            self.stack_push(Operand::Direct(cell));
        }
        for &cell in &saved_temp {
            self.stack_push(Operand::Direct(cell));
        }
        self.stack_store_registers();

        let mark = self.call_marks.pop().unwrap_or(self.semantic_stack.len());
        while self.semantic_stack.len() > mark {
            let argument = self.pop_operand("function_call");
            self.stack_push(argument);
        }

        let callee = self.pop_operand("function_call");
        let return_to = (self.program.len() + 2) as i64;
        self.emit(Instruction::assign(
            Operand::Imm(return_to),
            Operand::Direct(self.registers.ra),
        ));
        self.emit(Instruction::jp(callee));

        self.stack_load_registers();
        for &cell in saved_temp.iter().rev() {
            self.stack_pop(Operand::Direct(cell));
        }
        for &cell in saved_data.iter().rev() {
            self.stack_pop(Operand::Direct(cell));
        }

        let result = self.new_temp();
        self.emit(Instruction::assign(
            Operand::Direct(self.registers.rv),
            Operand::Direct(result),
        ));
        self.push(StackItem::Opd(Operand::Direct(result)));
    }

    fn function_return(&mut self) {
        self.emit(Instruction::jp(Operand::Indirect(self.registers.ra)));
    }

    // ---- finalisation ----------------------------------------------------

    /// Patches the reserved prologue slot with `JP` to the named function's
    /// entry; the slot line lives at the bottom of the semantic stack.
    pub fn set_exec_block(&mut self, name: &str, symbols: &SymbolTable) {
        if self.semantic_stack.is_empty() {
            self.defect(CodeGenError::MissingEntryPoint(
                "no patch slot on the semantic stack".to_string(),
            ));
            return;
        }
        let slot = match self.semantic_stack.remove(0) {
            StackItem::Line(line) => line,
            _ => {
                self.defect(CodeGenError::MissingEntryPoint(
                    "semantic-stack slot 0 is not a program line".to_string(),
                ));
                return;
            }
        };
        match symbols.lookup(name).and_then(|r| r.address) {
            Some(entry) => {
                tracing::debug!(name, entry, slot, "patching entry jump");
                self.program.patch(slot, Instruction::jp(Operand::Direct(entry)));
            }
            None => self.defect(CodeGenError::MissingEntryPoint(format!(
                "function '{name}' has no address"
            ))),
        }
    }

    pub fn program(&self) -> &ProgramBlock {
        &self.program
    }

    pub fn defects(&self) -> &[CodeGenError] {
        &self.defects
    }

    pub fn semantic_stack(&self) -> &[StackItem] {
        &self.semantic_stack
    }

    /// The balance invariant: after a well-formed compilation the semantic
    /// stack is drained, every sentinel is popped, and no reserved slot is
    /// left unpatched.
    pub fn is_balanced(&self) -> bool {
        self.semantic_stack.is_empty()
            && self
                .frames
                .all()
                .iter()
                .all(|f| !f.has_open_scope() && f.pending_count() == 0)
            && !self.program.has_placeholders()
    }

    pub fn export(&self, path: &std::path::Path) -> error::Result<()> {
        self.program.export(path)
    }
}

fn range_cells(from: i64, to: i64) -> Vec<i64> {
    let mut cells = Vec::new();
    let mut cell = from;
    while cell < to {
        cells.push(cell);
        cell += WORD_SIZE;
    }
    cells
}

impl ActionSink for CodeGen {
    fn run(&mut self, action: Action, token: &Token, _line: u32, symbols: &mut SymbolTable) {
        match action {
            Action::PushNum => self.push_num(token),
            Action::PushId => self.push_id(token, symbols),
            Action::PushRv => self.push_rv(),
            Action::PushArray => self.push_array(),
            Action::PushOperand => self.push_operand(token),
            Action::PushZero => self.push_zero(),
            Action::Pop => self.pop_discard(),
            Action::Hold => self.hold(),
            Action::Label => self.label(),
            Action::AssignStack => self.assign_stack(),
            Action::OperandExec => self.operand_exec(),
            Action::IfDecide => self.if_decide(),
            Action::WhileJump => self.while_jump(),
            Action::DefineId => self.define_id(token, symbols),
            Action::DefineArray => self.define_array(symbols),
            Action::DefineFunction => self.define_function(symbols),
            Action::MainFunction => self.main_function(),
            Action::ScopeStart(kind) => self.scope_start(kind, symbols),
            Action::ScopeFinish(kind) => self.scope_finish(kind, symbols),
            Action::FunctionInputStart => self.function_input_start(),
            Action::FunctionInputFinish => self.function_input_finish(),
            Action::FunctionInputPass => self.function_input_pass(),
            Action::FunctionCall => self.function_call(),
            Action::FunctionReturn => self.function_return(),
            Action::JumpPlaceholder(kind) => self.jump_placeholder(kind),
            Action::BackpatchJump(kind) => self.backpatch_jump(kind),
        }
    }
}
