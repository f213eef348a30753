//! The program block: a growable, patchable vector of three-address
//! instructions.
//!
//! Slots are either real instructions, blanks (cleared or padding lines), or
//! placeholders awaiting a backpatch. Export keeps the slot positions: a
//! non-instruction slot leaves the file as the no-op `(ASSIGN , 0, 0 , )`,
//! which the target machine executes harmlessly.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use crate::error::CodeGenError;

/// The target machine's command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    And,
    Assign,
    Eq,
    Jpf,
    Jp,
    Lt,
    Mult,
    Div,
    Not,
    Print,
    Sub,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Add => "ADD",
            Op::And => "AND",
            Op::Assign => "ASSIGN",
            Op::Eq => "EQ",
            Op::Jpf => "JPF",
            Op::Jp => "JP",
            Op::Lt => "LT",
            Op::Mult => "MULT",
            Op::Div => "DIV",
            Op::Not => "NOT",
            Op::Print => "PRINT",
            Op::Sub => "SUB",
        };
        f.write_str(name)
    }
}

/// One instruction operand: `#k` immediate, `k` direct address, `@k`
/// indirect address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Imm(i64),
    Direct(i64),
    Indirect(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Imm(v) => write!(f, "#{v}"),
            Operand::Direct(v) => write!(f, "{v}"),
            Operand::Indirect(v) => write!(f, "@{v}"),
        }
    }
}

/// A three-address record `(OP, A, B, C)`; unused fields stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub args: [Option<Operand>; 3],
}

impl Instruction {
    pub fn unary(op: Op, a: Operand) -> Self {
        Self {
            op,
            args: [Some(a), None, None],
        }
    }

    pub fn binary(op: Op, a: Operand, b: Operand) -> Self {
        Self {
            op,
            args: [Some(a), Some(b), None],
        }
    }

    pub fn ternary(op: Op, a: Operand, b: Operand, c: Operand) -> Self {
        Self {
            op,
            args: [Some(a), Some(b), Some(c)],
        }
    }

    /// `(ASSIGN, src, dest)`
    pub fn assign(src: Operand, dest: Operand) -> Self {
        Self::binary(Op::Assign, src, dest)
    }

    /// `(JP, target)`
    pub fn jp(target: Operand) -> Self {
        Self::unary(Op::Jp, target)
    }

    /// `(JPF, cond, target)`
    pub fn jpf(cond: Operand, target: Operand) -> Self {
        Self::binary(Op::Jpf, cond, target)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |arg: &Option<Operand>| arg.map(|a| a.to_string()).unwrap_or_default();
        write!(
            f,
            "({}, {}, {}, {})",
            self.op,
            show(&self.args[0]),
            show(&self.args[1]),
            show(&self.args[2])
        )
    }
}

/// Exact text exported for blank and never-patched slots.
const NOOP_SLOT: &str = "(ASSIGN , 0, 0 , )";

/// One program-block line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Instr(Instruction),
    /// A deliberately empty line (cleared or padding).
    Blank,
    /// A reserved line still waiting for its backpatch.
    Placeholder,
}

/// The growable instruction vector.
#[derive(Debug, Default)]
pub struct ProgramBlock {
    slots: Vec<Slot>,
}

impl ProgramBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length, i.e. the line the next emission will occupy.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends an instruction, returning its line.
    pub fn emit(&mut self, instruction: Instruction) -> usize {
        self.slots.push(Slot::Instr(instruction));
        self.slots.len() - 1
    }

    /// Appends an empty line.
    pub fn push_blank(&mut self) -> usize {
        self.slots.push(Slot::Blank);
        self.slots.len() - 1
    }

    /// Reserves a line for a later backpatch.
    pub fn push_placeholder(&mut self) -> usize {
        self.slots.push(Slot::Placeholder);
        self.slots.len() - 1
    }

    /// Overwrites a line in place; emission order around it is untouched.
    pub fn patch(&mut self, line: usize, instruction: Instruction) {
        if line < self.slots.len() {
            self.slots[line] = Slot::Instr(instruction);
        }
    }

    /// Blanks the most recent line (a definition superseding it).
    pub fn clear_last(&mut self) {
        if let Some(last) = self.slots.last_mut() {
            *last = Slot::Blank;
        }
    }

    /// Removes the most recent line entirely.
    pub fn pop_last(&mut self) -> Option<Slot> {
        self.slots.pop()
    }

    pub fn slot(&self, line: usize) -> Option<&Slot> {
        self.slots.get(line)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// True if any placeholder is still unpatched.
    pub fn has_placeholders(&self) -> bool {
        self.slots.iter().any(|s| *s == Slot::Placeholder)
    }

    /// Renders the export format: `i\t(OP, A, B, C)` per line, with the
    /// no-op fallback for blank or unpatched slots.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (line, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Instr(instruction) => writeln!(out, "{line}\t{instruction}")?,
                Slot::Blank | Slot::Placeholder => writeln!(out, "{line}\t{NOOP_SLOT}")?,
            }
        }
        Ok(())
    }

    pub fn export(&self, path: &Path) -> crate::error::Result<()> {
        let wrap = |source| CodeGenError::ExportFailed {
            path: path.to_path_buf(),
            source,
        };
        let mut out = io::BufWriter::new(std::fs::File::create(path).map_err(wrap)?);
        self.write_to(&mut out).map_err(wrap)
    }

    /// The exported text as a string (tests and the in-process VM path).
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        self.write_to(&mut buf).expect("infallible vec write");
        String::from_utf8(buf).expect("program text is ascii")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_formats_with_empty_fields() {
        let jp = Instruction::jp(Operand::Direct(9));
        assert_eq!(jp.to_string(), "(JP, 9, , )");
        let assign = Instruction::assign(Operand::Imm(2000), Operand::Direct(1000));
        assert_eq!(assign.to_string(), "(ASSIGN, #2000, 1000, )");
        let add = Instruction::ternary(
            Op::Add,
            Operand::Direct(1000),
            Operand::Imm(4),
            Operand::Direct(1000),
        );
        assert_eq!(add.to_string(), "(ADD, 1000, #4, 1000)");
        let ind = Instruction::jp(Operand::Indirect(1008));
        assert_eq!(ind.to_string(), "(JP, @1008, , )");
    }

    #[test]
    fn patch_overwrites_in_place() {
        let mut program = ProgramBlock::new();
        let hold = program.push_placeholder();
        program.emit(Instruction::unary(Op::Print, Operand::Direct(1012)));
        program.patch(hold, Instruction::jp(Operand::Direct(2)));
        assert_eq!(program.len(), 2);
        assert_eq!(
            program.slot(hold),
            Some(&Slot::Instr(Instruction::jp(Operand::Direct(2))))
        );
        assert!(!program.has_placeholders());
    }

    #[test]
    fn export_replaces_non_instructions_with_noop() {
        let mut program = ProgramBlock::new();
        program.emit(Instruction::jp(Operand::Direct(2)));
        program.push_blank();
        program.push_placeholder();
        let text = program.render();
        assert_eq!(
            text,
            "0\t(JP, 2, , )\n1\t(ASSIGN , 0, 0 , )\n2\t(ASSIGN , 0, 0 , )\n"
        );
    }
}
