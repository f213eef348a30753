//! Per-kind scope-frame bookkeeping.
//!
//! Each frame kind (function, selection, loop, block) keeps two stacks that
//! live across scope open/close:
//!
//! - address snapshots: the data/temp watermarks at scope entry, restored on
//!   exit so a closed scope's cells are reclaimed for the next one;
//! - pending jumps: reserved program lines awaiting a target, delimited by
//!   one sentinel per nested scope. Closing a scope patches every slot above
//!   its own sentinel with a `JP` to the current program position: this is
//!   `break` for loops, skip-past-else for selections, and the
//!   return-to-epilogue path for functions.

use crate::program::{Instruction, Operand, ProgramBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Sentinel,
    Slot(usize),
}

/// Bookkeeping for one scope kind.
#[derive(Debug, Default)]
pub struct ScopeFrame {
    snapshots: Vec<(i64, i64)>,
    pending: Vec<Pending>,
}

impl ScopeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a nested scope: snapshot the watermarks, drop a sentinel.
    pub fn open(&mut self, data_address: i64, temp_address: i64) {
        self.snapshots.push((data_address, temp_address));
        self.pending.push(Pending::Sentinel);
    }

    /// Closes the innermost scope: every pending slot above the sentinel is
    /// patched to jump to the current program position, then the sentinel
    /// pops and the saved `(data, temp)` watermarks come back.
    ///
    /// An unbalanced close (no open scope) patches nothing and returns None.
    pub fn close(&mut self, program: &mut ProgramBlock) -> Option<(i64, i64)> {
        let snapshot = self.snapshots.pop()?;
        while let Some(&top) = self.pending.last() {
            match top {
                Pending::Sentinel => {
                    self.pending.pop();
                    break;
                }
                Pending::Slot(_) => self.backpatch_one(program),
            }
        }
        Some(snapshot)
    }

    /// Reserves a placeholder line and records it as pending in the current
    /// scope.
    pub fn reserve(&mut self, program: &mut ProgramBlock) {
        let line = program.push_placeholder();
        self.pending.push(Pending::Slot(line));
    }

    /// Pops one pending slot and patches it to `JP <current position>`.
    /// A sentinel (or nothing) on top is left alone.
    pub fn backpatch_one(&mut self, program: &mut ProgramBlock) {
        if let Some(&Pending::Slot(line)) = self.pending.last() {
            self.pending.pop();
            let target = Operand::Direct(program.len() as i64);
            program.patch(line, Instruction::jp(target));
        }
    }

    /// True while any scope of this kind is open.
    pub fn has_open_scope(&self) -> bool {
        !self.snapshots.is_empty()
    }

    /// Pending slots not yet patched (sentinels excluded).
    pub fn pending_count(&self) -> usize {
        self.pending
            .iter()
            .filter(|p| matches!(p, Pending::Slot(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{Op, Slot};

    #[test]
    fn close_patches_only_down_to_its_sentinel() {
        let mut frame = ScopeFrame::new();
        let mut program = ProgramBlock::new();

        frame.open(1000, 3000);
        frame.reserve(&mut program); // outer pending, line 0
        frame.open(1004, 3004);
        frame.reserve(&mut program); // inner pending, line 1
        program.emit(Instruction::unary(Op::Print, Operand::Direct(1012))); // line 2

        assert_eq!(frame.close(&mut program), Some((1004, 3004)));
        // Inner slot patched to line 3; outer still reserved.
        assert_eq!(
            program.slot(1),
            Some(&Slot::Instr(Instruction::jp(Operand::Direct(3))))
        );
        assert_eq!(program.slot(0), Some(&Slot::Placeholder));
        assert_eq!(frame.pending_count(), 1);

        assert_eq!(frame.close(&mut program), Some((1000, 3000)));
        assert_eq!(
            program.slot(0),
            Some(&Slot::Instr(Instruction::jp(Operand::Direct(3))))
        );
        assert!(!frame.has_open_scope());
        assert_eq!(frame.pending_count(), 0);
    }

    #[test]
    fn backpatch_one_respects_sentinels() {
        let mut frame = ScopeFrame::new();
        let mut program = ProgramBlock::new();
        frame.open(1000, 3000);
        // Nothing pending: a stray backpatch must not eat the sentinel.
        frame.backpatch_one(&mut program);
        assert!(frame.has_open_scope());
        frame.reserve(&mut program);
        frame.backpatch_one(&mut program);
        assert_eq!(frame.pending_count(), 0);
        assert!(frame.close(&mut program).is_some());
    }

    #[test]
    fn unbalanced_close_is_harmless() {
        let mut frame = ScopeFrame::new();
        let mut program = ProgramBlock::new();
        assert_eq!(frame.close(&mut program), None);
        // A stray reserve with no scope survives to export as a no-op.
        frame.reserve(&mut program);
        assert_eq!(frame.close(&mut program), None);
        assert_eq!(program.slot(0), Some(&Slot::Placeholder));
    }
}
