//! cmc-vm - The Target Stack Machine
//!
//! ============================================================================
//! EXECUTION MODEL
//! ============================================================================
//!
//! The machine executes the compiler's exported program text directly: one
//! `i\t(OP, A, B, C)` record per line, an explicit program counter, and a
//! single sparse integer memory shared by the data block, the runtime
//! stack, and the temp block.
//!
//! OPERAND ADDRESSING:
//! -------------------
//! ```text
//!        read (sources)           resolve_dest (destinations/targets)
//! #k     k                        k
//! k      M[k]                     k
//! @k     M[M[k]]                  M[k]
//! ```
//!
//! Reading a never-written cell is a hard fault, with one deliberate
//! exception: `ASSIGN`'s destination cell is initialised to 0 before the
//! source resolves, so the export fallback `(ASSIGN , 0, 0 , )` executes as
//! a harmless no-op on a fresh machine.
//!
//! `PRINT` writes `PRINT    value` lines to the program-output channel;
//! every step also writes a PC/memory trace to the error channel. A line
//! that does not match the instruction pattern refuses to execute.

use std::io::{self, Write};
use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// The authoritative instruction pattern.
const COMMAND_PATTERN: &str =
    r"\d+\s+\(\s*(?P<command>[A-Z]+)(?P<params>(\s*,\s*[#@]?[-+]?\d*)+)\s*\)";

fn command_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(COMMAND_PATTERN).expect("pattern is valid"))
}

/// Error type for program execution.
#[derive(Debug, Error)]
pub enum VmError {
    /// A line that is not a well-formed instruction
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    /// A command name outside the instruction set
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// An instruction missing a required operand
    #[error("command {0:?} is missing operand {1}")]
    MissingOperand(String, usize),

    /// A read from a never-written memory cell
    #[error("invalid access to memory at {0}")]
    InvalidAccess(i64),

    /// A jump that resolves outside the address space
    #[error("jump target {0} is not addressable")]
    InvalidJump(i64),

    /// Integer division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Output or trace channel failure
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for VM operations
pub type Result<T> = std::result::Result<T, VmError>;

/// The machine: sparse memory plus a program counter.
#[derive(Debug, Default)]
pub struct Vm {
    memory: FxHashMap<i64, i64>,
    pc: usize,
}

impl Vm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a whole program text. `output` receives the PRINT channel,
    /// `trace` the per-step PC/memory log.
    pub fn run<W: Write, T: Write>(
        &mut self,
        program: &str,
        output: &mut W,
        trace: &mut T,
    ) -> Result<()> {
        let instructions: Vec<&str> = program
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        self.pc = 0;
        while self.pc < instructions.len() {
            self.step(instructions[self.pc], output, trace)?;
        }
        Ok(())
    }

    /// The value of a memory cell, if ever written.
    pub fn memory(&self, address: i64) -> Option<i64> {
        self.memory.get(&address).copied()
    }

    fn read(&self, address: i64) -> Result<i64> {
        self.memory
            .get(&address)
            .copied()
            .ok_or(VmError::InvalidAccess(address))
    }

    /// Source-operand resolution (indirection depth 2).
    fn resolve(&self, param: &str) -> Result<i64> {
        // Legacy tester compatibility.
        if param.eq_ignore_ascii_case("true") {
            return Ok(1);
        }
        if param.eq_ignore_ascii_case("false") {
            return Ok(0);
        }
        let value = parse_value(param)?;
        match param.as_bytes().first() {
            Some(b'#') => Ok(value),
            Some(b'@') => self.read(self.read(value)?),
            _ => self.read(value),
        }
    }

    /// Destination/jump-target resolution (indirection depth 1).
    fn resolve_dest(&self, param: &str) -> Result<i64> {
        let value = parse_value(param)?;
        match param.as_bytes().first() {
            Some(b'#') => Ok(value),
            Some(b'@') => self.read(value),
            _ => Ok(value),
        }
    }

    fn set_memory<T: Write>(&mut self, param: &str, value: i64, trace: &mut T) -> Result<()> {
        let address = self.resolve_dest(param)?;
        self.memory.insert(address, value);
        writeln!(trace, "--->  memory[{address}] = {value}")?;
        Ok(())
    }

    fn step<W: Write, T: Write>(
        &mut self,
        instruction: &str,
        output: &mut W,
        trace: &mut T,
    ) -> Result<()> {
        writeln!(
            trace,
            "--->  PC = {} command : {}",
            self.pc, instruction
        )?;
        self.pc += 1;

        let captures = command_regex()
            .captures(instruction)
            .ok_or_else(|| VmError::InvalidCommand(instruction.to_string()))?;
        let command = captures["command"].to_uppercase();
        let params: Vec<String> = captures["params"]
            .split(',')
            .skip(1)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let param = |index: usize| -> Result<&str> {
            params
                .get(index)
                .map(String::as_str)
                .ok_or_else(|| VmError::MissingOperand(command.clone(), index))
        };

        match command.as_str() {
            "ADD" | "AND" | "SUB" | "MULT" | "DIV" | "EQ" | "LT" => {
                let lhs = self.resolve(param(0)?)?;
                let rhs = self.resolve(param(1)?)?;
                let value = match command.as_str() {
                    "ADD" => lhs + rhs,
                    "AND" => lhs & rhs,
                    "SUB" => lhs - rhs,
                    "MULT" => lhs * rhs,
                    "DIV" => {
                        if rhs == 0 {
                            return Err(VmError::DivisionByZero);
                        }
                        lhs.div_euclid(rhs)
                    }
                    "EQ" => i64::from(lhs == rhs),
                    _ => i64::from(lhs < rhs),
                };
                let dest = param(2)?.to_string();
                self.set_memory(&dest, value, trace)?;
            }
            "ASSIGN" => {
                // First write to an untouched destination sees a zero there.
                let dest = self.resolve_dest(param(1)?)?;
                self.memory.entry(dest).or_insert(0);
                let value = self.resolve(param(0)?)?;
                let dest_param = param(1)?.to_string();
                self.set_memory(&dest_param, value, trace)?;
            }
            "NOT" => {
                let value = self.resolve(param(0)?)?;
                let dest = param(1)?.to_string();
                self.set_memory(&dest, i64::from(value == 0), trace)?;
            }
            "JP" => {
                let target = self.resolve_dest(param(0)?)?;
                self.pc = usize::try_from(target).map_err(|_| VmError::InvalidJump(target))?;
            }
            "JPF" => {
                if self.resolve(param(0)?)? == 0 {
                    let target = self.resolve_dest(param(1)?)?;
                    self.pc =
                        usize::try_from(target).map_err(|_| VmError::InvalidJump(target))?;
                }
            }
            "PRINT" => {
                let value = self.resolve(param(0)?)?;
                writeln!(output, "PRINT    {value}")?;
            }
            other => return Err(VmError::UnknownCommand(other.to_string())),
        }
        Ok(())
    }
}

fn parse_value(param: &str) -> Result<i64> {
    let digits = param.trim_start_matches(['#', '@']);
    digits
        .parse::<i64>()
        .map_err(|_| VmError::InvalidCommand(param.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(program: &str) -> (String, Result<()>) {
        let mut vm = Vm::new();
        let mut out = Vec::new();
        let mut trace = Vec::new();
        let result = vm.run(program, &mut out, &mut trace);
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn assign_and_print() {
        let (out, result) = run("0\t(ASSIGN, #5, 1000, )\n1\t(PRINT, 1000, , )\n");
        result.unwrap();
        assert_eq!(out, "PRINT    5\n");
    }

    #[test]
    fn assign_initialises_untouched_destination() {
        // The export fallback reads its own destination; the pre-init to 0
        // keeps it a no-op instead of a fault.
        let (_, result) = run("0\t(ASSIGN , 0, 0 , )\n");
        result.unwrap();
    }

    #[test]
    fn indirect_addressing_depths() {
        let program = "\
0\t(ASSIGN, #2000, 1000, )
1\t(ASSIGN, #7, 2000, )
2\t(ASSIGN, @1000, 1004, )
3\t(PRINT, 1004, , )
4\t(ASSIGN, #9, @1000, )
5\t(PRINT, 2000, , )
";
        let (out, result) = run(program);
        result.unwrap();
        assert_eq!(out, "PRINT    7\nPRINT    9\n");
    }

    #[test]
    fn jpf_skips_on_zero_only() {
        let program = "\
0\t(ASSIGN, #0, 1000, )
1\t(JPF, 1000, 3, )
2\t(PRINT, 1000, , )
3\t(ASSIGN, #1, 1004, )
4\t(JPF, 1004, 6, )
5\t(PRINT, 1004, , )
";
        let (out, result) = run(program);
        result.unwrap();
        assert_eq!(out, "PRINT    1\n");
    }

    #[test]
    fn jump_past_the_end_halts() {
        let (out, result) = run("0\t(JP, 9999, , )\n");
        result.unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn comparisons_yield_zero_or_one() {
        let program = "\
0\t(ASSIGN, #3, 1000, )
1\t(EQ, 1000, #3, 1004)
2\t(LT, 1000, #2, 1008)
3\t(PRINT, 1004, , )
4\t(PRINT, 1008, , )
";
        let (out, result) = run(program);
        result.unwrap();
        assert_eq!(out, "PRINT    1\nPRINT    0\n");
    }

    #[test]
    fn reading_unwritten_memory_faults() {
        let (_, result) = run("0\t(PRINT, 1000, , )\n");
        assert!(matches!(result, Err(VmError::InvalidAccess(1000))));
    }

    #[test]
    fn malformed_instruction_refused() {
        let (_, result) = run("0\tgarbage\n");
        assert!(matches!(result, Err(VmError::InvalidCommand(_))));
    }

    #[test]
    fn division_is_floor_and_checked() {
        let (out, result) = run(
            "0\t(ASSIGN, #7, 1000, )\n1\t(DIV, 1000, #2, 1004)\n2\t(PRINT, 1004, , )\n",
        );
        result.unwrap();
        assert_eq!(out, "PRINT    3\n");
        let (_, result) = run("0\t(ASSIGN, #1, 1000, )\n1\t(DIV, 1000, #0, 1004)\n");
        assert!(matches!(result, Err(VmError::DivisionByZero)));
    }

    #[test]
    fn trace_records_pc_and_memory() {
        let mut vm = Vm::new();
        let mut out = Vec::new();
        let mut trace = Vec::new();
        vm.run("0\t(ASSIGN, #5, 1000, )\n", &mut out, &mut trace)
            .unwrap();
        let text = String::from_utf8(trace).unwrap();
        assert!(text.contains("--->  PC = 0 command : 0\t(ASSIGN, #5, 1000, )"));
        assert!(text.contains("--->  memory[1000] = 5"));
        assert_eq!(vm.memory(1000), Some(5));
    }
}
