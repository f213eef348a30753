//! cmc-drv - Compiler Driver
//!
//! ============================================================================
//! PIPELINE
//! ============================================================================
//!
//! ```text
//! input.txt
//!     │
//!     ▼
//! [SourceBuffer] ─▶ [Scanner] ─▶ [Parser + CodeGen actions]
//!                       │              │            │
//!                       ▼              ▼            ▼
//!                tokens.txt      parse_tree.txt  output.txt
//!                lexical_errors  syntax_errors
//!                symbol_table
//!     │
//!     ▼
//! [Vm over output.txt] ─▶ result.txt (+ error.txt trace)
//! ```
//!
//! The driver wires the phases together around one shared symbol table,
//! writes every artifact even when the source had errors, then (unless told
//! otherwise) executes the generated program on the target machine.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser as CliParser;

use cmc_gen::CodeGen;
use cmc_lex::{Scanner, SourceBuffer};
use cmc_par::Grammar;
use cmc_vm::Vm;

/// Compiler artifact file names, fixed by contract.
pub const TOKENS_FILE: &str = "tokens.txt";
pub const LEXICAL_ERRORS_FILE: &str = "lexical_errors.txt";
pub const SYMBOL_TABLE_FILE: &str = "symbol_table.txt";
pub const SYNTAX_ERRORS_FILE: &str = "syntax_errors.txt";
pub const PARSE_TREE_FILE: &str = "parse_tree.txt";
pub const OUTPUT_FILE: &str = "output.txt";

/// Compile a C-minus source file and execute it on the target machine.
#[derive(Debug, CliParser)]
#[command(name = "cmc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "C-minus compiler and target-machine runner", long_about = None)]
pub struct Cli {
    /// Source file to compile
    #[arg(short = 'i', long = "input", default_value = "input.txt")]
    pub input: PathBuf,

    /// Program-output file written by the executed program
    #[arg(short = 'o', long = "output", default_value = "result.txt")]
    pub output: PathBuf,

    /// Execution-trace file written by the target machine
    #[arg(short = 'e', long = "error", default_value = "error.txt")]
    pub error: PathBuf,

    /// Directory the compiler artifacts are written into
    #[arg(long = "outdir", default_value = ".")]
    pub outdir: PathBuf,

    /// Directory holding grammar.txt/first.txt/follow.txt overriding the
    /// built-in grammar
    #[arg(long = "grammar-dir")]
    pub grammar_dir: Option<PathBuf>,

    /// Stop after compilation; skip the target machine
    #[arg(long = "no-exec")]
    pub no_exec: bool,

    /// Verbose phase logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// What a compilation left behind.
#[derive(Debug)]
pub struct CompileOutcome {
    pub lexical_errors: usize,
    pub syntax_errors: usize,
    pub codegen_defects: usize,
    /// The exported program text, ready for the target machine.
    pub program: String,
}

/// Runs the full front end over `input`, writing all six artifact files
/// into `outdir`.
pub fn compile(input: &Path, outdir: &Path, grammar: &Grammar) -> anyhow::Result<CompileOutcome> {
    tracing::info!(input = %input.display(), "compiling");

    let buffer = SourceBuffer::open(input)
        .with_context(|| format!("cannot open input file {}", input.display()))?;
    let mut scanner = Scanner::new(buffer);
    let mut codegen = CodeGen::new(scanner.symbol_table_mut());

    let mut parser = cmc_par::Parser::new(grammar, scanner, &mut codegen)?;
    let tree = parser.parse();
    let (scanner, syntax_errors) = parser.into_parts();
    let (symbols, tokens, lexical_errors) = scanner.into_parts();

    codegen.set_exec_block("main", &symbols);

    tokens.save(&outdir.join(TOKENS_FILE))?;
    lexical_errors.save(&outdir.join(LEXICAL_ERRORS_FILE))?;
    symbols.save_listing(&outdir.join(SYMBOL_TABLE_FILE))?;
    syntax_errors.save(&outdir.join(SYNTAX_ERRORS_FILE))?;
    tree.save(&outdir.join(PARSE_TREE_FILE))?;
    codegen.export(&outdir.join(OUTPUT_FILE))?;

    tracing::info!(
        lexical = lexical_errors.len(),
        syntax = syntax_errors.entries().len(),
        defects = codegen.defects().len(),
        lines = codegen.program().len(),
        "compilation finished"
    );

    Ok(CompileOutcome {
        lexical_errors: lexical_errors.len(),
        syntax_errors: syntax_errors.entries().len(),
        codegen_defects: codegen.defects().len(),
        program: codegen.program().render(),
    })
}

/// Executes an exported program, writing the PRINT channel to `result` and
/// the step trace to `error`.
pub fn execute(program: &str, result: &Path, error: &Path) -> anyhow::Result<()> {
    tracing::info!(result = %result.display(), "executing");
    let mut out = BufWriter::new(
        File::create(result)
            .with_context(|| format!("cannot create result file {}", result.display()))?,
    );
    let mut trace = BufWriter::new(
        File::create(error)
            .with_context(|| format!("cannot create error file {}", error.display()))?,
    );
    let mut vm = Vm::new();
    vm.run(program, &mut out, &mut trace)
        .context("target machine refused the program")?;
    Ok(())
}

/// The whole `cmc` run: load grammar, compile, optionally execute.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let grammar = match &cli.grammar_dir {
        Some(dir) => Grammar::from_files(
            &dir.join("grammar.txt"),
            &dir.join("first.txt"),
            &dir.join("follow.txt"),
        )?,
        None => Grammar::builtin()?,
    };

    let outcome = compile(&cli.input, &cli.outdir, &grammar)?;
    if cli.no_exec {
        return Ok(());
    }
    execute(&outcome.program, &cli.output, &cli.error)
}
