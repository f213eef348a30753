//! Parse-tree nodes and the box-drawing printer.

use std::io::{self, Write};
use std::path::Path;

use cmc_util::error::{ReportError, ReportResult};

/// One parse-tree node: interior nodes are nonterminal names, leaves are
/// `(CLASS, lexeme)` token labels, `epsilon`, or `$`.
#[derive(Debug, Clone)]
pub struct ParseNode {
    pub label: String,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: ParseNode) {
        self.children.push(child);
    }

    /// Renders the familiar `├── `/`└── ` tree. The root line carries no
    /// joint and its children no continuation bar.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.collect_lines("", true, true, &mut lines);
        lines
    }

    fn collect_lines(&self, prefix: &str, is_last: bool, is_root: bool, out: &mut Vec<String>) {
        let joint = if is_root {
            ""
        } else if is_last {
            "└── "
        } else {
            "├── "
        };
        out.push(format!("{prefix}{joint}{}", self.label));
        let child_prefix = if is_root {
            prefix.to_string()
        } else if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        for (index, child) in self.children.iter().enumerate() {
            let last = index == self.children.len() - 1;
            child.collect_lines(&child_prefix, last, false, out);
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.to_lines() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> ReportResult<()> {
        let wrap = |source| ReportError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };
        let mut out = io::BufWriter::new(std::fs::File::create(path).map_err(wrap)?);
        self.write_to(&mut out).map_err(wrap)
    }
}
