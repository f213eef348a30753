//! Line-keyed report buffers for the compiler's output files.
//!
//! Every buffer accumulates in memory and serialises in one pass, keyed and
//! sorted by source line, so the files come out identical no matter in which
//! order a phase discovered its entries within a run.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{ReportError, ReportResult};
use crate::token::Token;

fn save_with<F>(path: &Path, write: F) -> ReportResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let wrap = |source| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let mut out = BufWriter::new(File::create(path).map_err(wrap)?);
    write(&mut out).map_err(wrap)?;
    Ok(())
}

/// Buffer behind `tokens.txt`.
///
/// One output line per source line that produced at least one token:
/// `L.\t (CLASS, lexeme) (CLASS, lexeme) ...`
#[derive(Debug, Default)]
pub struct TokenReport {
    lines: BTreeMap<u32, Vec<Token>>,
}

impl TokenReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: Token) {
        self.lines.entry(token.line).or_default().push(token);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All recorded tokens in line order, then discovery order within a line.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.lines.values().flatten()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (line, tokens) in &self.lines {
            write!(out, "{line}.\t")?;
            for token in tokens {
                write!(out, " {token}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> ReportResult<()> {
        save_with(path, |out| self.write_to(out))
    }
}

/// Buffer behind `lexical_errors.txt`.
///
/// Entries are `(lexeme, message)` pairs; the lexeme arrives already
/// truncated where the scanner's error class calls for it.
#[derive(Debug, Default)]
pub struct LexicalErrorReport {
    lines: BTreeMap<u32, Vec<(String, String)>>,
    count: usize,
}

impl LexicalErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: u32, lexeme: impl Into<String>, message: impl Into<String>) {
        self.lines
            .entry(line)
            .or_default()
            .push((lexeme.into(), message.into()));
        self.count += 1;
    }

    pub fn has_errors(&self) -> bool {
        self.count > 0
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if !self.has_errors() {
            return writeln!(out, "There is no lexical error.");
        }
        for (line, errors) in &self.lines {
            write!(out, "{line}.\t")?;
            for (lexeme, message) in errors {
                write!(out, " ({lexeme}, {message})")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> ReportResult<()> {
        save_with(path, |out| self.write_to(out))
    }
}

/// Buffer behind `syntax_errors.txt`.
///
/// Unlike the lexical report this one keeps plain discovery order; the parser
/// only ever moves forward, so discovery order is already line order.
#[derive(Debug, Default)]
pub struct SyntaxErrorReport {
    entries: Vec<String>,
}

impl SyntaxErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: u32, message: impl AsRef<str>) {
        self.entries
            .push(format!("#{line} : syntax error, {}", message.as_ref()));
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.entries.is_empty() {
            return writeln!(out, "There is no syntax error.");
        }
        for entry in &self.entries {
            writeln!(out, "{entry}")?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> ReportResult<()> {
        save_with(path, |out| self.write_to(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn render<F: Fn(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn token_report_groups_by_line() {
        let mut report = TokenReport::new();
        report.add(Token::new(TokenKind::Keyword, "void", 1));
        report.add(Token::new(TokenKind::Id, "main", 1));
        report.add(Token::new(TokenKind::Symbol, "{", 2));
        let text = render(|b| report.write_to(b));
        assert_eq!(text, "1.\t (KEYWORD, void) (ID, main)\n2.\t (SYMBOL, {)\n");
    }

    #[test]
    fn token_report_sorts_lines_numerically() {
        let mut report = TokenReport::new();
        report.add(Token::new(TokenKind::Num, "2", 10));
        report.add(Token::new(TokenKind::Num, "1", 2));
        let text = render(|b| report.write_to(b));
        assert!(text.starts_with("2.\t"));
        assert!(text.ends_with("10.\t (NUM, 2)\n"));
    }

    #[test]
    fn lexical_report_empty_message() {
        let report = LexicalErrorReport::new();
        let text = render(|b| report.write_to(b));
        assert_eq!(text, "There is no lexical error.\n");
    }

    #[test]
    fn lexical_report_format() {
        let mut report = LexicalErrorReport::new();
        report.add(4, "1a", "Invalid number");
        report.add(4, "@", "Invalid input");
        let text = render(|b| report.write_to(b));
        assert_eq!(text, "4.\t (1a, Invalid number) (@, Invalid input)\n");
    }

    #[test]
    fn syntax_report_formats_entries() {
        let mut report = SyntaxErrorReport::new();
        report.add(7, "missing ;");
        report.add(9, "illegal ID");
        let text = render(|b| report.write_to(b));
        assert_eq!(
            text,
            "#7 : syntax error, missing ;\n#9 : syntax error, illegal ID\n"
        );
    }

    #[test]
    fn syntax_report_empty_message() {
        let report = SyntaxErrorReport::new();
        let text = render(|b| report.write_to(b));
        assert_eq!(text, "There is no syntax error.\n");
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.txt");
        let mut report = TokenReport::new();
        report.add(Token::new(TokenKind::Id, "x", 1));
        report.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.\t (ID, x)\n");
    }
}
