//! Chunked character source with one byte of lookahead.
//!
//! Reads the input in fixed-size chunks and refills transparently when a
//! chunk is exhausted, so the scanner only ever sees `peek`/`advance`. The
//! line counter starts at 1 and increments *after* a linefeed is emitted:
//! the `\n` itself still reports the line it terminates.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// A buffered byte source tracking source line numbers.
pub struct SourceBuffer<R: Read> {
    reader: R,
    chunk: Vec<u8>,
    pos: usize,
    line: u32,
    eof: bool,
}

impl SourceBuffer<File> {
    /// Opens a file as a source buffer.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<'a> SourceBuffer<&'a [u8]> {
    /// Wraps an in-memory source, mostly for tests.
    pub fn from_str(source: &'a str) -> Self {
        Self::new(source.as_bytes())
    }
}

impl<R: Read> SourceBuffer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Smaller chunks exercise the refill path in tests.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: Vec::with_capacity(chunk_size.max(1)),
            pos: 0,
            line: 1,
            eof: false,
        }
    }

    fn refill(&mut self) {
        let capacity = self.chunk.capacity().max(1);
        self.chunk.clear();
        self.chunk.resize(capacity, 0);
        self.pos = 0;
        match self.reader.read(&mut self.chunk) {
            Ok(0) | Err(_) => {
                self.eof = true;
                self.chunk.clear();
            }
            Ok(n) => self.chunk.truncate(n),
        }
    }

    /// True while at least one more byte is available.
    pub fn has_next(&mut self) -> bool {
        if self.pos < self.chunk.len() {
            return true;
        }
        if !self.eof {
            self.refill();
            return self.pos < self.chunk.len();
        }
        false
    }

    /// The next byte and its line, without consuming it.
    pub fn peek(&mut self) -> Option<(u8, u32)> {
        if !self.has_next() {
            return None;
        }
        Some((self.chunk[self.pos], self.line))
    }

    /// Consumes and returns the next byte and its line.
    pub fn advance(&mut self) -> Option<(u8, u32)> {
        let (byte, line) = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
        }
        Some((byte, line))
    }

    /// The line the *next* byte belongs to (or the last line at EOF).
    pub fn line(&self) -> u32 {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut buf = SourceBuffer::from_str("ab");
        assert_eq!(buf.peek(), Some((b'a', 1)));
        assert_eq!(buf.peek(), Some((b'a', 1)));
        assert_eq!(buf.advance(), Some((b'a', 1)));
        assert_eq!(buf.peek(), Some((b'b', 1)));
    }

    #[test]
    fn newline_reports_its_own_line() {
        let mut buf = SourceBuffer::from_str("a\nb");
        assert_eq!(buf.advance(), Some((b'a', 1)));
        assert_eq!(buf.advance(), Some((b'\n', 1)));
        assert_eq!(buf.advance(), Some((b'b', 2)));
        assert_eq!(buf.advance(), None);
        assert!(!buf.has_next());
    }

    #[test]
    fn refills_across_chunks() {
        let source = "abcdefghij\nklmno";
        let mut buf = SourceBuffer::with_chunk_size(source.as_bytes(), 3);
        let mut collected = Vec::new();
        while let Some((byte, _)) = buf.advance() {
            collected.push(byte);
        }
        assert_eq!(collected, source.as_bytes());
        assert_eq!(buf.line(), 2);
    }

    #[test]
    fn empty_source() {
        let mut buf = SourceBuffer::from_str("");
        assert!(!buf.has_next());
        assert_eq!(buf.peek(), None);
        assert_eq!(buf.line(), 1);
    }
}
