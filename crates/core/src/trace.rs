//! Trace file parsing.
//!
//! A trace is a plain-text file of memory references, one per line:
//!
//! ```text
//! # <type> <address> <instruction-count> [pc]
//! ```
//!
//! `<type>` is `0` (read), `1` (write), or `2` (instruction fetch).
//! `<address>` and the optional `[pc]` are hexadecimal (with or without a
//! `0x` prefix); `<instruction-count>` is the decimal number of
//! instructions retired since the previous memory reference. Blank lines
//! are skipped. When `[pc]` is absent the record's `pc` is zero for data
//! references and the address itself for instruction fetches.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TraceError;

/// The kind of memory reference a trace record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// An instruction fetch, routed to the L1 instruction cache.
    InstructionFetch,
    /// A data read.
    Read,
    /// A data write.
    Write,
}

impl AccessKind {
    /// Whether this reference dirties the line it touches.
    pub fn is_write(self) -> bool {
        self == Self::Write
    }
}

/// One parsed trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    /// Program counter of the referencing instruction.
    pub pc: u64,
    /// Referenced byte address.
    pub addr: u64,
    /// Reference kind.
    pub kind: AccessKind,
    /// Instructions retired since the previous record.
    pub instructions: u64,
}

/// Streaming iterator over the records of a trace.
pub struct TraceReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps an already buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    fn parse_line(&self) -> Result<AccessRecord, TraceError> {
        let malformed = || TraceError::Malformed {
            line: self.line_no,
            text: self.buf.trim_end().to_string(),
        };

        let mut tokens = self.buf.split_whitespace();
        if tokens.next() != Some("#") {
            return Err(malformed());
        }
        let kind = match tokens.next() {
            Some("0") => AccessKind::Read,
            Some("1") => AccessKind::Write,
            Some("2") => AccessKind::InstructionFetch,
            _ => return Err(malformed()),
        };
        let addr = tokens
            .next()
            .and_then(parse_hex)
            .ok_or_else(malformed)?;
        let instructions = tokens
            .next()
            .and_then(|t| t.parse::<u64>().ok())
            .ok_or_else(malformed)?;
        let pc = match tokens.next() {
            Some(token) => parse_hex(token).ok_or_else(malformed)?,
            None if kind == AccessKind::InstructionFetch => addr,
            None => 0,
        };
        if tokens.next().is_some() {
            return Err(malformed());
        }

        Ok(AccessRecord {
            pc,
            addr,
            kind,
            instructions,
        })
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<AccessRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
            self.line_no += 1;
            if self.buf.trim().is_empty() {
                continue;
            }
            return Some(self.parse_line());
        }
    }
}

fn parse_hex(token: &str) -> Option<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16).ok()
}
