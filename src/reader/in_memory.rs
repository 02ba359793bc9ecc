//! Whole-file reader for small sources.
//!
//! Loads the entire byte content into one owned buffer at construction and
//! scans it with `memchr` on each read. Construction cost is O(size), but
//! restarts and seeks afterwards never touch the filesystem again, which is
//! what makes this the right strategy for sources that get re-read (table
//! parsing does a collect pass, then the fallback path rewinds).

use crate::reader::{FileInfo, ReadResult};
use std::io;

/// In-memory line reader used for Small sources.
#[derive(Debug)]
pub struct WholeFileReader {
    info: FileInfo,
    content: Vec<u8>,
    offset: usize,
    line_number: u64,
}

impl WholeFileReader {
    /// Load the file behind `info` into memory. Fails only when the content
    /// cannot be read; the factory falls back to the streaming strategy then.
    pub fn load(info: FileInfo) -> io::Result<Self> {
        let content = std::fs::read(&info.path)?;
        Ok(Self::from_bytes(info, content))
    }

    /// Build a reader over an already-owned buffer. Used by `load` and by
    /// tests that want to drive the scanner without a file.
    pub fn from_bytes(info: FileInfo, content: Vec<u8>) -> Self {
        Self {
            info,
            content,
            offset: 0,
            line_number: 0,
        }
    }

    /// Next line without its terminator, or the idempotent EOF marker.
    ///
    /// A missing trailing newline still yields the final span as a valid line.
    /// Bytes are passed through; invalid UTF-8 is replaced, not rejected.
    pub fn read_line(&mut self) -> ReadResult {
        if self.offset >= self.content.len() {
            return ReadResult::eof(self.line_number);
        }

        let rest = &self.content[self.offset..];
        let (span, advance) = match memchr::memchr(b'\n', rest) {
            Some(pos) => (&rest[..pos], pos + 1),
            None => (rest, rest.len()),
        };

        let text = String::from_utf8_lossy(span).into_owned();
        self.offset += advance;
        self.line_number += 1;
        ReadResult::line(text, self.line_number)
    }

    /// Position the cursor just past line `target`. Backward targets rewind
    /// and rescan the buffer; no IO happens either way. Returns `false` when
    /// the target is past the end of the content.
    pub fn seek(&mut self, target: u64) -> bool {
        if target == 0 {
            self.rewind();
            return true;
        }

        if target < self.line_number {
            self.rewind();
        }

        while self.line_number < target {
            if self.read_line().is_eof {
                return false;
            }
        }
        true
    }

    /// Reset the cursor and line counter to the start of the buffer.
    pub fn rewind(&mut self) {
        self.offset = 0;
        self.line_number = 0;
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }
}
