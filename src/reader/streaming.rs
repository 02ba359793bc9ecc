//! Buffered streaming reader for medium, large, and stdin sources.
//!
//! The source is opened once and read sequentially through a buffered cursor.
//! Backward movement re-seeks the underlying file to offset 0 and replays
//! forward, which is O(n) by design: the streaming strategy optimizes the
//! sequential read path and accepts the rewind cliff.

use crate::error::{RcatError, Result};
use crate::reader::{FileInfo, ReadResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};

/// The underlying byte source of a streaming reader.
enum StreamInput {
    File(BufReader<File>),
    Stdin(io::StdinLock<'static>),
}

impl std::fmt::Debug for StreamInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamInput::File(_) => f.write_str("StreamInput::File"),
            StreamInput::Stdin(_) => f.write_str("StreamInput::Stdin"),
        }
    }
}

/// Sequential line reader used for Medium and Large sources and stdin.
#[derive(Debug)]
pub struct BufferedStreamReader {
    info: FileInfo,
    input: Option<StreamInput>,
    line_number: u64,
}

impl BufferedStreamReader {
    /// Open a streaming reader over the file behind `info`.
    ///
    /// Never fails: a source that cannot be opened yields a reader that is
    /// immediately exhausted, with one warning logged here so multi-file
    /// processing can continue past it.
    pub fn open(info: FileInfo) -> Self {
        let input = match File::open(&info.path) {
            Ok(file) => Some(StreamInput::File(BufReader::new(file))),
            Err(err) => {
                log::warn!("cannot open {}: {err}", info.path.display());
                None
            }
        };
        Self {
            info,
            input,
            line_number: 0,
        }
    }

    /// Streaming reader over the standard input stream.
    pub fn stdin() -> Self {
        Self {
            info: FileInfo::for_stdin(),
            input: Some(StreamInput::Stdin(io::stdin().lock())),
            line_number: 0,
        }
    }

    /// Next line without its terminator, or the idempotent EOF marker.
    ///
    /// Blocking on stdin until data arrives or the stream closes is expected;
    /// reads from a regular file never block indefinitely. An `Err` is a
    /// mid-stream fault (not normal EOF) with the source path attached.
    pub fn read_line(&mut self) -> Result<ReadResult> {
        let Some(input) = self.input.as_mut() else {
            return Ok(ReadResult::eof(self.line_number));
        };

        let mut buf = Vec::new();
        let read = match input {
            StreamInput::File(reader) => reader.read_until(b'\n', &mut buf),
            StreamInput::Stdin(stdin) => stdin.read_until(b'\n', &mut buf),
        };
        let n = read.map_err(|e| RcatError::read_fault(&self.info.path, e))?;

        if n == 0 {
            return Ok(ReadResult::eof(self.line_number));
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }

        self.line_number += 1;
        Ok(ReadResult::line(
            String::from_utf8_lossy(&buf).into_owned(),
            self.line_number,
        ))
    }

    /// Position the cursor just past line `target`.
    ///
    /// Forward targets scan from the current position. Backward targets need
    /// a full rewind followed by a forward scan; on stdin the stream cannot be
    /// rewound, so a backward seek fails. Returns `false` when the target is
    /// past true EOF or the scan faults.
    pub fn seek(&mut self, target: u64) -> bool {
        if target == 0 {
            self.rewind();
            return true;
        }

        if target < self.line_number {
            if !self.can_rewind() {
                return false;
            }
            self.rewind();
        }

        while self.line_number < target {
            match self.read_line() {
                Ok(result) if result.is_eof => return false,
                Ok(_) => {}
                Err(err) => {
                    log::debug!("seek scan aborted: {err}");
                    return false;
                }
            }
        }
        true
    }

    /// Reset the cursor and line counter to the start.
    ///
    /// Stdin cannot be reopened: only the counter resets and subsequent reads
    /// continue from the current position. A file whose seek fails degrades
    /// to an exhausted reader, matching the open-failure policy.
    pub fn rewind(&mut self) {
        self.line_number = 0;
        if let Some(StreamInput::File(reader)) = self.input.as_mut() {
            if let Err(err) = reader.seek(SeekFrom::Start(0)) {
                log::warn!("rewind failed for {}: {err}", self.info.path.display());
                self.input = None;
            }
        }
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    fn can_rewind(&self) -> bool {
        matches!(self.input, Some(StreamInput::File(_)) | None)
    }
}
