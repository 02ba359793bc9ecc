//! Adaptive line-reading layer: size classification and the two reader strategies.
//!
//! Every source (a file path or stdin) is read through a [`LineReader`], which
//! yields lines one at a time with 1-based line numbers and an idempotent EOF
//! marker. The strategy behind a reader is picked once at construction from the
//! source's byte size:
//!
//! - `< 1 MiB` → [`WholeFileReader`]: the whole file is loaded into one buffer,
//!   so restarts and seeks never touch the filesystem again
//! - `>= 1 MiB` and stdin → [`BufferedStreamReader`]: sequential buffered
//!   reads; moving backwards rewinds to the start and replays forward
//!
//! Only these two strategies exist, so the reader is a closed enum rather than
//! a trait object.

pub mod in_memory;
pub mod streaming;

pub use in_memory::WholeFileReader;
pub use streaming::BufferedStreamReader;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// 1 MiB: below this a file is loaded whole into memory.
pub const SMALL_THRESHOLD: u64 = 1024 * 1024;
/// 100 MiB: at or above this a file is considered large.
pub const LARGE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Size category selecting the handling strategy for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCategory {
    /// < 1 MiB: loaded into memory for cheap restarts and seeks
    Small,
    /// 1 MiB - 100 MiB: streamed with a buffered cursor
    Medium,
    /// >= 100 MiB: streamed, paging recommended
    Large,
}

/// Map a byte size to its handling category.
///
/// Pure and total: exactly 1 MiB is `Medium`, exactly 100 MiB is `Large`.
/// Stdin is never classified by size; it always streams.
pub fn classify(byte_size: u64) -> SizeCategory {
    if byte_size < SMALL_THRESHOLD {
        SizeCategory::Small
    } else if byte_size < LARGE_THRESHOLD {
        SizeCategory::Medium
    } else {
        SizeCategory::Large
    }
}

/// Metadata about a source, derived once when the reader is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub category: SizeCategory,
}

impl FileInfo {
    /// Stat a path and classify it. A path that cannot be stat'ed reports
    /// size 0; the open failure itself is handled by the reader.
    pub fn for_path(path: &Path) -> Self {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Self {
            path: path.to_path_buf(),
            size,
            category: classify(size),
        }
    }

    /// FileInfo for the standard input stream, which is never size-classified.
    pub fn for_stdin() -> Self {
        Self {
            path: PathBuf::from("-"),
            size: 0,
            category: SizeCategory::Small,
        }
    }
}

/// One line produced by a reader, or the end-of-stream marker.
///
/// Line numbers are 1-based and non-decreasing across successive reads from
/// one reader instance. Exactly one result per pass carries `is_eof` (with
/// empty text and an unchanged line number), and every read after it returns
/// the same marker again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    pub text: String,
    pub line_number: u64,
    pub is_eof: bool,
}

impl ReadResult {
    pub(crate) fn line(text: String, line_number: u64) -> Self {
        Self {
            text,
            line_number,
            is_eof: false,
        }
    }

    pub(crate) fn eof(line_number: u64) -> Self {
        Self {
            text: String::new(),
            line_number,
            is_eof: true,
        }
    }
}

/// A line reader over a single source, dispatching to one of the two
/// strategies selected at construction.
#[derive(Debug)]
pub enum LineReader {
    Streaming(BufferedStreamReader),
    InMemory(WholeFileReader),
}

impl LineReader {
    /// Open a reader for a path, picking the strategy from the file's size
    /// category. `"-"` means stdin. Construction never fails: a source that
    /// cannot be opened yields a reader that is immediately exhausted, with a
    /// single diagnostic logged, so multi-file runs can continue.
    pub fn open(path: &Path) -> LineReader {
        if path.as_os_str() == "-" {
            return Self::stdin();
        }

        let info = FileInfo::for_path(path);
        match info.category {
            SizeCategory::Small => match WholeFileReader::load(info.clone()) {
                Ok(reader) => LineReader::InMemory(reader),
                // Last resort: the streaming strategy reports the open failure
                // and degrades to immediate EOF.
                Err(err) => {
                    log::debug!(
                        "whole-file load failed for {}, falling back to streaming: {err}",
                        path.display()
                    );
                    LineReader::Streaming(BufferedStreamReader::open(info))
                }
            },
            SizeCategory::Medium | SizeCategory::Large => {
                LineReader::Streaming(BufferedStreamReader::open(info))
            }
        }
    }

    /// Reader over the standard input stream. Always the streaming strategy.
    pub fn stdin() -> LineReader {
        LineReader::Streaming(BufferedStreamReader::stdin())
    }

    /// Read the next line (without its terminator), or the idempotent EOF
    /// marker once the source is exhausted. An `Err` means the read failed
    /// mid-stream for a reason other than normal EOF; the source path is
    /// attached to the error.
    pub fn read_line(&mut self) -> Result<ReadResult> {
        match self {
            LineReader::Streaming(r) => r.read_line(),
            LineReader::InMemory(r) => Ok(r.read_line()),
        }
    }

    /// Position the cursor just past line `target`, so the next `read_line`
    /// yields line `target + 1`. `seek(0)` is equivalent to [`rewind`].
    ///
    /// Forward seeks scan from the current position; backward seeks rewind to
    /// the start and replay, which is O(n) by design. Returns `false` when the
    /// target lies past the true end of the source.
    ///
    /// [`rewind`]: LineReader::rewind
    pub fn seek(&mut self, target: u64) -> bool {
        match self {
            LineReader::Streaming(r) => r.seek(target),
            LineReader::InMemory(r) => r.seek(target),
        }
    }

    /// Reset the cursor and line counter to the start of the source.
    pub fn rewind(&mut self) {
        match self {
            LineReader::Streaming(r) => r.rewind(),
            LineReader::InMemory(r) => r.rewind(),
        }
    }

    /// Metadata derived once when this reader was constructed.
    pub fn info(&self) -> &FileInfo {
        match self {
            LineReader::Streaming(r) => r.info(),
            LineReader::InMemory(r) => r.info(),
        }
    }

    /// True unless the source is classified `Small`.
    pub fn is_large(&self) -> bool {
        self.info().category != SizeCategory::Small
    }
}
