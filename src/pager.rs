//! Output pagination against terminal height.
//!
//! The [`Pager`] consumes formatted text lines, counts them against a page
//! height, and blocks for a single raw-mode keypress between pages. It moves
//! through three states: accumulating lines, awaiting input at a page break,
//! and cancelled. Cancellation is an ordinary control-flow value
//! ([`PageFlow::Cancelled`]) returned from the output calls, never an error:
//! the driving loop checks it and stops emitting for the current source.
//!
//! Both the output sink and the keypress source are injected, so the pager has
//! no hidden dependency on process-global stdout or the real terminal and can
//! be driven from tests with a capturing sink and scripted keypresses.

pub mod terminal;

pub use terminal::{terminal_size, TerminalPrompt, TerminalSize};

use crate::error::Result;
use crate::reader::SizeCategory;
use std::io::Write;

/// Inverse-video pause prompt shown at a page break.
const MORE_PROMPT: &str = "\x1b[7m-- More --\x1b[0m";
/// Moves to column 1 and erases the pause prompt.
const ERASE_PROMPT: &str = "\x1b[1G\x1b[K";
/// Page height used when the terminal reports zero rows.
const DEFAULT_PAGE_LINES: usize = 20;
/// Rows reserved for the pause prompt and its erasure.
const RESERVED_ROWS: u16 = 2;

/// When to route output through the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagerMode {
    /// Page when output is a terminal and the source is not Small
    #[default]
    Auto,
    /// Always page
    Always,
    /// Never page
    Never,
}

/// Decide whether a source's output should be paginated.
pub fn should_page(mode: PagerMode, category: SizeCategory, is_tty: bool) -> bool {
    match mode {
        PagerMode::Always => true,
        PagerMode::Never => false,
        PagerMode::Auto => is_tty && category != SizeCategory::Small,
    }
}

/// Outcome of an output call: keep feeding lines, or stop for this source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFlow {
    Continue,
    /// The user quit the pager. Not an error: the caller stops emitting for
    /// the current source and proceeds as if it were finished.
    Cancelled,
}

/// What the user pressed at a page break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Advance,
    Quit,
}

/// Source of the single keypress awaited at each page break.
///
/// Implementations must restore the terminal to its prior settings on every
/// exit path before returning; the pager itself never touches terminal mode.
pub trait PromptSource {
    fn wait_keypress(&mut self) -> KeyAction;
}

/// Pagination state machine over an injected sink.
pub struct Pager {
    sink: Box<dyn Write>,
    prompt: Box<dyn PromptSource>,
    page_lines: usize,
    show_line_numbers: bool,
    lines_output: u64,
    lines_since_pause: usize,
    cancelled: bool,
}

impl Pager {
    /// Create a pager for one output session.
    ///
    /// With `page_lines: None` the height derives from the terminal: rows
    /// minus two (reserved for the prompt and its erasure), clamped to at
    /// least 1, with a fallback of 20 when the terminal reports zero rows.
    /// The terminal is queried once here, not per line.
    pub fn new(
        sink: Box<dyn Write>,
        prompt: Box<dyn PromptSource>,
        page_lines: Option<usize>,
        show_line_numbers: bool,
    ) -> Self {
        Self {
            sink,
            prompt,
            page_lines: Self::resolve_page_lines(page_lines, terminal_size()),
            show_line_numbers,
            lines_output: 0,
            lines_since_pause: 0,
            cancelled: false,
        }
    }

    fn resolve_page_lines(explicit: Option<usize>, size: TerminalSize) -> usize {
        match explicit {
            Some(height) => height.max(1),
            None if size.rows == 0 => DEFAULT_PAGE_LINES,
            None => (size.rows.saturating_sub(RESERVED_ROWS) as usize).max(1),
        }
    }

    /// Append one line and its terminator, pausing first when a full page has
    /// been emitted since the last pause.
    pub fn output_line(&mut self, text: &str) -> Result<PageFlow> {
        self.emit(None, text)
    }

    /// Like [`output_line`], prefixing a fixed-width right-aligned line number
    /// field when the pager was constructed with line numbers enabled.
    ///
    /// [`output_line`]: Pager::output_line
    pub fn output_line_number(&mut self, text: &str, line_number: u64) -> Result<PageFlow> {
        self.emit(Some(line_number), text)
    }

    fn emit(&mut self, line_number: Option<u64>, text: &str) -> Result<PageFlow> {
        if self.cancelled {
            return Ok(PageFlow::Cancelled);
        }

        // Pause before the line that would overflow the page, so a source
        // that fits exactly never pauses.
        if self.lines_since_pause >= self.page_lines {
            if self.await_keypress()? == KeyAction::Quit {
                self.cancelled = true;
                return Ok(PageFlow::Cancelled);
            }
            self.lines_since_pause = 0;
        }

        if let (Some(number), true) = (line_number, self.show_line_numbers) {
            write!(self.sink, "{number:>6}  ")?;
        }
        self.sink.write_all(text.as_bytes())?;
        self.sink.write_all(b"\n")?;

        self.lines_output += 1;
        self.lines_since_pause += 1;
        Ok(PageFlow::Continue)
    }

    fn await_keypress(&mut self) -> Result<KeyAction> {
        self.sink.write_all(MORE_PROMPT.as_bytes())?;
        self.sink.flush()?;

        let action = self.prompt.wait_keypress();

        self.sink.write_all(ERASE_PROMPT.as_bytes())?;
        self.sink.flush()?;
        Ok(action)
    }

    /// Deliver buffered output to the sink. No pagination side effects.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// End the session: flushes only, never forces an extra pause.
    pub fn finalize(&mut self) -> Result<()> {
        self.flush()
    }

    /// Total lines emitted this session.
    pub fn lines_output(&self) -> u64 {
        self.lines_output
    }

    /// True once the user quit the pager; no further output is accepted.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
