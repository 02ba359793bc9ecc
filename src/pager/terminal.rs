//! Terminal geometry and raw-mode keypress handling.
//!
//! Raw/no-echo mode is modeled as a drop guard so the terminal is restored on
//! every exit path out of a keypress wait, including cancellation and panics.

use crate::pager::{KeyAction, PromptSource};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Terminal geometry in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub rows: u16,
    pub cols: u16,
}

/// Fallback geometry when the query fails or output is not a terminal.
pub const FALLBACK_SIZE: TerminalSize = TerminalSize { rows: 24, cols: 80 };

/// Query the controlling terminal's size, falling back to 24x80.
///
/// Queried on demand and never cached, so a caller constructing a new pager
/// after a resize sees the current geometry.
pub fn terminal_size() -> TerminalSize {
    match crossterm::terminal::size() {
        Ok((cols, rows)) => TerminalSize { rows, cols },
        Err(_) => FALLBACK_SIZE,
    }
}

/// Scoped raw/no-echo terminal mode.
///
/// Exactly one region is active at a time, wrapped around each keypress wait.
/// Restoration runs in `drop`, so no return path can leave raw mode enabled.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Keypress source backed by the real terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl PromptSource for TerminalPrompt {
    fn wait_keypress(&mut self) -> KeyAction {
        let _guard = match RawModeGuard::enable() {
            Ok(guard) => guard,
            // No raw mode means no reliable keypress wait; treat as quit so
            // the caller stops paging instead of spinning.
            Err(_) => return KeyAction::Quit,
        };

        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    return match (key.code, key.modifiers) {
                        (KeyCode::Char('q') | KeyCode::Char('Q'), _) | (KeyCode::Esc, _) => {
                            KeyAction::Quit
                        }
                        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
                        _ => KeyAction::Advance,
                    };
                }
                // Resize or mouse noise is not a keypress; keep waiting.
                Ok(_) => continue,
                Err(_) => return KeyAction::Quit,
            }
        }
    }
}
