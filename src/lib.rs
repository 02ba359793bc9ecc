//! # rcat - Terminal Text Viewer
//!
//! A terminal text viewer that reads files line-by-line and renders them with
//! optional syntax highlighting, tabular alignment, and built-in pagination.
//!
//! ## Features
//!
//! - **Adaptive file access**: small files are loaded whole for cheap restarts,
//!   medium and large files stream through a buffered cursor
//! - **Built-in pager**: less-like `-- More --` pauses sized to the terminal,
//!   with `q`/Esc cancellation that never leaves the terminal in raw mode
//! - **Syntax highlighting**: lightweight single-pass tokenizers for C/C++,
//!   Python, Markdown, and JSON
//! - **Table alignment**: CSV and Markdown tables rendered as aligned grids,
//!   including a 256-color rainbow CSV mode
//!
//! ## Architecture
//!
//! The library is organized into focused modules:
//!
//! - [`error`] - Centralized error types and handling
//! - [`reader`] - Size classification and the two line-reading strategies
//! - [`pager`] - Terminal geometry, pagination, and keypress handling
//! - [`highlight`] - Per-language line tokenizers
//! - [`theme`] - Token styling and ANSI escape tables
//! - [`table`] - CSV and Markdown table parsing and alignment
//! - [`app`] - Per-source output loop coordinating the components

// Core modules
pub mod error;
pub mod pager;
pub mod reader;

// Text transformation layers
pub mod highlight;
pub mod table;
pub mod theme;

// CLI surface and driver
pub mod app;
pub mod cli;

// Re-export commonly used types for convenience
pub use error::{RcatError, Result};

// Public API surface for external usage
pub use pager::{Pager, PagerMode, PageFlow};
pub use reader::{LineReader, ReadResult, SizeCategory};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
