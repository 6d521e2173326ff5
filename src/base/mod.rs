//! Foundation types for position handling.
//!
//! This module provides the types tools need to turn byte offsets from
//! the syntax tree into editor coordinates:
//! - [`TextRange`], [`TextSize`] - source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//!
//! This module has NO dependencies on other modules of the crate.

mod line_index;

pub use line_index::{LineCol, LineIndex};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
