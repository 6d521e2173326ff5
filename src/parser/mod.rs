//! Rowan-based parser for the Kamailio configuration language
//!
//! This module provides a lossless parser using:
//! - **logos** for the declarative terminal patterns
//! - a hand-written external scanner for context-sensitive lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! This is the rust-analyzer approach: we build a lossless CST that
//! preserves all whitespace and comments, then offer a typed AST layer on
//! top.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Scanner + Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser (grammar modules) → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers and byte ranges
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! Malformed input never aborts a parse: lexical and syntactic problems
//! become error tokens/nodes in the tree plus diagnostics on the
//! [`Parse`] result.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod errors;
pub(crate) mod grammar;
pub mod keywords;
mod lexer;
pub mod scanner;
mod syntax_kind;
mod token_set;

pub use ast::*;
pub use errors::{ErrorCode, Severity, SyntaxError};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, parse};
pub use scanner::{LexMode, LexerState};
pub use syntax_kind::{
    KamailioLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken,
};
pub use token_set::TokenSet;

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
