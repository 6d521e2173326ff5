//! # kamailio-cfg
//!
//! Lossless syntax trees for the Kamailio SIP server configuration
//! language (`kamailio.cfg`), for editors, linters, and refactoring
//! tools.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! parser    → scanner + logos lexer, grammar, CST, typed AST layer
//!   ↓
//! language  → declarative rule table, precedence, external tokens
//!   ↓
//! base      → primitives (LineIndex, TextRange)
//! ```
//!
//! ## Quick start
//!
//! ```
//! use kamailio_cfg::{parse, AstNode, ConfigFile};
//!
//! let tree = parse("request_route {\n    exit;\n}\n");
//! assert!(tree.ok());
//!
//! let file = ConfigFile::cast(tree.syntax()).unwrap();
//! let route = file.routes().next().unwrap();
//! assert_eq!(route.keyword().unwrap().text(), "request_route");
//! ```
//!
//! Parsing never fails: malformed input yields a tree with error nodes
//! and diagnostics, so tooling can still see the rest of the file. The
//! compiled language descriptor ([`language()`]) is a process-wide,
//! read-only singleton; concurrent parses share it, each with its own
//! lexer state.

// ============================================================================
// MODULES (dependency order: base → language → parser)
// ============================================================================

/// Foundation types: LineIndex, TextRange
pub mod base;

/// The compiled language descriptor: rules, precedence, external tokens
pub mod language;

/// Parser: external scanner, logos lexer, grammar, CST, AST layer
pub mod parser;

// Re-export commonly needed items
pub use parser::keywords;

pub use base::{LineCol, LineIndex, TextRange, TextSize};
pub use language::{GrammarError, Language, language};
pub use parser::{
    AstNode, ConfigFile, ErrorCode, Parse, Severity, SyntaxError, SyntaxKind, SyntaxNode,
    SyntaxToken, parse, tokenize,
};
