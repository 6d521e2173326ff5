//! Parse diagnostics
//!
//! Lexical and syntactic failures are data, not control flow: the lexer and
//! parser always produce a tree and record what went wrong here. Error codes
//! follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (braces, parentheses, semicolons)
//! - E03xx: Statement errors
//! - E04xx: Expression errors
//! - E09xx: Generic/fallback errors

use std::fmt;

use text_size::TextRange;

use super::syntax_kind::SyntaxKind;

/// Error codes for parse diagnostics
///
/// Each code represents a specific category of error, enabling filtering,
/// documentation, and IDE integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,
    /// Unterminated block comment
    E0103,
    /// Unterminated pseudo-variable
    E0104,

    /// Missing semicolon
    E0201,
    /// Unclosed brace `{`
    E0202,
    /// Unclosed parenthesis `(`
    E0203,
    /// Unclosed bracket `[`
    E0204,
    /// Missing `=` in assignment
    E0205,

    /// Expected a statement
    E0301,
    /// Expected a top-level item
    E0302,
    /// Malformed route header
    E0303,
    /// Malformed case label
    E0304,

    /// Expected an expression
    E0401,
    /// Malformed argument list
    E0402,

    /// Generic fallback
    E0999,
}

impl ErrorCode {
    /// The code a missing closing/separator token maps to
    pub fn for_missing(kind: SyntaxKind) -> ErrorCode {
        match kind {
            SyntaxKind::SEMICOLON => ErrorCode::E0201,
            SyntaxKind::R_BRACE | SyntaxKind::L_BRACE => ErrorCode::E0202,
            SyntaxKind::R_PAREN | SyntaxKind::L_PAREN => ErrorCode::E0203,
            SyntaxKind::R_BRACKET | SyntaxKind::L_BRACKET => ErrorCode::E0204,
            SyntaxKind::EQ => ErrorCode::E0205,
            _ => ErrorCode::E0999,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// A hard error that prevents valid parsing
    #[default]
    Error,
    /// A warning that doesn't prevent parsing
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A syntax error with location, message, and category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable error message
    pub message: String,
    /// Source location
    pub range: TextRange,
    /// Categorized error code
    pub code: ErrorCode,
    /// Error severity
    pub severity: Severity,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            severity: Severity::Error,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Format the error for display: `E0102: unterminated string literal`
    pub fn format(&self) -> String {
        format!("{}: {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextSize;

    #[test]
    fn test_format() {
        let err = SyntaxError::new(
            "unterminated string literal",
            TextRange::empty(TextSize::new(4)),
            ErrorCode::E0102,
        );
        assert_eq!(err.format(), "E0102: unterminated string literal");
        assert!(err.severity.is_error());
    }

    #[test]
    fn test_code_for_missing() {
        assert_eq!(
            ErrorCode::for_missing(SyntaxKind::SEMICOLON),
            ErrorCode::E0201
        );
        assert_eq!(ErrorCode::for_missing(SyntaxKind::R_PAREN), ErrorCode::E0203);
        assert_eq!(ErrorCode::for_missing(SyntaxKind::IDENT), ErrorCode::E0999);
    }
}
