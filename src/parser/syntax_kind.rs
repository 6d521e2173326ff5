//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! The token block comes first so token kinds fit in a [`TokenSet`] bitmask;
//! composite node kinds follow. The `name()` strings are the stable
//! vocabulary shared with downstream tools (highlighters, linters).
//!
//! [`TokenSet`]: super::token_set::TokenSet

/// All syntax kinds (tokens and nodes) in the Kamailio configuration language
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation, lexical
/// classes produced by the external scanner). Nodes are composite
/// (route blocks, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    NEWLINE,
    LINE_CONTINUATION,  // backslash immediately followed by a newline
    LINE_COMMENT,       // # ...
    DEPRECATED_COMMENT, // // ...
    BLOCK_COMMENT,      // /* ... */, nesting-aware

    // =========================================================================
    // LITERALS & LEXICAL CLASSES
    // =========================================================================
    IDENT,          // identifier, core parameter name, module function name
    NUMBER,         // 42, 0x1F, 3.14
    STRING_OPEN,    // opening "
    STRING_CONTENT, // literal text between interpolation points
    STRING_CLOSE,   // closing "
    DOLLAR_ESCAPE,  // $$ inside a string
    PVAR,           // $ru, $avp(s:x), $(hdr(From)[0]{s.len})
    DIRECTIVE,      // #!define NAME 1 (whole logical line)

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,    // {
    R_BRACE,    // }
    L_BRACKET,  // [
    R_BRACKET,  // ]
    L_PAREN,    // (
    R_PAREN,    // )
    SEMICOLON,  // ;
    COLON,      // :
    COMMA,      // ,
    DOT,        // .
    EQ,         // =
    EQ_EQ,      // ==
    BANG_EQ,    // !=
    EQ_TILDE,   // =~ (regex match)
    BANG_TILDE, // !~
    LT,         // <
    GT,         // >
    LT_EQ,      // <=
    GT_EQ,      // >=
    AMP_AMP,    // &&
    PIPE_PIPE,  // ||
    BANG,       // !
    PLUS,       // +
    MINUS,      // -
    STAR,       // *
    SLASH,      // /
    PERCENT,    // %
    AMP,        // &
    PIPE,       // |

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    // Control flow
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    SWITCH_KW,
    CASE_KW,
    DEFAULT_KW,
    BREAK_KW,
    RETURN_KW,
    EXIT_KW,
    DROP_KW,

    // Route block flavors
    ROUTE_KW,
    REQUEST_ROUTE_KW,
    REPLY_ROUTE_KW,
    ONREPLY_ROUTE_KW,
    FAILURE_ROUTE_KW,
    BRANCH_ROUTE_KW,
    ONSEND_ROUTE_KW,
    EVENT_ROUTE_KW,

    // Module/file loading
    LOADMODULE_KW,
    LOADPATH_KW,
    MODPARAM_KW,
    INCLUDE_FILE_KW,
    IMPORT_FILE_KW,

    // Lexical error: byte sequence no token class accepts
    ERROR_TOKEN,

    // =========================================================================
    // COMPOSITE NODES (non-terminals in the grammar)
    // =========================================================================
    // Root
    CONFIG_FILE,

    // Top-level items
    PREPROC_DIRECTIVE,
    TOP_LEVEL_ASSIGNMENT,
    PARAM_VALUE,
    LOAD_MODULE,
    LOAD_PATH,
    INCLUDE_FILE,
    MODPARAM,
    ROUTE_DECLARATION,
    ROUTE_NAME,

    // Statements
    COMPOUND_STATEMENT,
    IF_STATEMENT,
    ELSE_CLAUSE,
    WHILE_STATEMENT,
    SWITCH_STATEMENT,
    CASE_CLAUSE,
    DEFAULT_CLAUSE,
    RETURN_STATEMENT,
    BREAK_STATEMENT,
    EXIT_STATEMENT,
    DROP_STATEMENT,
    ROUTE_CALL_STATEMENT,
    EXPRESSION_STATEMENT,

    // Expressions
    ASSIGNMENT_EXPR,
    BINARY_EXPR,
    UNARY_EXPR,
    PAREN_EXPR,
    CALL_EXPR,
    ARGUMENT_LIST,
    PSEUDO_VARIABLE,
    STRING,

    // Syntactic error wrapper
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, continuation or comment)
    pub fn is_trivia(self) -> bool {
        (self as u16) <= (Self::BLOCK_COMMENT as u16)
    }

    /// Check if this is a token kind (as opposed to a composite node kind)
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::ERROR_TOKEN as u16)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::IF_KW as u16) && (self as u16) <= (Self::IMPORT_FILE_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::PIPE as u16)
    }

    /// Check if this keyword opens a route block
    pub fn is_route_keyword(self) -> bool {
        (self as u16) >= (Self::ROUTE_KW as u16) && (self as u16) <= (Self::EVENT_ROUTE_KW as u16)
    }

    /// Check if this kind marks an error (lexical token or syntactic node)
    pub fn is_error(self) -> bool {
        matches!(self, Self::ERROR_TOKEN | Self::ERROR)
    }

    /// Stable name for this kind, the vocabulary exposed to downstream tools.
    ///
    /// Node names follow the original grammar where it had one
    /// (`top_level_assignment_expression`, `pseudo_variable`, ...);
    /// punctuation and keywords use their literal text.
    pub fn name(self) -> &'static str {
        match self {
            SyntaxKind::WHITESPACE => "whitespace",
            SyntaxKind::NEWLINE => "newline",
            SyntaxKind::LINE_CONTINUATION => "line_continuation",
            SyntaxKind::LINE_COMMENT => "line_comment",
            SyntaxKind::DEPRECATED_COMMENT => "deprecated_comment",
            SyntaxKind::BLOCK_COMMENT => "block_comment",

            SyntaxKind::IDENT => "identifier",
            SyntaxKind::NUMBER => "number",
            SyntaxKind::STRING_OPEN => "string_open",
            SyntaxKind::STRING_CONTENT => "string_content",
            SyntaxKind::STRING_CLOSE => "string_close",
            SyntaxKind::DOLLAR_ESCAPE => "dollar_escape",
            SyntaxKind::PVAR => "pvar",
            SyntaxKind::DIRECTIVE => "directive",

            SyntaxKind::L_BRACE => "{",
            SyntaxKind::R_BRACE => "}",
            SyntaxKind::L_BRACKET => "[",
            SyntaxKind::R_BRACKET => "]",
            SyntaxKind::L_PAREN => "(",
            SyntaxKind::R_PAREN => ")",
            SyntaxKind::SEMICOLON => ";",
            SyntaxKind::COLON => ":",
            SyntaxKind::COMMA => ",",
            SyntaxKind::DOT => ".",
            SyntaxKind::EQ => "=",
            SyntaxKind::EQ_EQ => "==",
            SyntaxKind::BANG_EQ => "!=",
            SyntaxKind::EQ_TILDE => "=~",
            SyntaxKind::BANG_TILDE => "!~",
            SyntaxKind::LT => "<",
            SyntaxKind::GT => ">",
            SyntaxKind::LT_EQ => "<=",
            SyntaxKind::GT_EQ => ">=",
            SyntaxKind::AMP_AMP => "&&",
            SyntaxKind::PIPE_PIPE => "||",
            SyntaxKind::BANG => "!",
            SyntaxKind::PLUS => "+",
            SyntaxKind::MINUS => "-",
            SyntaxKind::STAR => "*",
            SyntaxKind::SLASH => "/",
            SyntaxKind::PERCENT => "%",
            SyntaxKind::AMP => "&",
            SyntaxKind::PIPE => "|",

            SyntaxKind::IF_KW => "if",
            SyntaxKind::ELSE_KW => "else",
            SyntaxKind::WHILE_KW => "while",
            SyntaxKind::SWITCH_KW => "switch",
            SyntaxKind::CASE_KW => "case",
            SyntaxKind::DEFAULT_KW => "default",
            SyntaxKind::BREAK_KW => "break",
            SyntaxKind::RETURN_KW => "return",
            SyntaxKind::EXIT_KW => "exit",
            SyntaxKind::DROP_KW => "drop",

            SyntaxKind::ROUTE_KW => "route",
            SyntaxKind::REQUEST_ROUTE_KW => "request_route",
            SyntaxKind::REPLY_ROUTE_KW => "reply_route",
            SyntaxKind::ONREPLY_ROUTE_KW => "onreply_route",
            SyntaxKind::FAILURE_ROUTE_KW => "failure_route",
            SyntaxKind::BRANCH_ROUTE_KW => "branch_route",
            SyntaxKind::ONSEND_ROUTE_KW => "onsend_route",
            SyntaxKind::EVENT_ROUTE_KW => "event_route",

            SyntaxKind::LOADMODULE_KW => "loadmodule",
            SyntaxKind::LOADPATH_KW => "loadpath",
            SyntaxKind::MODPARAM_KW => "modparam",
            SyntaxKind::INCLUDE_FILE_KW => "include_file",
            SyntaxKind::IMPORT_FILE_KW => "import_file",

            SyntaxKind::ERROR_TOKEN => "error_token",

            SyntaxKind::CONFIG_FILE => "config_file",
            SyntaxKind::PREPROC_DIRECTIVE => "preproc_directive",
            SyntaxKind::TOP_LEVEL_ASSIGNMENT => "top_level_assignment_expression",
            SyntaxKind::PARAM_VALUE => "param_value",
            SyntaxKind::LOAD_MODULE => "load_module",
            SyntaxKind::LOAD_PATH => "load_path",
            SyntaxKind::INCLUDE_FILE => "include_file_statement",
            SyntaxKind::MODPARAM => "modparam_declaration",
            SyntaxKind::ROUTE_DECLARATION => "route_declaration",
            SyntaxKind::ROUTE_NAME => "route_name",

            SyntaxKind::COMPOUND_STATEMENT => "compound_statement",
            SyntaxKind::IF_STATEMENT => "if_statement",
            SyntaxKind::ELSE_CLAUSE => "else_clause",
            SyntaxKind::WHILE_STATEMENT => "while_statement",
            SyntaxKind::SWITCH_STATEMENT => "switch_statement",
            SyntaxKind::CASE_CLAUSE => "case_statement",
            SyntaxKind::DEFAULT_CLAUSE => "default_statement",
            SyntaxKind::RETURN_STATEMENT => "return_statement",
            SyntaxKind::BREAK_STATEMENT => "break_statement",
            SyntaxKind::EXIT_STATEMENT => "exit_statement",
            SyntaxKind::DROP_STATEMENT => "drop_statement",
            SyntaxKind::ROUTE_CALL_STATEMENT => "route_call_statement",
            SyntaxKind::EXPRESSION_STATEMENT => "expression_statement",

            SyntaxKind::ASSIGNMENT_EXPR => "assignment_expression",
            SyntaxKind::BINARY_EXPR => "binary_expression",
            SyntaxKind::UNARY_EXPR => "unary_expression",
            SyntaxKind::PAREN_EXPR => "parenthesized_expression",
            SyntaxKind::CALL_EXPR => "call_expression",
            SyntaxKind::ARGUMENT_LIST => "argument_list",
            SyntaxKind::PSEUDO_VARIABLE => "pseudo_variable",
            SyntaxKind::STRING => "string",

            SyntaxKind::ERROR => "ERROR",

            SyntaxKind::__LAST => "__LAST",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KamailioLanguage {}

impl rowan::Language for KamailioLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<KamailioLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<KamailioLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<KamailioLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<KamailioLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ranges() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::BLOCK_COMMENT.is_trivia());
        assert!(!SyntaxKind::IDENT.is_trivia());
        assert!(SyntaxKind::ERROR_TOKEN.is_token());
        assert!(!SyntaxKind::CONFIG_FILE.is_token());
        assert!(SyntaxKind::FAILURE_ROUTE_KW.is_route_keyword());
        assert!(!SyntaxKind::MODPARAM_KW.is_route_keyword());
        assert!(SyntaxKind::EQ_TILDE.is_punct());
    }

    #[test]
    fn test_token_kinds_fit_token_set() {
        // TokenSet is a u128 bitmask; every token kind must stay below bit 128
        assert!((SyntaxKind::ERROR_TOKEN as u16) < 128);
    }

    #[test]
    fn test_raw_roundtrip() {
        let kind = SyntaxKind::ROUTE_DECLARATION;
        let raw: rowan::SyntaxKind = kind.into();
        assert_eq!(SyntaxKind::from(raw), kind);
    }

    #[test]
    fn test_names_follow_original_vocabulary() {
        assert_eq!(
            SyntaxKind::TOP_LEVEL_ASSIGNMENT.name(),
            "top_level_assignment_expression"
        );
        assert_eq!(SyntaxKind::PSEUDO_VARIABLE.name(), "pseudo_variable");
        assert_eq!(SyntaxKind::CALL_EXPR.name(), "call_expression");
        assert_eq!(SyntaxKind::IDENT.name(), "identifier");
    }
}
