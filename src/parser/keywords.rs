//! Keyword and directive enumerations
//!
//! The lexer resolves keywords through its own token patterns; the tables
//! here exist for tooling: completion lists, directive classification, and
//! the AST layer's `Directive::keyword()`.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use super::syntax_kind::SyntaxKind;

/// Keywords that open a route block
pub const ROUTE_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::ROUTE_KW,
    SyntaxKind::REQUEST_ROUTE_KW,
    SyntaxKind::REPLY_ROUTE_KW,
    SyntaxKind::ONREPLY_ROUTE_KW,
    SyntaxKind::FAILURE_ROUTE_KW,
    SyntaxKind::BRANCH_ROUTE_KW,
    SyntaxKind::ONSEND_ROUTE_KW,
    SyntaxKind::EVENT_ROUTE_KW,
];

/// Statement keywords
pub const STATEMENT_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::IF_KW,
    SyntaxKind::ELSE_KW,
    SyntaxKind::WHILE_KW,
    SyntaxKind::SWITCH_KW,
    SyntaxKind::CASE_KW,
    SyntaxKind::DEFAULT_KW,
    SyntaxKind::BREAK_KW,
    SyntaxKind::RETURN_KW,
    SyntaxKind::EXIT_KW,
    SyntaxKind::DROP_KW,
];

/// Preprocessor directive keywords, the word after `#!`.
///
/// `#!KAMAILIO` and `#!SER` mark the file dialect and carry no argument.
pub const DIRECTIVE_KEYWORDS: &[&str] = &[
    "define",
    "ifdef",
    "ifndef",
    "else",
    "endif",
    "trydef",
    "redefine",
    "substdef",
    "substdefs",
    "subst",
    "defenv",
    "defexp",
    "KAMAILIO",
    "SER",
];

static KEYWORD_KINDS: Lazy<FxHashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for &kind in ROUTE_KEYWORDS.iter().chain(STATEMENT_KEYWORDS) {
        map.insert(kind.name(), kind);
    }
    for kind in [
        SyntaxKind::LOADMODULE_KW,
        SyntaxKind::LOADPATH_KW,
        SyntaxKind::MODPARAM_KW,
        SyntaxKind::INCLUDE_FILE_KW,
        SyntaxKind::IMPORT_FILE_KW,
    ] {
        map.insert(kind.name(), kind);
    }
    map
});

/// Look up the keyword kind for an identifier, if it is one
pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    KEYWORD_KINDS.get(text).copied()
}

/// Whether `word` is a known `#!` directive keyword
pub fn is_directive_keyword(word: &str) -> bool {
    DIRECTIVE_KEYWORDS.contains(&word)
}
