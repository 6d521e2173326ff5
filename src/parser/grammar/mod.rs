//! Grammar modules for the Kamailio configuration language
//!
//! Parsing logic organized by construct family:
//! - this module - top-level file structure (directives, core parameters,
//!   module loading, `modparam`, route declarations)
//! - `routes` - route block headers
//! - `statements` - statement parsing with an explicit frame stack
//! - `expressions` - precedence-driven expression parsing and literals
//!
//! A configuration file is a sequence of top-level items in source order;
//! nothing is reordered, and trivia tokens stay in the tree.

pub(crate) mod expressions;
pub(crate) mod routes;
pub(crate) mod statements;

use super::errors::ErrorCode;
use super::parser::Parser;
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;

/// ConfigFile = (Directive | TopLevelAssignment | LoadModule | LoadPath
///             | IncludeFile | Modparam | RouteDeclaration)*
pub(crate) fn config_file(p: &mut Parser) {
    p.start_node(SyntaxKind::CONFIG_FILE);

    while !p.at_eof() {
        let pos_before = p.pos;
        p.skip_trivia();
        if p.at_eof() {
            break;
        }
        top_level_item(p);
        // Safety: if we didn't make progress, force-skip a token
        if p.pos == pos_before && !p.at_eof() {
            p.error(
                format!("stuck on token `{}`", p.current_text()),
                ErrorCode::E0302,
            );
            p.bump_any();
        }
    }

    p.finish_node();
}

fn top_level_item(p: &mut Parser) {
    match p.current_kind() {
        SyntaxKind::DIRECTIVE => preproc_directive(p),
        kind if kind.is_route_keyword() => routes::route_declaration(p),
        SyntaxKind::LOADMODULE_KW => load_statement(p, SyntaxKind::LOAD_MODULE),
        SyntaxKind::LOADPATH_KW => load_statement(p, SyntaxKind::LOAD_PATH),
        SyntaxKind::INCLUDE_FILE_KW | SyntaxKind::IMPORT_FILE_KW => {
            load_statement(p, SyntaxKind::INCLUDE_FILE)
        }
        SyntaxKind::MODPARAM_KW => modparam(p),
        SyntaxKind::IDENT if p.nth(1) == Some(SyntaxKind::EQ) => top_level_assignment(p),
        SyntaxKind::ERROR_TOKEN => p.bump_error_token(),
        _ => p.error_recover(
            format!("expected a top-level item, found `{}`", p.current_text()),
            ErrorCode::E0302,
            TokenSet::new(&[SyntaxKind::NEWLINE]),
        ),
    }
}

/// A `#!` preprocessor line, wherever it appears between two items.
/// The whole logical line is one token; directives are recognized
/// lexically only (no macro expansion).
pub(crate) fn preproc_directive(p: &mut Parser) {
    p.start_node(SyntaxKind::PREPROC_DIRECTIVE);
    p.bump();
    p.finish_node();
}

/// TopLevelAssignment = identifier `=` ParamValue
///
/// Core parameter values are free-form up to the end of the line
/// (`listen=udp:10.0.0.1:5060`), with strings parsed structurally.
fn top_level_assignment(p: &mut Parser) {
    p.start_node(SyntaxKind::TOP_LEVEL_ASSIGNMENT);
    p.bump(); // key
    skip_inline_trivia(p);
    p.expect(SyntaxKind::EQ);
    skip_inline_trivia(p);
    param_value(p);
    p.finish_node();
}

fn param_value(p: &mut Parser) {
    p.start_node(SyntaxKind::PARAM_VALUE);
    while !p.at_eof() && !at_end_of_line(p) {
        match p.current_kind() {
            SyntaxKind::STRING_OPEN => expressions::string_literal(p),
            SyntaxKind::PVAR => expressions::pseudo_variable(p),
            SyntaxKind::ERROR_TOKEN => p.bump_error_token(),
            _ => p.bump(),
        }
    }
    p.finish_node();
}

/// LoadModule = `loadmodule` string; LoadPath = `loadpath` string;
/// IncludeFile = (`include_file` | `import_file`) string
fn load_statement(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump(); // keyword
    skip_inline_trivia(p);
    if p.at(SyntaxKind::STRING_OPEN) {
        expressions::string_literal(p);
    } else {
        p.error("expected a quoted path", ErrorCode::E0302);
    }
    p.finish_node();
}

/// Modparam = `modparam` `(` module `,` parameter `,` value `)`
fn modparam(p: &mut Parser) {
    p.start_node(SyntaxKind::MODPARAM);
    p.bump(); // modparam
    p.skip_trivia();
    if p.at(SyntaxKind::L_PAREN) {
        expressions::argument_list(p);
    } else {
        p.error("expected `(`", ErrorCode::E0203);
    }
    p.finish_node();
}

/// Skip trivia that does not end the current line. Line comments and
/// newlines terminate free-form values, so they stay outside.
fn skip_inline_trivia(p: &mut Parser) {
    while matches!(
        p.current_kind(),
        SyntaxKind::WHITESPACE | SyntaxKind::LINE_CONTINUATION | SyntaxKind::BLOCK_COMMENT
    ) && !p.at_eof()
    {
        p.bump();
    }
}

fn at_end_of_line(p: &mut Parser) -> bool {
    matches!(
        p.current_kind(),
        SyntaxKind::NEWLINE | SyntaxKind::LINE_COMMENT | SyntaxKind::DEPRECATED_COMMENT
    )
}
