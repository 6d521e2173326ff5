//! Route block declarations
//!
//! Every route flavor shares one shape:
//! `route_keyword [ "[" name "]" ] "{" statement* "}"`.
//! The bracketed name is matched loosely, because event route names mix
//! identifiers with punctuation (`event_route[tm:local-request]`,
//! `branch_route[1]`).

use super::super::errors::ErrorCode;
use super::super::parser::Parser;
use super::super::syntax_kind::SyntaxKind;
use super::statements;

/// RouteDeclaration = RouteKeyword RouteName? CompoundStatement
pub(crate) fn route_declaration(p: &mut Parser) {
    debug_assert!(p.current_kind().is_route_keyword());
    p.start_node(SyntaxKind::ROUTE_DECLARATION);
    p.bump(); // route keyword
    p.skip_trivia();

    if p.at(SyntaxKind::L_BRACKET) {
        route_name(p);
        p.skip_trivia();
    }

    if p.at(SyntaxKind::L_BRACE) {
        statements::compound_statement(p);
    } else {
        p.error("expected `{` to open the route body", ErrorCode::E0303);
    }

    p.finish_node();
}

/// RouteName = `[` name tokens `]`
fn route_name(p: &mut Parser) {
    p.start_node(SyntaxKind::ROUTE_NAME);
    p.bump(); // [
    while !p.at_eof()
        && !matches!(
            p.current_kind(),
            SyntaxKind::R_BRACKET | SyntaxKind::NEWLINE | SyntaxKind::L_BRACE
        )
    {
        p.bump();
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}
