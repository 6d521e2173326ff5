//! Expression parsing
//!
//! A Pratt loop over the binding powers declared in the language
//! descriptor's precedence table. All binary levels are left-associative
//! except assignment; unary operators bind tighter than any infix
//! operator. An identifier directly followed by `(` is a call, which is
//! how the grammar resolves the statement-start ambiguity in favor of the
//! more specific match.

use super::super::errors::ErrorCode;
use super::super::parser::Parser;
use super::super::syntax_kind::SyntaxKind;

/// Expression entry point
pub(crate) fn expression(p: &mut Parser) {
    expr_bp(p, 0);
}

fn expr_bp(p: &mut Parser, min_bp: u8) {
    let checkpoint = p.checkpoint();
    if !atom(p) {
        return;
    }

    loop {
        let Some(op) = p.nth(0) else { break };
        let Some((left_bp, right_bp)) = p.lang.infix_binding_power(op) else {
            break;
        };
        if left_bp < min_bp {
            break;
        }

        p.skip_trivia();
        let kind = if op == SyntaxKind::EQ {
            SyntaxKind::ASSIGNMENT_EXPR
        } else {
            SyntaxKind::BINARY_EXPR
        };
        p.start_node_at(checkpoint, kind);
        p.bump(); // operator
        p.skip_trivia();
        expr_bp(p, right_bp);
        p.finish_node();
    }
}

/// One operand: literal, pseudo-variable, call, parenthesized group, or a
/// unary operator applied to another operand. Returns false without
/// consuming anything when no expression starts here.
fn atom(p: &mut Parser) -> bool {
    p.skip_trivia();
    match p.current_kind() {
        SyntaxKind::NUMBER => {
            p.bump();
            true
        }
        SyntaxKind::IDENT => {
            if p.nth(1) == Some(SyntaxKind::L_PAREN) {
                call_expr(p);
            } else {
                p.bump();
            }
            true
        }
        SyntaxKind::PVAR => {
            pseudo_variable(p);
            true
        }
        SyntaxKind::STRING_OPEN => {
            string_literal(p);
            true
        }
        SyntaxKind::L_PAREN => {
            paren_expr(p);
            true
        }
        SyntaxKind::BANG | SyntaxKind::MINUS | SyntaxKind::PLUS => {
            p.start_node(SyntaxKind::UNARY_EXPR);
            p.bump();
            expr_bp(p, p.lang.prefix_binding_power());
            p.finish_node();
            true
        }
        SyntaxKind::ERROR_TOKEN if !p.at_eof() => {
            // the lexer already reported this region
            p.bump_error_token();
            true
        }
        _ => {
            p.error("expected an expression", ErrorCode::E0401);
            false
        }
    }
}

/// CallExpr = identifier ArgumentList
fn call_expr(p: &mut Parser) {
    p.start_node(SyntaxKind::CALL_EXPR);
    p.bump(); // callee
    p.skip_trivia();
    argument_list(p);
    p.finish_node();
}

/// ArgumentList = `(` ( Expression (`,` Expression)* )? `)`
pub(crate) fn argument_list(p: &mut Parser) {
    p.start_node(SyntaxKind::ARGUMENT_LIST);
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();

    if !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
        expression(p);
        p.skip_trivia();
        while p.at(SyntaxKind::COMMA) {
            p.bump();
            p.skip_trivia();
            expression(p);
            p.skip_trivia();
        }
    }

    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// ParenExpr = `(` Expression `)`
pub(crate) fn paren_expr(p: &mut Parser) {
    p.start_node(SyntaxKind::PAREN_EXPR);
    p.bump(); // (
    p.skip_trivia();
    if p.at(SyntaxKind::R_PAREN) {
        p.error("expected an expression", ErrorCode::E0401);
    } else {
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// PseudoVariable = one scanner-produced `$...` token
pub(crate) fn pseudo_variable(p: &mut Parser) {
    p.start_node(SyntaxKind::PSEUDO_VARIABLE);
    p.bump();
    p.finish_node();
}

/// String = `"` (content | `$$` | PseudoVariable)* `"`
///
/// The interpolation sub-tokens become children of the string node, so
/// tooling can tell literal text from variable references. An
/// unterminated string ends in an error child and the node closes at end
/// of input.
pub(crate) fn string_literal(p: &mut Parser) {
    p.start_node(SyntaxKind::STRING);
    p.bump(); // opening quote
    loop {
        match p.current_kind() {
            SyntaxKind::STRING_CONTENT | SyntaxKind::DOLLAR_ESCAPE => p.bump(),
            SyntaxKind::PVAR => pseudo_variable(p),
            SyntaxKind::STRING_CLOSE => {
                p.bump();
                break;
            }
            SyntaxKind::ERROR_TOKEN if !p.at_eof() => {
                // unterminated tail, already reported by the lexer
                p.bump_error_token();
                break;
            }
            _ => {
                p.error("unterminated string literal", ErrorCode::E0102);
                break;
            }
        }
    }
    p.finish_node();
}
