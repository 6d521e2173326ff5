//! Statement parsing
//!
//! Route bodies nest arbitrarily deep (`{}` blocks, `if`/`else`, `while`,
//! `switch`). Nesting is handled with an explicit frame stack rather than
//! call recursion, so depth is bounded by input length, not the thread
//! stack. Each frame records one construct whose closing part is still
//! pending; the rowan builder's open nodes mirror the stack exactly.
//!
//! `#!` directives are accepted between any two statements and wrapped in
//! their own node without counting as a branch body.

use super::super::errors::ErrorCode;
use super::super::parser::Parser;
use super::super::syntax_kind::SyntaxKind;
use super::super::token_set::TokenSet;
use super::{expressions, preproc_directive};

/// One open construct. The comment on each variant names the builder
/// nodes the frame keeps open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// COMPOUND_STATEMENT, waiting for `}`
    Block,
    /// SWITCH_STATEMENT, past its `{`, waiting for `case`/`default`/`}`
    Switch,
    /// CASE_CLAUSE or DEFAULT_CLAUSE, collecting statements
    Case,
    /// IF_STATEMENT, body statement pending
    IfBody,
    /// IF_STATEMENT + ELSE_CLAUSE, else-body statement pending
    ElseBody,
    /// WHILE_STATEMENT, body statement pending
    WhileBody,
}

const EXPR_START: TokenSet = TokenSet::new(&[
    SyntaxKind::IDENT,
    SyntaxKind::NUMBER,
    SyntaxKind::STRING_OPEN,
    SyntaxKind::PVAR,
    SyntaxKind::L_PAREN,
    SyntaxKind::BANG,
    SyntaxKind::MINUS,
    SyntaxKind::PLUS,
]);

/// CompoundStatement = `{` Statement* `}`
///
/// Entry point for route bodies and nested blocks alike. The caller must
/// be positioned at `{`.
pub(crate) fn compound_statement(p: &mut Parser) {
    debug_assert!(p.at(SyntaxKind::L_BRACE));
    let mut frames: Vec<Frame> = Vec::new();
    open_block(p, &mut frames);

    while !frames.is_empty() {
        let pos_before = p.pos;
        let depth_before = frames.len();
        p.skip_trivia();

        if p.at_eof() {
            p.error("unexpected end of file inside a block", ErrorCode::E0202);
            unwind_all(p, &mut frames);
            break;
        }

        match *frames.last().expect("loop guard keeps the stack non-empty") {
            Frame::Block => {
                if p.at(SyntaxKind::R_BRACE) {
                    p.bump();
                    p.finish_node();
                    frames.pop();
                    statement_finished(p, &mut frames);
                } else {
                    statement_head(p, &mut frames);
                }
            }
            Frame::Switch => switch_member(p, &mut frames),
            Frame::Case => {
                if p.at_any(&[
                    SyntaxKind::CASE_KW,
                    SyntaxKind::DEFAULT_KW,
                    SyntaxKind::R_BRACE,
                ]) {
                    p.finish_node();
                    frames.pop();
                } else {
                    statement_head(p, &mut frames);
                }
            }
            Frame::IfBody | Frame::ElseBody | Frame::WhileBody => {
                if p.at(SyntaxKind::R_BRACE) {
                    p.error("expected a statement", ErrorCode::E0301);
                    statement_finished(p, &mut frames);
                } else {
                    statement_head(p, &mut frames);
                }
            }
        }

        // Safety: force progress when neither the cursor nor the stack moved
        if p.pos == pos_before && frames.len() == depth_before && !frames.is_empty() {
            p.error(
                format!("stuck on token `{}`", p.current_text()),
                ErrorCode::E0301,
            );
            p.bump_any();
        }
    }
}

/// Parse the start of one statement. Simple statements complete in place
/// and report to `statement_finished`; nesting constructs push a frame.
fn statement_head(p: &mut Parser, frames: &mut Vec<Frame>) {
    match p.current_kind() {
        SyntaxKind::DIRECTIVE => {
            // between two statements; not a branch body
            preproc_directive(p);
        }
        SyntaxKind::L_BRACE => open_block(p, frames),
        SyntaxKind::IF_KW => {
            p.start_node(SyntaxKind::IF_STATEMENT);
            p.bump();
            p.skip_trivia();
            condition(p);
            frames.push(Frame::IfBody);
        }
        SyntaxKind::WHILE_KW => {
            p.start_node(SyntaxKind::WHILE_STATEMENT);
            p.bump();
            p.skip_trivia();
            condition(p);
            frames.push(Frame::WhileBody);
        }
        SyntaxKind::SWITCH_KW => {
            p.start_node(SyntaxKind::SWITCH_STATEMENT);
            p.bump();
            p.skip_trivia();
            condition(p);
            p.skip_trivia();
            if p.eat(SyntaxKind::L_BRACE) {
                frames.push(Frame::Switch);
            } else {
                p.error("expected `{` after the switch subject", ErrorCode::E0202);
                p.finish_node();
                statement_finished(p, frames);
            }
        }
        SyntaxKind::RETURN_KW => {
            return_statement(p);
            statement_finished(p, frames);
        }
        SyntaxKind::BREAK_KW => {
            keyword_statement(p, SyntaxKind::BREAK_STATEMENT);
            statement_finished(p, frames);
        }
        SyntaxKind::EXIT_KW => {
            keyword_statement(p, SyntaxKind::EXIT_STATEMENT);
            statement_finished(p, frames);
        }
        SyntaxKind::DROP_KW => {
            keyword_statement(p, SyntaxKind::DROP_STATEMENT);
            statement_finished(p, frames);
        }
        SyntaxKind::ROUTE_KW if p.nth(1) == Some(SyntaxKind::L_PAREN) => {
            route_call_statement(p);
            statement_finished(p, frames);
        }
        SyntaxKind::SEMICOLON => {
            // empty statement
            p.bump();
            statement_finished(p, frames);
        }
        SyntaxKind::ERROR_TOKEN => p.bump_error_token(),
        kind if EXPR_START.contains(kind) => {
            expression_statement(p);
            statement_finished(p, frames);
        }
        _ => p.error_recover(
            format!("expected a statement, found `{}`", p.current_text()),
            ErrorCode::E0301,
            TokenSet::EMPTY,
        ),
    }
}

/// Close every frame that was waiting for the statement that just ended.
/// An `if` body first looks ahead for `else`; an `else if` chain walks
/// through here one link at a time.
fn statement_finished(p: &mut Parser, frames: &mut Vec<Frame>) {
    loop {
        match frames.last().copied() {
            Some(Frame::IfBody) => {
                if p.nth(0) == Some(SyntaxKind::ELSE_KW) {
                    p.skip_trivia();
                    frames.pop();
                    p.start_node(SyntaxKind::ELSE_CLAUSE);
                    p.bump(); // else
                    frames.push(Frame::ElseBody);
                    return;
                }
                p.finish_node(); // IF_STATEMENT
                frames.pop();
            }
            Some(Frame::ElseBody) => {
                p.finish_node(); // ELSE_CLAUSE
                p.finish_node(); // IF_STATEMENT
                frames.pop();
            }
            Some(Frame::WhileBody) => {
                p.finish_node(); // WHILE_STATEMENT
                frames.pop();
            }
            _ => return,
        }
    }
}

/// One member of a switch body: a case clause, the default clause, or the
/// closing brace.
fn switch_member(p: &mut Parser, frames: &mut Vec<Frame>) {
    match p.current_kind() {
        SyntaxKind::R_BRACE => {
            p.bump();
            p.finish_node(); // SWITCH_STATEMENT
            frames.pop();
            statement_finished(p, frames);
        }
        SyntaxKind::CASE_KW => {
            p.start_node(SyntaxKind::CASE_CLAUSE);
            p.bump();
            p.skip_trivia();
            expressions::expression(p);
            p.skip_trivia();
            p.expect(SyntaxKind::COLON);
            frames.push(Frame::Case);
        }
        SyntaxKind::DEFAULT_KW => {
            p.start_node(SyntaxKind::DEFAULT_CLAUSE);
            p.bump();
            p.skip_trivia();
            p.expect(SyntaxKind::COLON);
            frames.push(Frame::Case);
        }
        SyntaxKind::DIRECTIVE => preproc_directive(p),
        SyntaxKind::ERROR_TOKEN => p.bump_error_token(),
        _ => p.error_recover(
            "expected `case`, `default` or `}`",
            ErrorCode::E0304,
            TokenSet::new(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]),
        ),
    }
}

fn open_block(p: &mut Parser, frames: &mut Vec<Frame>) {
    p.start_node(SyntaxKind::COMPOUND_STATEMENT);
    p.bump(); // {
    frames.push(Frame::Block);
}

/// Close all open constructs at end of input, keeping the builder's node
/// stack balanced with the frame stack.
fn unwind_all(p: &mut Parser, frames: &mut Vec<Frame>) {
    while let Some(frame) = frames.pop() {
        match frame {
            Frame::ElseBody => {
                p.finish_node(); // ELSE_CLAUSE
                p.finish_node(); // IF_STATEMENT
            }
            _ => p.finish_node(),
        }
    }
}

/// `(` Expression `)` — the condition of `if`/`while`/`switch`
fn condition(p: &mut Parser) {
    if p.at(SyntaxKind::L_PAREN) {
        expressions::paren_expr(p);
    } else {
        p.error("expected `(`", ErrorCode::E0203);
    }
}

/// ReturnStatement = `return` ( Expression )? `;`
fn return_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::RETURN_STATEMENT);
    p.bump(); // return
    p.skip_trivia();
    if p.at_set(EXPR_START) {
        expressions::expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `break;` / `exit;` / `drop;`
fn keyword_statement(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// RouteCallStatement = `route` `(` name tokens `)` `;`
fn route_call_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::ROUTE_CALL_STATEMENT);
    p.bump(); // route
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    while !p.at_eof()
        && !matches!(
            p.current_kind(),
            SyntaxKind::R_PAREN | SyntaxKind::SEMICOLON | SyntaxKind::NEWLINE
        )
    {
        match p.current_kind() {
            SyntaxKind::STRING_OPEN => expressions::string_literal(p),
            SyntaxKind::ERROR_TOKEN => p.bump_error_token(),
            _ => p.bump(),
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// ExpressionStatement = Expression `;`
fn expression_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::EXPRESSION_STATEMENT);
    expressions::expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}
