//! Parser Tests - Expressions
//!
//! Operator precedence and associativity, pseudo-variables, string
//! interpolation, calls, and the call-versus-identifier conflict.

use rstest::rstest;
use kamailio_cfg::parser::{
    AstNode, BinaryExpr, ConfigFile, Expr, Statement, StringPart,
};
use kamailio_cfg::{SyntaxKind, parse};

fn parses_successfully(input: &str) -> bool {
    parse(input).ok()
}

fn in_route(body: &str) -> String {
    format!("request_route {{ {} }}", body)
}

/// Parse `$var(x) = <expr>;` and hand back the right-hand side
fn rhs_of(expr_text: &str) -> Expr {
    let input = in_route(&format!("$var(x) = {};", expr_text));
    let tree = parse(&input);
    assert!(tree.ok(), "errors in {:?}: {:?}", input, tree.errors);
    let file = ConfigFile::cast(tree.syntax()).unwrap();
    let route = file.routes().next().unwrap();
    let Some(Statement::Expr(stmt)) = route.body().unwrap().statements().next() else {
        panic!("expected an expression statement");
    };
    let Some(Expr::Assignment(assignment)) = stmt.expr() else {
        panic!("expected an assignment");
    };
    assignment.rhs().expect("assignment has a right-hand side")
}

// ============================================================================
// Acceptance
// ============================================================================

#[rstest]
#[case("$var(x) = 1;")]
#[case("$var(x) = 1 + 2 * 3;")]
#[case("$var(x) = (1 + 2) * 3;")]
#[case("$var(x) = $var(y) % 10;")]
#[case("$var(x) = 1 | 2 & 3;")]
#[case("$var(x) = -$var(y);")]
#[case("$var(x) = !$var(y);")]
#[case("$var(x) = \"prefix\" + $rU;")]
#[case("$var(x) = $var(a) = 1;")]
#[case("if ($rm == \"INVITE\" && $ru =~ \"^sip:\") { exit; }")]
#[case("if ($a == 1 || $b != 2 && $c) { exit; }")]
#[case("if (!t_is_set(\"branch_route\")) { exit; }")]
#[case("if ($sht(ipban=>$si) != $null) { exit; }")]
#[case("t_set_fr(0, 2000);")]
#[case("xlog(\"L_INFO\", \"from $fU to $tU\\n\");")]
fn test_expression_acceptance(#[case] body: &str) {
    let input = in_route(body);
    assert!(parses_successfully(&input), "Failed to parse: {}", input);
}

// ============================================================================
// Precedence shapes
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let Expr::Binary(outer) = rhs_of("1 + 2 * 3") else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.op_token().unwrap().text(), "+");
    let Some(Expr::Binary(inner)) = outer.rhs() else {
        panic!("expected the multiplication nested on the right");
    };
    assert_eq!(inner.op_token().unwrap().text(), "*");
}

#[test]
fn test_parentheses_override_precedence() {
    let Expr::Binary(outer) = rhs_of("(1 + 2) * 3") else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.op_token().unwrap().text(), "*");
    assert!(matches!(outer.lhs(), Some(Expr::Paren(_))));
}

#[test]
fn test_subtraction_is_left_associative() {
    let Expr::Binary(outer) = rhs_of("10 - 2 - 3") else {
        panic!("expected a binary expression");
    };
    // (10 - 2) - 3: the nested binary is on the left
    assert!(matches!(outer.lhs(), Some(Expr::Binary(_))));
    assert!(outer.rhs().is_none() || !matches!(outer.rhs(), Some(Expr::Binary(_))));
}

#[test]
fn test_assignment_is_right_associative() {
    let input = in_route("$var(x) = $var(y) = 1;");
    let tree = parse(&input);
    assert!(tree.ok(), "errors: {:?}", tree.errors);
    let assignments: Vec<_> = tree
        .syntax()
        .descendants()
        .filter(|node| node.kind() == SyntaxKind::ASSIGNMENT_EXPR)
        .collect();
    assert_eq!(assignments.len(), 2);
    // the inner assignment sits inside the outer one's right side
    assert!(assignments[0]
        .text_range()
        .contains_range(assignments[1].text_range()));
}

#[test]
fn test_logical_or_is_outermost() {
    let input = in_route("if ($a == 1 && $b == 2 || $c) { exit; }");
    let tree = parse(&input);
    assert!(tree.ok(), "errors: {:?}", tree.errors);
    let paren = tree
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::PAREN_EXPR)
        .unwrap();
    let top = paren
        .children()
        .find_map(BinaryExpr::cast)
        .expect("condition is a binary expression");
    assert_eq!(top.op_token().unwrap().text(), "||");
}

#[test]
fn test_match_operator_parses_as_comparison() {
    let Expr::Binary(binary) = rhs_of("$ru =~ \"^sip:alice\"") else {
        panic!("expected a binary expression");
    };
    assert_eq!(binary.op_token().unwrap().kind(), SyntaxKind::EQ_TILDE);
    assert!(matches!(binary.rhs(), Some(Expr::String(_))));
}

// ============================================================================
// Calls vs identifiers
// ============================================================================

#[test]
fn test_identifier_followed_by_paren_is_a_call() {
    let input = in_route("t_relay();");
    let tree = parse(&input);
    assert!(tree.ok());
    assert!(
        tree.syntax()
            .descendants()
            .any(|node| node.kind() == SyntaxKind::CALL_EXPR)
    );
}

#[test]
fn test_bare_identifier_stays_a_leaf() {
    let Expr::Binary(binary) = rhs_of("FLAG_A | FLAG_B") else {
        panic!("expected a binary expression");
    };
    // bare identifiers are leaf tokens, not call expressions
    assert!(binary.lhs().is_none());
    assert_eq!(binary.op_token().unwrap().kind(), SyntaxKind::PIPE);
}

// ============================================================================
// Strings and pseudo-variables
// ============================================================================

#[test]
fn test_string_interpolation_children() {
    let Expr::String(string) = rhs_of("\"hello $name world\"") else {
        panic!("expected a string");
    };
    let parts: Vec<_> = string.parts().collect();
    assert_eq!(parts.len(), 3);
    assert!(matches!(&parts[0], StringPart::Literal(t) if t.text() == "hello "));
    assert!(matches!(&parts[1], StringPart::Var(v) if v.text() == "$name"));
    assert!(matches!(&parts[2], StringPart::Literal(t) if t.text() == " world"));
}

#[test]
fn test_dollar_escape_part() {
    let Expr::String(string) = rhs_of("\"fee: $$ amount\"") else {
        panic!("expected a string");
    };
    assert!(string
        .parts()
        .any(|part| matches!(part, StringPart::Escape(_))));
}

#[rstest]
#[case("$ru", "ru")]
#[case("$avp(s:dest)", "avp")]
#[case("$(hdr(From)[0])", "hdr")]
#[case("$sht(ipban=>$si)", "sht")]
fn test_pseudo_variable_names(#[case] pvar: &str, #[case] name: &str) {
    let Expr::Pvar(node) = rhs_of(pvar) else {
        panic!("expected a pseudo-variable");
    };
    assert_eq!(node.name().as_deref(), Some(name));
}
