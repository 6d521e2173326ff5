//! Parser Tests - Statements
//!
//! Control flow inside route bodies: blocks, if/else chains, while,
//! switch/case, return/break/exit/drop, route calls, and the depth
//! guarantees of the frame-stack statement parser.

use rstest::rstest;
use kamailio_cfg::{AstNode, ConfigFile, SyntaxKind, parse};

fn parses_successfully(input: &str) -> bool {
    parse(input).ok()
}

fn in_route(body: &str) -> String {
    format!("request_route {{\n{}\n}}\n", body)
}

// ============================================================================
// Simple statements
// ============================================================================

#[rstest]
#[case("exit;")]
#[case("drop;")]
#[case("return;")]
#[case("return 1;")]
#[case("return -1;")]
#[case("return (1);")]
#[case("t_relay();")]
#[case("sl_send_reply(\"486\", \"Busy Here\");")]
#[case("route(RELAY);")]
#[case("route(1);")]
#[case("$var(x) = 1;")]
#[case("$avp(s:count) = $avp(s:count) + 1;")]
#[case(";")]
fn test_simple_statements(#[case] body: &str) {
    let input = in_route(body);
    assert!(parses_successfully(&input), "Failed to parse: {}", input);
}

// ============================================================================
// Control flow
// ============================================================================

#[rstest]
#[case("if ($rm == \"INVITE\") { exit; }")]
#[case("if ($rm == \"INVITE\") exit;")]
#[case("if ($a) { exit; } else { drop; }")]
#[case("if ($a) { exit; } else if ($b) { drop; } else { return 1; }")]
#[case("while ($var(i) < 10) { $var(i) = $var(i) + 1; }")]
#[case("while ($var(i) < 10) $var(i) = $var(i) + 1;")]
#[case("if ($a) while ($b) exit;")]
fn test_control_flow(#[case] body: &str) {
    let input = in_route(body);
    assert!(parses_successfully(&input), "Failed to parse: {}", input);
}

#[test]
fn test_if_else_chain_shape() {
    let tree = parse(&in_route(
        "if ($a) { exit; } else if ($b) { drop; } else { return 1; }",
    ));
    assert!(tree.ok(), "errors: {:?}", tree.errors);
    // the chain nests: else clause of the outer if holds the inner if
    let outer_if = tree
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::IF_STATEMENT)
        .unwrap();
    let else_clause = outer_if
        .children()
        .find(|node| node.kind() == SyntaxKind::ELSE_CLAUSE)
        .unwrap();
    let inner_if = else_clause
        .children()
        .find(|node| node.kind() == SyntaxKind::IF_STATEMENT)
        .unwrap();
    assert!(
        inner_if
            .children()
            .any(|node| node.kind() == SyntaxKind::ELSE_CLAUSE)
    );
}

#[test]
fn test_dangling_else_binds_to_inner_if() {
    let tree = parse(&in_route("if ($a) if ($b) exit; else drop;"));
    assert!(tree.ok(), "errors: {:?}", tree.errors);
    let outer_if = tree
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::IF_STATEMENT)
        .unwrap();
    assert!(
        !outer_if
            .children()
            .any(|node| node.kind() == SyntaxKind::ELSE_CLAUSE),
        "the else belongs to the inner if"
    );
}

// ============================================================================
// Switch
// ============================================================================

#[rstest]
#[case("switch ($rU) { case \"1\": break; }")]
#[case("switch ($rU) { case \"1\": break; case \"2\": break; default: exit; }")]
#[case("switch ($var(x)) { case 1: case 2: break; default: drop; }")]
#[case("switch ($var(x)) { case -1: break; }")]
fn test_switch(#[case] body: &str) {
    let input = in_route(body);
    assert!(parses_successfully(&input), "Failed to parse: {}", input);
}

#[test]
fn test_switch_statement_shape() {
    let tree = parse(&in_route(
        "switch ($rU) { case \"1\": t_relay(); break; case \"2\": break; default: drop; }",
    ));
    assert!(tree.ok(), "errors: {:?}", tree.errors);
    let switch = tree
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::SWITCH_STATEMENT)
        .unwrap();
    let cases: Vec<_> = switch
        .children()
        .filter(|node| node.kind() == SyntaxKind::CASE_CLAUSE)
        .collect();
    assert_eq!(cases.len(), 2);
    assert_eq!(
        cases[0]
            .children()
            .filter(|node| {
                matches!(
                    node.kind(),
                    SyntaxKind::EXPRESSION_STATEMENT | SyntaxKind::BREAK_STATEMENT
                )
            })
            .count(),
        2
    );
    assert!(
        switch
            .children()
            .any(|node| node.kind() == SyntaxKind::DEFAULT_CLAUSE)
    );
}

// ============================================================================
// Directives between statements
// ============================================================================

#[test]
fn test_directive_between_statements() {
    let source = r#"request_route {
    sl_send_reply("100", "Trying");
#!ifdef WITH_NAT
    route(NATMANAGE);
#!endif
    exit;
}
"#;
    let tree = parse(source);
    assert!(tree.ok(), "errors: {:?}", tree.errors);
    let compound = tree
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::COMPOUND_STATEMENT)
        .unwrap();
    let directives = compound
        .children()
        .filter(|node| node.kind() == SyntaxKind::PREPROC_DIRECTIVE)
        .count();
    assert_eq!(directives, 2);
}

// ============================================================================
// Depth
// ============================================================================

#[test]
fn test_deeply_nested_blocks_parse_without_overflow() {
    let depth = 500;
    let mut body = String::new();
    for _ in 0..depth {
        body.push('{');
    }
    body.push_str("exit;");
    for _ in 0..depth {
        body.push('}');
    }
    let tree = parse(&in_route(&body));
    assert!(tree.ok(), "errors: {:?}", tree.errors);
}

#[test]
fn test_deeply_nested_if_chain() {
    let depth = 300;
    let mut body = String::new();
    for _ in 0..depth {
        body.push_str("if ($a) ");
    }
    body.push_str("exit;");
    let tree = parse(&in_route(&body));
    assert!(tree.ok(), "errors: {:?}", tree.errors);
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_missing_semicolon_recovers_at_brace() {
    let tree = parse(&in_route("t_relay()"));
    assert!(!tree.ok());
    assert!(
        tree.syntax()
            .descendants()
            .any(|node| node.kind() == SyntaxKind::EXPRESSION_STATEMENT)
    );
}

#[test]
fn test_statement_after_garbage_survives() {
    let file_text = in_route("??? exit;");
    let tree = parse(&file_text);
    assert!(!tree.ok());
    let file = ConfigFile::cast(tree.syntax()).unwrap();
    let body_text = file.routes().next().unwrap().syntax().text().to_string();
    assert!(body_text.contains("exit"));
    assert!(
        tree.syntax()
            .descendants()
            .any(|node| node.kind() == SyntaxKind::EXIT_STATEMENT)
    );
}
