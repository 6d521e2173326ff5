//! Lossless round-trip and tree-shape verification
//!
//! The CST must reconstruct the input exactly from its leaves, keep child
//! ranges ordered, non-overlapping and contained in their parent, and
//! come out structurally identical when the same text is parsed twice.
//! Malformed input still yields a tree; the damage is scoped to error
//! nodes.

use rstest::rstest;
use kamailio_cfg::{Language, SyntaxKind, SyntaxNode, parse};

const FULL_CONFIG: &str = r#"#!KAMAILIO
#!define WITH_NAT 1

debug=2
log_stderror=no
listen=udp:10.0.0.1:5060
alias="sip.example.com"

loadmodule "tm.so"
loadmodule "sl.so"
loadpath "/usr/lib64/kamailio/modules/"

modparam("tm", "fr_timer", 30000)
modparam("registrar", "max_expires", 3600)

# main request routing logic
request_route {
    if ($rm == "INVITE") {
        sl_send_reply("100", "Trying");
        route(RELAY);
    } else if ($rm =~ "^(BYE|CANCEL)$") {
        route(RELAY);
    } else {
        exit;
    }
}

route[RELAY] {
    /* relay with failure handling */
    if (!t_relay()) {
        sl_reply_error();
    }
    exit;
}

failure_route[MANAGE_FAILURE] {
    if (t_is_canceled()) {
        exit;
    }
    while ($var(i) < 3) {
        $var(i) = $var(i) + 1;
    }
}

event_route[tm:local-request] {
    xlog("L_INFO", "local request $rm from $fU\n");
}
"#;

fn assert_roundtrip(input: &str) {
    let tree = parse(input);
    assert_eq!(
        tree.syntax().text().to_string(),
        input,
        "tree text must reconstruct the input"
    );
    // leaf tokens alone must also cover the input exactly
    let leaves: String = tree
        .syntax()
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .map(|token| token.text().to_string())
        .collect();
    assert_eq!(leaves, input);
}

fn assert_well_shaped(node: &SyntaxNode) {
    let mut cursor = node.text_range().start();
    for child in node.children_with_tokens() {
        let range = child.text_range();
        assert_eq!(
            range.start(),
            cursor,
            "children of {:?} must tile the parent without gaps",
            node.kind()
        );
        assert!(range.end() <= node.text_range().end());
        cursor = range.end();
    }
    if node.children_with_tokens().next().is_some() {
        assert_eq!(cursor, node.text_range().end());
    }
    for child in node.children() {
        assert_well_shaped(&child);
    }
}

// ============================================================================
// Round-trip
// ============================================================================

#[rstest]
#[case("")]
#[case("debug=3\n")]
#[case(FULL_CONFIG)]
// malformed inputs still round-trip
#[case("request_route { if ( }")]
#[case("route[ {\n}")]
#[case("@@@ ???")]
#[case("request_route { $var(x) = \"abc")]
#[case("/* never closed")]
fn test_roundtrip(#[case] input: &str) {
    assert_roundtrip(input);
}

#[test]
fn test_tree_is_well_shaped() {
    let tree = parse(FULL_CONFIG);
    assert!(tree.ok(), "errors: {:?}", tree.errors);
    assert_well_shaped(&tree.syntax());
}

#[test]
fn test_malformed_tree_is_well_shaped() {
    let tree = parse("request_route { if ($a == { drop; }");
    assert!(!tree.ok());
    assert_well_shaped(&tree.syntax());
}

// ============================================================================
// Idempotence
// ============================================================================

#[rstest]
#[case(FULL_CONFIG)]
#[case("request_route { if ( }")]
fn test_parse_twice_identical(#[case] input: &str) {
    let first = parse(input);
    let second = parse(input);
    assert_eq!(
        format!("{:#?}", first.syntax()),
        format!("{:#?}", second.syntax())
    );
    assert_eq!(first.errors, second.errors);
}

// ============================================================================
// Error tolerance
// ============================================================================

#[test]
fn test_unterminated_string_reaches_end_of_file() {
    let input = "request_route { $var(x) = \"abc";
    let tree = parse(input);
    assert!(!tree.ok());
    let end = tree
        .error_ranges()
        .iter()
        .map(|range| range.end())
        .max()
        .expect("an error region exists");
    assert_eq!(u32::from(end), input.len() as u32);
    // and the tree still holds the full text
    assert_eq!(tree.syntax().text().to_string(), input);
}

#[test]
fn test_error_does_not_poison_rest_of_file() {
    let input = "request_route { ??? ; exit; }\nroute[OK] { drop; }\n";
    let tree = parse(input);
    assert!(!tree.ok());
    // the second route still parses into a proper declaration
    let routes: Vec<_> = tree
        .syntax()
        .children()
        .filter(|node| node.kind() == SyntaxKind::ROUTE_DECLARATION)
        .collect();
    assert_eq!(routes.len(), 2);
}

// ============================================================================
// Vocabulary (the wire contract)
// ============================================================================

#[test]
fn test_every_tree_kind_is_in_the_vocabulary() {
    let vocabulary: Vec<SyntaxKind> = Language::vocabulary().map(|(kind, _)| kind).collect();
    let tree = parse(FULL_CONFIG);
    for element in tree.syntax().descendants_with_tokens() {
        assert!(
            vocabulary.contains(&element.kind()),
            "{:?} missing from the vocabulary",
            element.kind()
        );
    }
}
