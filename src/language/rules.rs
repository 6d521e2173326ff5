//! Declarative grammar rules
//!
//! The productions of the configuration language as data: a named rule
//! graph built once at language-definition time and never mutated. The
//! graph is the schema behind the node-kind vocabulary (which node kinds
//! exist and what shapes they take) and is validated when the language
//! descriptor compiles; the tree builder walks the same shapes in
//! hand-written form in [`crate::parser::grammar`].
//!
//! Expression precedence appears here as layered rules (each layer refers
//! to the next-tighter one), so no rule can derive itself without
//! consuming a token.

use crate::parser::SyntaxKind;

/// A production element
#[derive(Debug, Clone)]
pub enum Pattern {
    /// A terminal
    Token(SyntaxKind),
    /// A reference to another rule by name
    Rule(&'static str),
    /// Ordered sequence
    Seq(Vec<Pattern>),
    /// Ordered alternation
    Choice(Vec<Pattern>),
    /// Zero or more repetitions
    Repeat(Box<Pattern>),
    /// Zero or one occurrence
    Optional(Box<Pattern>),
}

/// A named grammar rule
///
/// `kind` is the node kind the rule materializes in the tree; helper
/// layers (precedence levels, the `statement` dispatch) carry `None`.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub name: &'static str,
    pub kind: Option<SyntaxKind>,
    pub pattern: Pattern,
}

fn tok(kind: SyntaxKind) -> Pattern {
    Pattern::Token(kind)
}

fn r(name: &'static str) -> Pattern {
    Pattern::Rule(name)
}

fn seq(patterns: Vec<Pattern>) -> Pattern {
    Pattern::Seq(patterns)
}

fn choice(patterns: Vec<Pattern>) -> Pattern {
    Pattern::Choice(patterns)
}

fn rep(pattern: Pattern) -> Pattern {
    Pattern::Repeat(Box::new(pattern))
}

fn opt(pattern: Pattern) -> Pattern {
    Pattern::Optional(Box::new(pattern))
}

fn rule(name: &'static str, kind: SyntaxKind, pattern: Pattern) -> RuleDef {
    RuleDef {
        name,
        kind: Some(kind),
        pattern,
    }
}

fn helper(name: &'static str, pattern: Pattern) -> RuleDef {
    RuleDef {
        name,
        kind: None,
        pattern,
    }
}

/// The full rule table. Trivia is implicit: it may appear between any two
/// elements and is kept in the tree.
pub(crate) fn grammar_rules() -> Vec<RuleDef> {
    use SyntaxKind::*;

    let route_keyword = choice(vec![
        tok(ROUTE_KW),
        tok(REQUEST_ROUTE_KW),
        tok(REPLY_ROUTE_KW),
        tok(ONREPLY_ROUTE_KW),
        tok(FAILURE_ROUTE_KW),
        tok(BRANCH_ROUTE_KW),
        tok(ONSEND_ROUTE_KW),
        tok(EVENT_ROUTE_KW),
    ]);

    // route names and call targets mix identifiers with punctuation:
    // route[FOO], branch_route[1], event_route[tm:local-request]
    let name_token = || {
        choice(vec![
            tok(IDENT),
            tok(NUMBER),
            tok(COLON),
            tok(MINUS),
            tok(DOT),
        ])
    };

    vec![
        // =====================================================================
        // File structure
        // =====================================================================
        rule(
            "config_file",
            CONFIG_FILE,
            rep(choice(vec![
                r("preproc_directive"),
                r("top_level_assignment"),
                r("load_module"),
                r("load_path"),
                r("include_file"),
                r("modparam_declaration"),
                r("route_declaration"),
            ])),
        ),
        rule("preproc_directive", PREPROC_DIRECTIVE, tok(DIRECTIVE)),
        rule(
            "top_level_assignment",
            TOP_LEVEL_ASSIGNMENT,
            seq(vec![tok(IDENT), tok(EQ), r("param_value")]),
        ),
        rule(
            "param_value",
            PARAM_VALUE,
            rep(choice(vec![
                r("string"),
                r("pseudo_variable"),
                name_token(),
                tok(SLASH),
                tok(COMMA),
                tok(STAR),
                tok(PIPE),
                tok(AMP),
            ])),
        ),
        rule(
            "load_module",
            LOAD_MODULE,
            seq(vec![tok(LOADMODULE_KW), r("string")]),
        ),
        rule(
            "load_path",
            LOAD_PATH,
            seq(vec![tok(LOADPATH_KW), r("string")]),
        ),
        rule(
            "include_file",
            INCLUDE_FILE,
            seq(vec![
                choice(vec![tok(INCLUDE_FILE_KW), tok(IMPORT_FILE_KW)]),
                r("string"),
            ]),
        ),
        rule(
            "modparam_declaration",
            MODPARAM,
            seq(vec![tok(MODPARAM_KW), r("argument_list")]),
        ),
        rule(
            "route_declaration",
            ROUTE_DECLARATION,
            seq(vec![
                route_keyword,
                opt(r("route_name")),
                r("compound_statement"),
            ]),
        ),
        rule(
            "route_name",
            ROUTE_NAME,
            seq(vec![tok(L_BRACKET), rep(name_token()), tok(R_BRACKET)]),
        ),
        // =====================================================================
        // Statements
        // =====================================================================
        helper(
            "statement",
            choice(vec![
                r("compound_statement"),
                r("if_statement"),
                r("while_statement"),
                r("switch_statement"),
                r("return_statement"),
                r("break_statement"),
                r("exit_statement"),
                r("drop_statement"),
                r("route_call_statement"),
                r("expression_statement"),
                r("preproc_directive"),
            ]),
        ),
        rule(
            "compound_statement",
            COMPOUND_STATEMENT,
            seq(vec![tok(L_BRACE), rep(r("statement")), tok(R_BRACE)]),
        ),
        rule(
            "if_statement",
            IF_STATEMENT,
            seq(vec![
                tok(IF_KW),
                r("parenthesized_expression"),
                r("statement"),
                opt(r("else_clause")),
            ]),
        ),
        rule(
            "else_clause",
            ELSE_CLAUSE,
            seq(vec![tok(ELSE_KW), r("statement")]),
        ),
        rule(
            "while_statement",
            WHILE_STATEMENT,
            seq(vec![
                tok(WHILE_KW),
                r("parenthesized_expression"),
                r("statement"),
            ]),
        ),
        rule(
            "switch_statement",
            SWITCH_STATEMENT,
            seq(vec![
                tok(SWITCH_KW),
                r("parenthesized_expression"),
                tok(L_BRACE),
                rep(choice(vec![r("case_statement"), r("default_statement")])),
                tok(R_BRACE),
            ]),
        ),
        rule(
            "case_statement",
            CASE_CLAUSE,
            seq(vec![
                tok(CASE_KW),
                r("expression"),
                tok(COLON),
                rep(r("statement")),
            ]),
        ),
        rule(
            "default_statement",
            DEFAULT_CLAUSE,
            seq(vec![tok(DEFAULT_KW), tok(COLON), rep(r("statement"))]),
        ),
        rule(
            "return_statement",
            RETURN_STATEMENT,
            seq(vec![tok(RETURN_KW), opt(r("expression")), tok(SEMICOLON)]),
        ),
        rule(
            "break_statement",
            BREAK_STATEMENT,
            seq(vec![tok(BREAK_KW), tok(SEMICOLON)]),
        ),
        rule(
            "exit_statement",
            EXIT_STATEMENT,
            seq(vec![tok(EXIT_KW), tok(SEMICOLON)]),
        ),
        rule(
            "drop_statement",
            DROP_STATEMENT,
            seq(vec![tok(DROP_KW), tok(SEMICOLON)]),
        ),
        rule(
            "route_call_statement",
            ROUTE_CALL_STATEMENT,
            seq(vec![
                tok(ROUTE_KW),
                tok(L_PAREN),
                rep(choice(vec![name_token(), r("string")])),
                tok(R_PAREN),
                tok(SEMICOLON),
            ]),
        ),
        rule(
            "expression_statement",
            EXPRESSION_STATEMENT,
            seq(vec![r("expression"), tok(SEMICOLON)]),
        ),
        // =====================================================================
        // Expressions, loosest binding first
        // =====================================================================
        helper("expression", r("assignment_expr")),
        // assignment is right-associative
        rule(
            "assignment_expr",
            ASSIGNMENT_EXPR,
            seq(vec![
                r("or_expr"),
                opt(seq(vec![tok(EQ), r("assignment_expr")])),
            ]),
        ),
        rule(
            "or_expr",
            BINARY_EXPR,
            seq(vec![
                r("and_expr"),
                rep(seq(vec![tok(PIPE_PIPE), r("and_expr")])),
            ]),
        ),
        rule(
            "and_expr",
            BINARY_EXPR,
            seq(vec![
                r("rel_expr"),
                rep(seq(vec![tok(AMP_AMP), r("rel_expr")])),
            ]),
        ),
        rule(
            "rel_expr",
            BINARY_EXPR,
            seq(vec![
                r("bit_expr"),
                rep(seq(vec![
                    choice(vec![
                        tok(EQ_EQ),
                        tok(BANG_EQ),
                        tok(EQ_TILDE),
                        tok(BANG_TILDE),
                        tok(LT),
                        tok(GT),
                        tok(LT_EQ),
                        tok(GT_EQ),
                    ]),
                    r("bit_expr"),
                ])),
            ]),
        ),
        rule(
            "bit_expr",
            BINARY_EXPR,
            seq(vec![
                r("add_expr"),
                rep(seq(vec![choice(vec![tok(AMP), tok(PIPE)]), r("add_expr")])),
            ]),
        ),
        rule(
            "add_expr",
            BINARY_EXPR,
            seq(vec![
                r("mul_expr"),
                rep(seq(vec![choice(vec![tok(PLUS), tok(MINUS)]), r("mul_expr")])),
            ]),
        ),
        rule(
            "mul_expr",
            BINARY_EXPR,
            seq(vec![
                r("unary_expr"),
                rep(seq(vec![
                    choice(vec![tok(STAR), tok(SLASH), tok(PERCENT)]),
                    r("unary_expr"),
                ])),
            ]),
        ),
        rule(
            "unary_expr",
            UNARY_EXPR,
            choice(vec![
                seq(vec![
                    choice(vec![tok(BANG), tok(MINUS), tok(PLUS)]),
                    r("unary_expr"),
                ]),
                r("primary_expr"),
            ]),
        ),
        helper(
            "primary_expr",
            choice(vec![
                tok(NUMBER),
                r("call_expression"),
                tok(IDENT),
                r("pseudo_variable"),
                r("string"),
                r("parenthesized_expression"),
            ]),
        ),
        rule(
            "call_expression",
            CALL_EXPR,
            seq(vec![tok(IDENT), r("argument_list")]),
        ),
        rule(
            "argument_list",
            ARGUMENT_LIST,
            seq(vec![
                tok(L_PAREN),
                opt(seq(vec![
                    r("expression"),
                    rep(seq(vec![tok(COMMA), r("expression")])),
                ])),
                tok(R_PAREN),
            ]),
        ),
        rule(
            "parenthesized_expression",
            PAREN_EXPR,
            seq(vec![tok(L_PAREN), r("expression"), tok(R_PAREN)]),
        ),
        rule("pseudo_variable", PSEUDO_VARIABLE, tok(PVAR)),
        rule(
            "string",
            STRING,
            seq(vec![
                tok(STRING_OPEN),
                rep(choice(vec![
                    tok(STRING_CONTENT),
                    tok(DOLLAR_ESCAPE),
                    r("pseudo_variable"),
                ])),
                tok(STRING_CLOSE),
            ]),
        ),
    ]
}
