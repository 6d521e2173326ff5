//! The compiled language descriptor
//!
//! One process-wide, read-only description of the configuration language:
//! the rule graph, the external-token declarations bridging grammar and
//! scanner, the infix precedence table the expression parser runs on, and
//! the recovery anchors error handling walks to.
//!
//! [`language()`] compiles and validates the descriptor once, on first
//! use, and hands out a `'static` reference from then on. Compilation can
//! only fail on a defect in the crate's own tables, never on user input;
//! such a failure aborts the first call instead of surfacing during a
//! parse.

pub mod rules;
mod validate;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::parser::SyntaxKind;
use crate::parser::TokenSet;
use crate::parser::scanner::LexMode;

pub use rules::{Pattern, RuleDef};

/// A grammar defect detected while compiling the language descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("duplicate rule name `{name}`")]
    DuplicateRule { name: &'static str },
    #[error("rule `{rule}` references undefined rule `{target}`")]
    UndefinedRule {
        rule: &'static str,
        target: &'static str,
    },
    #[error("rule `{rule}` can derive itself without consuming input")]
    EmptyDerivation { rule: &'static str },
    #[error("external token `{name}` is declared more than once")]
    DuplicateExternal { name: &'static str },
    #[error("external token `{name}` is declared but the scanner never produces it")]
    ExternalNotProduced { name: &'static str },
    #[error("scanner token `{name}` has no external token declaration")]
    UndeclaredExternal { name: &'static str },
    #[error("composite node kind `{kind}` is not produced by any rule")]
    MissingNodeRule { kind: &'static str },
    #[error("invalid precedence entry for `{token}`")]
    InvalidPrecedence { token: &'static str },
}

/// Declaration of a token the external scanner produces: its stable name
/// and the lexer modes it may appear in
#[derive(Debug, Clone)]
pub struct ExternalToken {
    pub name: &'static str,
    pub kind: SyntaxKind,
    pub modes: &'static [LexMode],
}

/// One infix operator with its binding powers. Left-associative operators
/// have `left_bp < right_bp`; assignment flips the pair.
#[derive(Debug, Clone, Copy)]
pub struct InfixOp {
    pub token: SyntaxKind,
    pub left_bp: u8,
    pub right_bp: u8,
}

/// The compiled, immutable language descriptor
pub struct Language {
    rules: Vec<RuleDef>,
    rule_index: FxHashMap<&'static str, usize>,
    externals: Vec<ExternalToken>,
    infix: FxHashMap<SyntaxKind, (u8, u8)>,
    prefix_bp: u8,
    recovery: TokenSet,
}

impl Language {
    /// Compile and validate the descriptor. Errors are build-time defects
    /// of this crate; see [`GrammarError`].
    pub fn compile() -> Result<Language, GrammarError> {
        let rules = rules::grammar_rules();
        let externals = external_tokens();
        let infix = infix_table();

        validate::check(&rules, &externals, &infix)?;

        let rule_index = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (rule.name, i))
            .collect();
        let infix = infix
            .iter()
            .map(|op| (op.token, (op.left_bp, op.right_bp)))
            .collect();

        tracing::debug!(rules = rules.len(), "compiled language descriptor");

        Ok(Language {
            rules,
            rule_index,
            externals,
            infix,
            prefix_bp: 80,
            recovery: TokenSet::new(&[
                SyntaxKind::SEMICOLON,
                SyntaxKind::R_BRACE,
                SyntaxKind::DIRECTIVE,
                SyntaxKind::ROUTE_KW,
                SyntaxKind::REQUEST_ROUTE_KW,
                SyntaxKind::REPLY_ROUTE_KW,
                SyntaxKind::ONREPLY_ROUTE_KW,
                SyntaxKind::FAILURE_ROUTE_KW,
                SyntaxKind::BRANCH_ROUTE_KW,
                SyntaxKind::ONSEND_ROUTE_KW,
                SyntaxKind::EVENT_ROUTE_KW,
            ]),
        })
    }

    /// Look up a rule by name
    pub fn rule(&self, name: &str) -> Option<&RuleDef> {
        self.rule_index.get(name).map(|&i| &self.rules[i])
    }

    /// All rules, in declaration order
    pub fn rules(&self) -> &[RuleDef] {
        &self.rules
    }

    /// The external-token declarations
    pub fn external_tokens(&self) -> &[ExternalToken] {
        &self.externals
    }

    /// Binding powers of an infix operator, if `kind` is one
    pub fn infix_binding_power(&self, kind: SyntaxKind) -> Option<(u8, u8)> {
        self.infix.get(&kind).copied()
    }

    /// Binding power of prefix operators; tighter than any infix level
    pub fn prefix_binding_power(&self) -> u8 {
        self.prefix_bp
    }

    /// Token kinds error recovery stops at (statement boundaries)
    pub fn recovery_anchors(&self) -> TokenSet {
        self.recovery
    }

    /// The node-kind vocabulary: every kind with its stable name. This is
    /// the wire contract with downstream tools.
    pub fn vocabulary() -> impl Iterator<Item = (SyntaxKind, &'static str)> {
        (0..SyntaxKind::__LAST as u16)
            .map(|raw| SyntaxKind::from(rowan::SyntaxKind(raw)))
            .map(|kind| (kind, kind.name()))
    }
}

/// The process-wide language descriptor. Thread-safe for concurrent
/// read-only use; parses share it while each owns its own lexer state.
pub fn language() -> &'static Language {
    static LANGUAGE: Lazy<Language> = Lazy::new(|| {
        Language::compile().expect("the built-in grammar must compile")
    });
    &LANGUAGE
}

fn external_tokens() -> Vec<ExternalToken> {
    use LexMode::*;
    use SyntaxKind::*;

    const DEFAULT_ONLY: &[LexMode] = &[Default];
    const STRING_ONLY: &[LexMode] = &[InString];
    const BOTH: &[LexMode] = &[Default, InString];

    vec![
        ExternalToken { name: "block_comment", kind: BLOCK_COMMENT, modes: DEFAULT_ONLY },
        ExternalToken { name: "line_comment", kind: LINE_COMMENT, modes: DEFAULT_ONLY },
        ExternalToken { name: "directive", kind: DIRECTIVE, modes: DEFAULT_ONLY },
        ExternalToken { name: "string_open", kind: STRING_OPEN, modes: DEFAULT_ONLY },
        ExternalToken { name: "string_content", kind: STRING_CONTENT, modes: STRING_ONLY },
        ExternalToken { name: "string_close", kind: STRING_CLOSE, modes: STRING_ONLY },
        ExternalToken { name: "dollar_escape", kind: DOLLAR_ESCAPE, modes: STRING_ONLY },
        ExternalToken { name: "pvar", kind: PVAR, modes: BOTH },
        ExternalToken { name: "line_continuation", kind: LINE_CONTINUATION, modes: DEFAULT_ONLY },
        ExternalToken { name: "error_token", kind: ERROR_TOKEN, modes: BOTH },
    ]
}

/// Precedence per the core expression grammar, tightest first:
/// multiplicative, additive, bitwise, relational/equality/match, `&&`,
/// `||`, assignment (the one right-associative level).
fn infix_table() -> Vec<InfixOp> {
    use SyntaxKind::*;

    fn left(token: SyntaxKind, bp: u8) -> InfixOp {
        InfixOp { token, left_bp: bp, right_bp: bp + 1 }
    }

    vec![
        left(STAR, 70),
        left(SLASH, 70),
        left(PERCENT, 70),
        left(PLUS, 60),
        left(MINUS, 60),
        left(AMP, 56),
        left(PIPE, 54),
        left(EQ_EQ, 50),
        left(BANG_EQ, 50),
        left(EQ_TILDE, 50),
        left(BANG_TILDE, 50),
        left(LT, 50),
        left(GT, 50),
        left(LT_EQ, 50),
        left(GT_EQ, 50),
        left(AMP_AMP, 40),
        left(PIPE_PIPE, 30),
        // assignment: right-associative
        InfixOp { token: EQ, left_bp: 20, right_bp: 19 },
    ]
}
