//! Lexer for the Kamailio configuration language
//!
//! Tokenization happens in two layers. The hand-written external scanner
//! ([`scanner`](super::scanner)) gets the first look at every position and
//! resolves the context-sensitive classes (nested comments, `#` vs `#!`,
//! strings with interpolation, pseudo-variables). Whatever it declines
//! falls back to the declarative terminal patterns below, generated with
//! logos. The lexer never fails: unrecognizable input becomes
//! [`ERROR_TOKEN`](SyntaxKind::ERROR_TOKEN)s plus recorded diagnostics.

use logos::Logos;
use rowan::TextSize;
use text_size::TextRange;

use super::errors::{ErrorCode, SyntaxError};
use super::scanner::{self, LexerState};
use super::syntax_kind::SyntaxKind;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// The byte range this token covers
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }
}

/// Lexer combining the external scanner with the logos terminals
pub struct Lexer<'a> {
    input: &'a str,
    state: LexerState,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            state: LexerState::new(),
            errors: Vec::new(),
        }
    }

    /// Lexical diagnostics collected so far
    pub fn finish(self) -> Vec<SyntaxError> {
        self.errors
    }

    fn fallback(&mut self) -> Option<Token<'a>> {
        let start = self.state.pos;
        let rest = &self.input[start..];
        let mut inner = LogosToken::lexer(rest);
        let result = inner.next()?;
        // no skip patterns are declared, so the match starts at byte zero
        let text = &rest[..inner.span().end];
        let offset = TextSize::new(start as u32);
        self.state.pos += text.len();

        let kind = match result {
            Ok(t) => t.into(),
            Err(()) => {
                self.errors.push(SyntaxError::new(
                    format!("unexpected character sequence `{}`", text),
                    TextRange::at(offset, TextSize::of(text)),
                    ErrorCode::E0101,
                ));
                SyntaxKind::ERROR_TOKEN
            }
        };

        Some(Token { kind, text, offset })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let valid = self.state.valid_tokens();
        if let Some(token) =
            scanner::next_token(self.input, &mut self.state, valid, &mut self.errors)
        {
            return Some(token);
        }
        self.fallback()
    }
}

/// Tokenize an entire input, returning the token stream and any lexical
/// diagnostics. The concatenated token texts always reconstruct the input.
pub fn tokenize(input: &str) -> (Vec<Token<'_>>, Vec<SyntaxError>) {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    for token in lexer.by_ref() {
        tokens.push(token);
    }
    (tokens, lexer.finish())
}

/// Logos token enum - the grammar-declared terminal patterns.
///
/// `/*`, `#`, `"`, `$` and `\`-newline never reach these patterns; the
/// external scanner claims them first.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    DeprecatedComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexNumber,

    #[regex(r"[0-9]+\.[0-9]+")]
    FloatNumber,

    #[regex(r"[0-9]+")]
    IntNumber,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("=~")]
    EqTilde,

    #[token("!~")]
    BangTilde,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,

    // =========================================================================
    // KEYWORDS (longest match wins in logos)
    // =========================================================================
    #[token("if")]
    IfKw,
    #[token("else")]
    ElseKw,
    #[token("while")]
    WhileKw,
    #[token("switch")]
    SwitchKw,
    #[token("case")]
    CaseKw,
    #[token("default")]
    DefaultKw,
    #[token("break")]
    BreakKw,
    #[token("return")]
    ReturnKw,
    #[token("exit")]
    ExitKw,
    #[token("drop")]
    DropKw,

    #[token("route")]
    RouteKw,
    #[token("request_route")]
    RequestRouteKw,
    #[token("reply_route")]
    ReplyRouteKw,
    #[token("onreply_route")]
    OnreplyRouteKw,
    #[token("failure_route")]
    FailureRouteKw,
    #[token("branch_route")]
    BranchRouteKw,
    #[token("onsend_route")]
    OnsendRouteKw,
    #[token("event_route")]
    EventRouteKw,

    #[token("loadmodule")]
    LoadmoduleKw,
    #[token("loadpath")]
    LoadpathKw,
    #[token("modparam")]
    ModparamKw,
    #[token("include_file")]
    IncludeFileKw,
    #[token("import_file")]
    ImportFileKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            Newline => SyntaxKind::NEWLINE,
            DeprecatedComment => SyntaxKind::DEPRECATED_COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            HexNumber | FloatNumber | IntNumber => SyntaxKind::NUMBER,

            // Multi-char punctuation
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            EqTilde => SyntaxKind::EQ_TILDE,
            BangTilde => SyntaxKind::BANG_TILDE,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,

            // Single-char punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Bang => SyntaxKind::BANG,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,

            // Keywords
            IfKw => SyntaxKind::IF_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            WhileKw => SyntaxKind::WHILE_KW,
            SwitchKw => SyntaxKind::SWITCH_KW,
            CaseKw => SyntaxKind::CASE_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            BreakKw => SyntaxKind::BREAK_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            ExitKw => SyntaxKind::EXIT_KW,
            DropKw => SyntaxKind::DROP_KW,

            RouteKw => SyntaxKind::ROUTE_KW,
            RequestRouteKw => SyntaxKind::REQUEST_ROUTE_KW,
            ReplyRouteKw => SyntaxKind::REPLY_ROUTE_KW,
            OnreplyRouteKw => SyntaxKind::ONREPLY_ROUTE_KW,
            FailureRouteKw => SyntaxKind::FAILURE_ROUTE_KW,
            BranchRouteKw => SyntaxKind::BRANCH_ROUTE_KW,
            OnsendRouteKw => SyntaxKind::ONSEND_ROUTE_KW,
            EventRouteKw => SyntaxKind::EVENT_ROUTE_KW,

            LoadmoduleKw => SyntaxKind::LOADMODULE_KW,
            LoadpathKw => SyntaxKind::LOADPATH_KW,
            ModparamKw => SyntaxKind::MODPARAM_KW,
            IncludeFileKw => SyntaxKind::INCLUDE_FILE_KW,
            ImportFileKw => SyntaxKind::IMPORT_FILE_KW,
        }
    }
}
