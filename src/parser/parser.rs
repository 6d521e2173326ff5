//! Parser machinery for the Kamailio configuration language
//!
//! Builds a rowan GreenNode tree from tokens. The grammar itself lives in
//! [`grammar`](super::grammar); this module owns the token cursor, node
//! builder, error recovery, and the [`Parse`] result type.
//!
//! Errors never abort a parse: every input produces a tree whose leaves
//! concatenate back to the input, with malformed regions wrapped in
//! `ERROR` nodes.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::errors::{ErrorCode, SyntaxError};
use super::grammar;
use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;
use crate::language::{Language, language};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ranges of the error nodes and error tokens in the tree.
    ///
    /// Derived from the tree itself rather than the diagnostic list, for
    /// callers that only kept the tree around.
    pub fn error_ranges(&self) -> Vec<TextRange> {
        self.syntax()
            .descendants_with_tokens()
            .filter(|element| element.kind().is_error())
            .map(|element| element.text_range())
            .collect()
    }
}

/// Parse a configuration file into a CST.
///
/// Always returns a tree; lexical and syntactic problems are folded into
/// it as error tokens/nodes and reported through [`Parse::errors`]. Each
/// call uses a fresh lexer state, so independent parses may run on
/// separate threads against the shared language descriptor.
pub fn parse(input: &str) -> Parse {
    let (tokens, lex_errors) = tokenize(input);
    tracing::debug!(tokens = tokens.len(), "parsing configuration");
    let mut parser = Parser::new(&tokens, language());
    parser.errors.extend(lex_errors);
    grammar::config_file(&mut parser);
    let parse = parser.finish();
    tracing::debug!(errors = parse.errors.len(), "parse finished");
    parse
}

/// The parser state
pub(crate) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pub(crate) pos: usize,
    builder: GreenNodeBuilder<'static>,
    pub(crate) errors: Vec<SyntaxError>,
    pub(crate) lang: &'static Language,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token<'a>], lang: &'static Language) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            lang,
        }
    }

    pub(crate) fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    /// Kind at the cursor; `ERROR_TOKEN` past the end of input
    pub(crate) fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR_TOKEN)
    }

    pub(crate) fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind()) && !self.at_eof()
    }

    pub(crate) fn at_set(&self, set: TokenSet) -> bool {
        !self.at_eof() && set.contains(self.current_kind())
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// n-th non-trivia kind at or after the cursor (`n == 0` is the next
    /// meaningful token)
    pub(crate) fn nth(&self, n: usize) -> Option<SyntaxKind> {
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            if !kind.is_trivia() {
                if count == n {
                    return Some(kind);
                }
                count += 1;
            }
            idx += 1;
        }
        None
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    pub(crate) fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(crate) fn bump_any(&mut self) {
        self.bump();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(
                format!("expected `{}`", kind.name()),
                ErrorCode::for_missing(kind),
            );
            false
        }
    }

    pub(crate) fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn current_range(&self) -> TextRange {
        self.current()
            .map(|t| t.range())
            .unwrap_or_else(|| {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.range().end())
                    .unwrap_or_else(|| TextSize::new(0));
                TextRange::empty(end)
            })
    }

    pub(crate) fn error(&mut self, message: impl Into<String>, code: ErrorCode) {
        let range = self.current_range();
        self.errors.push(SyntaxError::new(message, range, code));
    }

    /// Record an error and consume tokens into an `ERROR` node until one of
    /// the language's recovery anchors (or `extra`) comes up. Consumes at
    /// least one token when not already at an anchor, so callers always
    /// make progress.
    pub(crate) fn error_recover(
        &mut self,
        message: impl Into<String>,
        code: ErrorCode,
        extra: TokenSet,
    ) {
        self.error(message, code);
        let anchors = self.lang.recovery_anchors().union(extra);
        if self.at_eof() || self.at_set(anchors) {
            return;
        }
        self.builder.start_node(SyntaxKind::ERROR.into());
        while !self.at_eof() && !self.at_set(anchors) {
            self.bump_any();
        }
        self.builder.finish_node();
    }

    /// Wrap the current token alone in an `ERROR` node (used for lexical
    /// error tokens, which already span the malformed region)
    pub(crate) fn bump_error_token(&mut self) {
        self.builder.start_node(SyntaxKind::ERROR.into());
        self.bump();
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }
}
