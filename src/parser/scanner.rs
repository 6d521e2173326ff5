//! External scanner for context-sensitive lexical classes
//!
//! The declarative terminal patterns in [`lexer`](super::lexer) cannot
//! express everything the configuration language needs: block comments
//! nest, `#` starts either a comment or a `#!` directive, and string
//! literals contain pseudo-variable sub-tokens. Those classes live here,
//! behind the token-request protocol the tree builder drives:
//! `next_token(input, state, valid_set)` returns a recognized token or
//! `None` to fall back to the declarative terminals.
//!
//! All scanning state is scoped to one [`LexerState`] value per parse;
//! nothing here is process-global, so concurrent parses stay independent.
//! The scanner never fails: an unrecognizable byte sequence becomes an
//! [`ERROR_TOKEN`](SyntaxKind::ERROR_TOKEN) consumed up to the nearest
//! recovery point (newline or end of input), plus a recorded diagnostic.

use rowan::TextSize;
use text_size::TextRange;

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::Token;
use super::syntax_kind::SyntaxKind;
use super::token_set::TokenSet;

/// Token kinds produced by this scanner.
///
/// The language descriptor must declare each of these exactly once as an
/// external token; the grammar compiler checks the two lists against each
/// other.
pub const SCANNER_TOKENS: &[SyntaxKind] = &[
    SyntaxKind::BLOCK_COMMENT,
    SyntaxKind::LINE_COMMENT,
    SyntaxKind::DIRECTIVE,
    SyntaxKind::STRING_OPEN,
    SyntaxKind::STRING_CONTENT,
    SyntaxKind::STRING_CLOSE,
    SyntaxKind::DOLLAR_ESCAPE,
    SyntaxKind::PVAR,
    SyntaxKind::LINE_CONTINUATION,
    SyntaxKind::ERROR_TOKEN,
];

/// Lexer mode: which lexical classes are currently recognizable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexMode {
    /// Ordinary code position
    Default,
    /// Between the quotes of a string literal
    InString,
}

/// Per-parse scanning state, created at parse start and discarded at parse
/// end. Never shared across parses.
#[derive(Debug, Clone)]
pub struct LexerState {
    /// Current byte position
    pub pos: usize,
    /// Open block-comment nesting depth (non-zero only mid-scan, or after
    /// an unterminated comment reached end of input)
    pub comment_depth: u32,
    /// Current mode
    pub mode: LexMode,
}

impl LexerState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            comment_depth: 0,
            mode: LexMode::Default,
        }
    }

    /// The token kinds the scanner may produce in the current mode.
    ///
    /// This is the "currently valid token kinds" set of the token-request
    /// protocol; the driver passes it back into [`next_token`].
    pub fn valid_tokens(&self) -> TokenSet {
        match self.mode {
            LexMode::Default => TokenSet::new(&[
                SyntaxKind::BLOCK_COMMENT,
                SyntaxKind::LINE_COMMENT,
                SyntaxKind::DIRECTIVE,
                SyntaxKind::STRING_OPEN,
                SyntaxKind::PVAR,
                SyntaxKind::LINE_CONTINUATION,
                SyntaxKind::ERROR_TOKEN,
            ]),
            LexMode::InString => TokenSet::new(&[
                SyntaxKind::STRING_CONTENT,
                SyntaxKind::STRING_CLOSE,
                SyntaxKind::DOLLAR_ESCAPE,
                SyntaxKind::PVAR,
                SyntaxKind::ERROR_TOKEN,
            ]),
        }
    }
}

impl Default for LexerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Try to recognize one external token at the current position.
///
/// Returns `None` when no external class applies (the caller falls back to
/// the declarative terminals) or when the input is exhausted.
pub fn next_token<'a>(
    input: &'a str,
    state: &mut LexerState,
    valid: TokenSet,
    errors: &mut Vec<SyntaxError>,
) -> Option<Token<'a>> {
    if state.pos >= input.len() {
        return None;
    }
    match state.mode {
        LexMode::InString => Some(string_part(input, state, valid, errors)),
        LexMode::Default => default_mode(input, state, valid, errors),
    }
}

fn default_mode<'a>(
    input: &'a str,
    state: &mut LexerState,
    valid: TokenSet,
    errors: &mut Vec<SyntaxError>,
) -> Option<Token<'a>> {
    let bytes = input.as_bytes();
    let pos = state.pos;
    match bytes[pos] {
        b'/' if bytes.get(pos + 1) == Some(&b'*') && valid.contains(SyntaxKind::BLOCK_COMMENT) => {
            Some(block_comment(input, state, errors))
        }
        b'#' if bytes.get(pos + 1) == Some(&b'!') && valid.contains(SyntaxKind::DIRECTIVE) => {
            Some(directive(input, state))
        }
        b'#' if valid.contains(SyntaxKind::LINE_COMMENT) => Some(line_comment(input, state)),
        b'"' if valid.contains(SyntaxKind::STRING_OPEN) => {
            state.mode = LexMode::InString;
            Some(emit(input, state, SyntaxKind::STRING_OPEN, pos + 1))
        }
        b'$' if valid.contains(SyntaxKind::PVAR) => Some(pseudo_variable(input, state, errors)),
        b'\\' if valid.contains(SyntaxKind::LINE_CONTINUATION) => match &bytes[pos + 1..] {
            [b'\n', ..] => Some(emit(input, state, SyntaxKind::LINE_CONTINUATION, pos + 2)),
            [b'\r', b'\n', ..] => Some(emit(input, state, SyntaxKind::LINE_CONTINUATION, pos + 3)),
            _ => None,
        },
        _ => None,
    }
}

/// Block comment with nesting: `/* a /* b */ c */` is one token.
/// An unterminated comment becomes an error token spanning to end of input.
fn block_comment<'a>(
    input: &'a str,
    state: &mut LexerState,
    errors: &mut Vec<SyntaxError>,
) -> Token<'a> {
    let bytes = input.as_bytes();
    let start = state.pos;
    let mut pos = start + 2;
    state.comment_depth = 1;

    while pos < bytes.len() && state.comment_depth > 0 {
        if bytes[pos] == b'/' && bytes.get(pos + 1) == Some(&b'*') {
            state.comment_depth += 1;
            pos += 2;
        } else if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
            state.comment_depth -= 1;
            pos += 2;
        } else {
            pos += 1;
        }
    }

    if state.comment_depth > 0 {
        let range = TextRange::new(TextSize::new(start as u32), TextSize::new(pos as u32));
        errors.push(SyntaxError::new(
            "unterminated block comment",
            range,
            ErrorCode::E0103,
        ));
        state.comment_depth = 0;
        return emit_from(input, state, SyntaxKind::ERROR_TOKEN, start, pos);
    }
    emit_from(input, state, SyntaxKind::BLOCK_COMMENT, start, pos)
}

/// A `#!` directive line. The token runs to the end of the line and keeps
/// going across `\`-newline continuations; the trailing newline itself is
/// not part of the token.
fn directive<'a>(input: &'a str, state: &mut LexerState) -> Token<'a> {
    let bytes = input.as_bytes();
    let start = state.pos;
    let mut pos = start + 2;
    while pos < bytes.len() {
        if bytes[pos] == b'\n' {
            let continued = match bytes[..pos].last() {
                Some(b'\\') => true,
                Some(b'\r') => pos >= 2 && bytes[pos - 2] == b'\\',
                _ => false,
            };
            if !continued {
                break;
            }
        }
        pos += 1;
    }
    emit_from(input, state, SyntaxKind::DIRECTIVE, start, pos)
}

/// A `#` comment running to the end of the line (the `#!` case is handled
/// before this is tried).
fn line_comment<'a>(input: &'a str, state: &mut LexerState) -> Token<'a> {
    let bytes = input.as_bytes();
    let start = state.pos;
    let mut pos = start + 1;
    while pos < bytes.len() && bytes[pos] != b'\n' {
        pos += 1;
    }
    emit_from(input, state, SyntaxKind::LINE_COMMENT, start, pos)
}

/// A pseudo-variable: `$ru`, `$$`, `$avp(s:x)`, `$(hdr(From)[0]{s.len})`.
///
/// Parenthesized forms are matched with a balance counter. A form left
/// open at a newline or end of input becomes an error token consumed up to
/// that anchor.
fn pseudo_variable<'a>(
    input: &'a str,
    state: &mut LexerState,
    errors: &mut Vec<SyntaxError>,
) -> Token<'a> {
    let bytes = input.as_bytes();
    let start = state.pos;
    let mut pos = start + 1;

    match bytes.get(pos) {
        // `$$` is the escaped-dollar pseudo-variable
        Some(b'$') => return emit_from(input, state, SyntaxKind::PVAR, start, pos + 1),
        Some(b'(') => {
            return match balanced_parens(bytes, pos) {
                Ok(end) => emit_from(input, state, SyntaxKind::PVAR, start, end),
                Err(end) => {
                    pvar_error(start, end, errors);
                    emit_from(input, state, SyntaxKind::ERROR_TOKEN, start, end)
                }
            };
        }
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {
            while pos < bytes.len()
                && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
            {
                pos += 1;
            }
            // `$avp(...)`: an immediately following `(` belongs to the variable
            if bytes.get(pos) == Some(&b'(') {
                return match balanced_parens(bytes, pos) {
                    Ok(end) => emit_from(input, state, SyntaxKind::PVAR, start, end),
                    Err(end) => {
                        pvar_error(start, end, errors);
                        emit_from(input, state, SyntaxKind::ERROR_TOKEN, start, end)
                    }
                };
            }
            emit_from(input, state, SyntaxKind::PVAR, start, pos)
        }
        _ => {
            let range = TextRange::new(
                TextSize::new(start as u32),
                TextSize::new((start + 1) as u32),
            );
            errors.push(SyntaxError::new(
                "stray `$` outside a pseudo-variable",
                range,
                ErrorCode::E0101,
            ));
            emit_from(input, state, SyntaxKind::ERROR_TOKEN, start, start + 1)
        }
    }
}

/// Scan a balanced `(...)` group starting at the opening parenthesis.
/// `Ok(end)` is one past the closing parenthesis; `Err(end)` stops at a
/// newline or end of input with the group still open.
fn balanced_parens(bytes: &[u8], open: usize) -> Result<usize, usize> {
    let mut depth = 0u32;
    let mut pos = open;
    while pos < bytes.len() {
        match bytes[pos] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos + 1);
                }
            }
            b'\n' => return Err(pos),
            _ => {}
        }
        pos += 1;
    }
    Err(pos)
}

fn pvar_error(start: usize, end: usize, errors: &mut Vec<SyntaxError>) {
    let range = TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32));
    errors.push(SyntaxError::new(
        "unterminated pseudo-variable",
        range,
        ErrorCode::E0104,
    ));
}

/// One token inside a string literal: literal content, `$$`, an embedded
/// pseudo-variable, or the closing quote. Content may span newlines; a
/// string still open at end of input becomes an error token to the end.
fn string_part<'a>(
    input: &'a str,
    state: &mut LexerState,
    valid: TokenSet,
    errors: &mut Vec<SyntaxError>,
) -> Token<'a> {
    let bytes = input.as_bytes();
    let start = state.pos;

    if bytes[start] == b'"' && valid.contains(SyntaxKind::STRING_CLOSE) {
        state.mode = LexMode::Default;
        return emit(input, state, SyntaxKind::STRING_CLOSE, start + 1);
    }
    if bytes[start] == b'$' {
        match bytes.get(start + 1) {
            Some(b'$') if valid.contains(SyntaxKind::DOLLAR_ESCAPE) => {
                return emit(input, state, SyntaxKind::DOLLAR_ESCAPE, start + 2);
            }
            Some(b)
                if (b.is_ascii_alphabetic() || *b == b'_' || *b == b'(')
                    && valid.contains(SyntaxKind::PVAR) =>
            {
                return pseudo_variable(input, state, errors);
            }
            // a `$` that starts no variable is ordinary text
            _ => {}
        }
    }

    let mut pos = start;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => break,
            b'$' => {
                let interpolates = matches!(
                    bytes.get(pos + 1),
                    Some(b) if b.is_ascii_alphabetic() || *b == b'_' || *b == b'(' || *b == b'$'
                );
                if interpolates && pos > start {
                    break;
                }
                pos += 1;
                if interpolates {
                    // lone leading `$` was re-dispatched above; keep going
                    continue;
                }
            }
            // `\"` and `\\` stay inside the content
            b'\\' if pos + 1 < bytes.len() => pos += 2,
            _ => pos += 1,
        }
    }

    if pos >= bytes.len() {
        let range = TextRange::new(TextSize::new(start as u32), TextSize::new(pos as u32));
        errors.push(SyntaxError::new(
            "unterminated string literal",
            range,
            ErrorCode::E0102,
        ));
        state.mode = LexMode::Default;
        return emit_from(input, state, SyntaxKind::ERROR_TOKEN, start, pos);
    }
    emit_from(input, state, SyntaxKind::STRING_CONTENT, start, pos)
}

fn emit<'a>(input: &'a str, state: &mut LexerState, kind: SyntaxKind, end: usize) -> Token<'a> {
    emit_from(input, state, kind, state.pos, end)
}

fn emit_from<'a>(
    input: &'a str,
    state: &mut LexerState,
    kind: SyntaxKind,
    start: usize,
    end: usize,
) -> Token<'a> {
    debug_assert!(end > start, "scanner must consume input");
    state.pos = end;
    Token {
        kind,
        text: &input[start..end],
        offset: TextSize::new(start as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(input: &str) -> (Vec<(SyntaxKind, &str)>, Vec<SyntaxError>) {
        let mut state = LexerState::new();
        let mut errors = Vec::new();
        let mut out = Vec::new();
        while state.pos < input.len() {
            let valid = state.valid_tokens();
            match next_token(input, &mut state, valid, &mut errors) {
                Some(tok) => out.push((tok.kind, tok.text)),
                None => {
                    // skip one byte the way the declarative fallback would
                    state.pos += 1;
                }
            }
        }
        (out, errors)
    }

    #[test]
    fn test_nested_block_comment_is_one_token() {
        let (tokens, errors) = scan_all("/* a /* b */ c */");
        assert_eq!(tokens, vec![(SyntaxKind::BLOCK_COMMENT, "/* a /* b */ c */")]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unnested_close_ends_comment_early() {
        let (tokens, _) = scan_all("/* a */ c */");
        assert_eq!(tokens[0], (SyntaxKind::BLOCK_COMMENT, "/* a */"));
    }

    #[test]
    fn test_unterminated_comment_is_error_to_eof() {
        let (tokens, errors) = scan_all("/* a /* b */ tail");
        assert_eq!(tokens, vec![(SyntaxKind::ERROR_TOKEN, "/* a /* b */ tail")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::E0103);
    }

    #[test]
    fn test_directive_vs_comment() {
        let (tokens, _) = scan_all("#!define X 1\n# plain comment\n");
        assert_eq!(tokens[0], (SyntaxKind::DIRECTIVE, "#!define X 1"));
        assert_eq!(tokens[1], (SyntaxKind::LINE_COMMENT, "# plain comment"));
    }

    #[test]
    fn test_directive_line_continuation() {
        let (tokens, _) = scan_all("#!define LONG a \\\n  b\nx");
        assert_eq!(tokens[0], (SyntaxKind::DIRECTIVE, "#!define LONG a \\\n  b"));
    }

    #[test]
    fn test_pseudo_variable_forms() {
        let (tokens, errors) = scan_all("$ru $avp(s:x) $(hdr(From)[0]{s.len}) $$");
        let pvars: Vec<_> = tokens
            .iter()
            .filter(|(k, _)| *k == SyntaxKind::PVAR)
            .map(|(_, t)| *t)
            .collect();
        assert_eq!(pvars, vec!["$ru", "$avp(s:x)", "$(hdr(From)[0]{s.len})", "$$"]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unterminated_pvar_stops_at_newline() {
        let (tokens, errors) = scan_all("$avp(s:x\nok");
        assert_eq!(tokens[0], (SyntaxKind::ERROR_TOKEN, "$avp(s:x"));
        assert_eq!(errors[0].code, ErrorCode::E0104);
    }

    #[test]
    fn test_string_with_interpolation() {
        let (tokens, errors) = scan_all("\"hello $name world\"");
        assert_eq!(
            tokens,
            vec![
                (SyntaxKind::STRING_OPEN, "\""),
                (SyntaxKind::STRING_CONTENT, "hello "),
                (SyntaxKind::PVAR, "$name"),
                (SyntaxKind::STRING_CONTENT, " world"),
                (SyntaxKind::STRING_CLOSE, "\""),
            ]
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_string_escapes_stay_in_content() {
        let (tokens, _) = scan_all(r#""a \" b \\ c""#);
        assert_eq!(tokens[1], (SyntaxKind::STRING_CONTENT, r#"a \" b \\ c"#));
        assert_eq!(tokens[2].0, SyntaxKind::STRING_CLOSE);
    }

    #[test]
    fn test_dollar_escape_in_string() {
        let (tokens, _) = scan_all("\"a $$ b\"");
        let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
        assert!(kinds.contains(&SyntaxKind::DOLLAR_ESCAPE));
    }

    #[test]
    fn test_plain_dollar_is_content() {
        let (tokens, errors) = scan_all("\"a $5 fee\"");
        assert_eq!(tokens[1], (SyntaxKind::STRING_CONTENT, "a $5 fee"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unterminated_string_is_error_to_eof() {
        let (tokens, errors) = scan_all("\"abc");
        assert_eq!(tokens[0], (SyntaxKind::STRING_OPEN, "\""));
        assert_eq!(tokens[1], (SyntaxKind::ERROR_TOKEN, "abc"));
        assert_eq!(errors[0].code, ErrorCode::E0102);
    }

    #[test]
    fn test_multiline_string_content() {
        let (tokens, errors) = scan_all("\"line one\nline two\"");
        assert_eq!(tokens[1], (SyntaxKind::STRING_CONTENT, "line one\nline two"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_line_continuation() {
        let (tokens, _) = scan_all("\\\nx");
        assert_eq!(tokens[0], (SyntaxKind::LINE_CONTINUATION, "\\\n"));
    }

    #[test]
    fn test_scanner_respects_valid_set() {
        // With DIRECTIVE excluded, `#!` is not recognized as a directive
        let mut state = LexerState::new();
        let mut errors = Vec::new();
        let valid = TokenSet::new(&[SyntaxKind::LINE_COMMENT]);
        let tok = next_token("#!define X 1", &mut state, valid, &mut errors).unwrap();
        assert_eq!(tok.kind, SyntaxKind::LINE_COMMENT);
    }
}
