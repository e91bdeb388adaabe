//! Hand-written SQL tokenizer for Sprig.
//!
//! The [`Lexer`] takes raw SQL text and produces a `Vec<Token>`. At every
//! position it skips whitespace and then tries a fixed list of recognizers in
//! priority order: keyword, symbol, string, numeric, identifier. The first one
//! that matches emits a token at the current [`Location`]; if none matches the
//! whole call fails with [`SprigError::Lex`].
//!
//! Each recognizer is a pure function of `(source, cursor)` returning the token
//! and the cursor just past it, so they can be exercised in isolation.

use tracing::debug;

use crate::error::{Result, SprigError};
use crate::sql::token::{Keyword, Location, Symbol, Token, TokenKind};

/// A scan position: byte offset into the source plus its line and column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub(crate) offset: usize,
    pub(crate) location: Location,
}

impl Cursor {
    fn bump(self, ch: char) -> Self {
        Cursor {
            offset: self.offset + ch.len_utf8(),
            location: self.location.advance(ch),
        }
    }

    fn advance_over(self, text: &str) -> Self {
        text.chars().fold(self, Cursor::bump)
    }
}

type Recognizer = fn(&str, Cursor) -> Option<(Token, Cursor)>;

/// Tried in order at each position; the first match wins.
const RECOGNIZERS: [Recognizer; 5] = [
    lex_keyword,
    lex_symbol,
    lex_string,
    lex_numeric,
    lex_identifier,
];

/// Tokenize `source` in one call.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// A hand-written SQL tokenizer.
///
/// Create one with [`Lexer::new`], then call [`Lexer::tokenize`] to obtain
/// the full token stream. After tokenizing, [`Lexer::location`] is the
/// end-of-input position.
pub struct Lexer<'a> {
    source: &'a str,
    cursor: Cursor,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given SQL text.
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            cursor: Cursor::default(),
        }
    }

    /// Current scan position.
    pub fn location(&self) -> Location {
        self.cursor.location
    }

    /// Tokenize the remaining input.
    ///
    /// No partial token list is returned on failure.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(ch) = peek(self.source, self.cursor) else {
                break;
            };

            let recognized = RECOGNIZERS
                .iter()
                .find_map(|recognize| recognize(self.source, self.cursor));
            match recognized {
                Some((token, next)) => {
                    tokens.push(token);
                    self.cursor = next;
                }
                None => return Err(self.error(ch)),
            }
        }
        debug!(tokens = tokens.len(), end = %self.cursor.location, "lexed source");
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = peek(self.source, self.cursor) {
            if !ch.is_whitespace() {
                break;
            }
            self.cursor = self.cursor.bump(ch);
        }
    }

    /// Explain why nothing matched at the cursor, judging by the characters there.
    fn error(&self, found: char) -> SprigError {
        let next = self.source[self.cursor.offset + found.len_utf8()..].chars().next();
        let reason = match found {
            '\'' => "unterminated string literal",
            '"' => "unterminated quoted identifier",
            c if c.is_ascii_digit() => "malformed numeric literal",
            '.' if next.is_some_and(|c| c.is_ascii_digit()) => "malformed numeric literal",
            _ => "unrecognized character",
        };
        SprigError::Lex {
            location: self.cursor.location,
            found,
            reason,
        }
    }
}

// -- helpers ----------------------------------------------------------------

fn peek(source: &str, cursor: Cursor) -> Option<char> {
    source[cursor.offset..].chars().next()
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '$' || ch == '_'
}

// -- recognizers ------------------------------------------------------------

/// Case-insensitive keyword match that is not the prefix of a longer word.
pub(crate) fn lex_keyword(source: &str, cursor: Cursor) -> Option<(Token, Cursor)> {
    let rest = &source[cursor.offset..];
    for keyword in Keyword::ALL {
        let text = keyword.as_str();
        let Some(candidate) = rest.get(..text.len()) else {
            continue;
        };
        if !candidate.eq_ignore_ascii_case(text) {
            continue;
        }
        if rest[text.len()..]
            .chars()
            .next()
            .is_some_and(is_identifier_continue)
        {
            continue;
        }
        let token = Token::new(keyword.kind(), text, cursor.location);
        return Some((token, cursor.advance_over(candidate)));
    }
    None
}

pub(crate) fn lex_symbol(source: &str, cursor: Cursor) -> Option<(Token, Cursor)> {
    let rest = &source[cursor.offset..];
    Symbol::ALL
        .iter()
        .find(|symbol| rest.starts_with(symbol.as_str()))
        .map(|symbol| {
            let text = symbol.as_str();
            (
                Token::new(TokenKind::Symbol, text, cursor.location),
                cursor.advance_over(text),
            )
        })
}

/// Single-quoted string; `''` inside decodes to one quote.
pub(crate) fn lex_string(source: &str, cursor: Cursor) -> Option<(Token, Cursor)> {
    lex_delimited(source, cursor, '\'', TokenKind::String)
}

/// Scans `delimiter ... delimiter`, treating a doubled delimiter as an escaped
/// one. Fails if the closing delimiter is missing.
fn lex_delimited(
    source: &str,
    cursor: Cursor,
    delimiter: char,
    kind: TokenKind,
) -> Option<(Token, Cursor)> {
    if peek(source, cursor)? != delimiter {
        return None;
    }
    let mut current = cursor.bump(delimiter);
    let mut value = String::new();
    loop {
        let ch = peek(source, current)?;
        current = current.bump(ch);
        if ch != delimiter {
            value.push(ch);
            continue;
        }
        if peek(source, current) == Some(delimiter) {
            value.push(delimiter);
            current = current.bump(delimiter);
            continue;
        }
        return Some((Token::new(kind, value, cursor.location), current));
    }
}

/// Numerals: `[digits][.[digits]][(e|E)[+|-]digits]` with at least one
/// mantissa digit. The character after the numeral must not extend it.
pub(crate) fn lex_numeric(source: &str, cursor: Cursor) -> Option<(Token, Cursor)> {
    let rest = &source[cursor.offset..];
    let bytes = rest.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = digits_from(0);
    let mut mantissa_digits = end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        end = digits_from(fraction_start);
        mantissa_digits += end - fraction_start;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        end += 1;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let exponent_start = end;
        end = digits_from(exponent_start);
        if end == exponent_start {
            return None;
        }
    }

    if let Some(&next) = bytes.get(end) {
        if next.is_ascii_alphanumeric() || matches!(next, b'.' | b'_' | b'$') {
            return None;
        }
    }

    let text = &rest[..end];
    Some((
        Token::new(TokenKind::Numeric, text, cursor.location),
        cursor.advance_over(text),
    ))
}

/// Unquoted identifiers are lowercased; double-quoted ones are kept verbatim.
pub(crate) fn lex_identifier(source: &str, cursor: Cursor) -> Option<(Token, Cursor)> {
    if let Some(quoted) = lex_delimited(source, cursor, '"', TokenKind::Identifier) {
        return Some(quoted);
    }

    let rest = &source[cursor.offset..];
    if !rest.chars().next()?.is_ascii_alphabetic() {
        return None;
    }
    let end = rest
        .find(|ch: char| !is_identifier_continue(ch))
        .unwrap_or(rest.len());
    let text = &rest[..end];
    Some((
        Token::new(TokenKind::Identifier, text.to_ascii_lowercase(), cursor.location),
        cursor.advance_over(text),
    ))
}

// ===========================================================================
// Tests
// ===========================================================================
