//! Token model shared by the lexer and the parser.
//!
//! A [`Token`] is a `(kind, value, location)` triple. The value is the
//! canonicalized lexeme: keywords and unquoted identifiers are lowercased,
//! string contents are escape-decoded. Grammar rules compare tokens with
//! [`Token::matches`], which ignores the location.

use std::fmt;

/// Zero-based position of a token in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub const fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }

    /// The location immediately after `ch`.
    pub(crate) fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Location {
                line: self.line + 1,
                column: 0,
            }
        } else {
            Location {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.line, self.column)
    }
}

/// The lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    String,
    Numeric,
    Boolean,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Numeric => "numeric",
            TokenKind::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Reserved words. `True` and `False` lex as [`TokenKind::Boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    Where,
    Insert,
    Into,
    Values,
    Create,
    Table,
    As,
    And,
    Or,
    Int,
    Text,
    Bool,
    Boolean,
    True,
    False,
}

impl Keyword {
    /// Every keyword, longest spelling first so that a shorter keyword never
    /// shadows a longer one sharing its prefix.
    pub const ALL: [Keyword; 17] = [
        Keyword::Boolean,
        Keyword::Select,
        Keyword::Insert,
        Keyword::Values,
        Keyword::Create,
        Keyword::Where,
        Keyword::Table,
        Keyword::False,
        Keyword::From,
        Keyword::Into,
        Keyword::Text,
        Keyword::Bool,
        Keyword::True,
        Keyword::And,
        Keyword::Int,
        Keyword::As,
        Keyword::Or,
    ];

    /// Canonical (lowercase) spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Select => "select",
            Keyword::From => "from",
            Keyword::Where => "where",
            Keyword::Insert => "insert",
            Keyword::Into => "into",
            Keyword::Values => "values",
            Keyword::Create => "create",
            Keyword::Table => "table",
            Keyword::As => "as",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Int => "int",
            Keyword::Text => "text",
            Keyword::Bool => "bool",
            Keyword::Boolean => "boolean",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }

    /// The token kind this keyword lexes to.
    pub fn kind(self) -> TokenKind {
        match self {
            Keyword::True | Keyword::False => TokenKind::Boolean,
            _ => TokenKind::Keyword,
        }
    }
}

/// Punctuation and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Asterisk,
    Eq,
    Neq,
    Neq2,
    Gt,
    Gte,
    Lt,
    Lte,
    Concat,
    Plus,
    Minus,
}

impl Symbol {
    /// Every symbol, multi-character spellings first.
    pub const ALL: [Symbol; 15] = [
        Symbol::Neq2,
        Symbol::Lte,
        Symbol::Gte,
        Symbol::Neq,
        Symbol::Concat,
        Symbol::LeftParen,
        Symbol::RightParen,
        Symbol::Comma,
        Symbol::Semicolon,
        Symbol::Asterisk,
        Symbol::Eq,
        Symbol::Gt,
        Symbol::Lt,
        Symbol::Plus,
        Symbol::Minus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::LeftParen => "(",
            Symbol::RightParen => ")",
            Symbol::Comma => ",",
            Symbol::Semicolon => ";",
            Symbol::Asterisk => "*",
            Symbol::Eq => "=",
            Symbol::Neq => "!=",
            Symbol::Neq2 => "<>",
            Symbol::Gt => ">",
            Symbol::Gte => ">=",
            Symbol::Lt => "<",
            Symbol::Lte => "<=",
            Symbol::Concat => "||",
            Symbol::Plus => "+",
            Symbol::Minus => "-",
        }
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A single lexical unit.
///
/// The derived `PartialEq` is structural and includes the location; grammar
/// rules use [`Token::matches`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Token {
            kind,
            value: value.into(),
            location,
        }
    }

    /// An unlocated token for `keyword`, used as a grammar expectation.
    pub fn keyword(keyword: Keyword) -> Self {
        Token::new(keyword.kind(), keyword.as_str(), Location::default())
    }

    /// An unlocated token for `symbol`, used as a grammar expectation.
    pub fn symbol(symbol: Symbol) -> Self {
        Token::new(TokenKind::Symbol, symbol.as_str(), Location::default())
    }

    /// Compares kind and value, ignoring where either token was scanned.
    pub fn matches(&self, other: &Token) -> bool {
        self.kind == other.kind && self.value == other.value
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == keyword.kind() && self.value == keyword.as_str()
    }
}

impl fmt::Display for Token {
    /// Renders the token as it could appear in source text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "'{}'", self.value.replace('\'', "''")),
            TokenKind::Identifier if needs_quoting(&self.value) => {
                write!(f, "\"{}\"", self.value.replace('"', "\"\""))
            }
            _ => f.write_str(&self.value),
        }
    }
}

/// Whether an identifier value would not survive a round trip unquoted.
fn needs_quoting(name: &str) -> bool {
    let starts_ok = name.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    !starts_ok
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '$' || c == '_')
        || Keyword::ALL.iter().any(|k| k.as_str() == name)
}
