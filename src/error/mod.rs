//! Unified error handling for Sprig.
//!
//! This module defines [`SprigError`], the single error type returned by the
//! public entry points of the SQL front end: the lexer, the parser, and the
//! column-type resolution used by downstream consumers.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, SprigError>`.

use thiserror::Error;

use crate::sql::token::Location;

/// The canonical error type for all Sprig operations.
///
/// Every variant carries the [`Location`] of the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SprigError {
    /// No lexical rule matched at `location`. Unterminated strings and quoted
    /// identifiers are reported here too, located at their opening quote.
    #[error("{location}: {reason} '{found}'")]
    Lex {
        location: Location,
        found: char,
        reason: &'static str,
    },

    /// The token stream did not match the grammar. `found` is the value of
    /// the token at the failure point, or `None` at end of input.
    #[error("{location}: {expected}, got: {}", .found.as_deref().unwrap_or("end of input"))]
    Parse {
        location: Location,
        expected: String,
        found: Option<String>,
    },

    /// Expression nesting exceeded the configured recursion limit.
    #[error("{location}: expression nesting exceeds the limit of {limit}")]
    NestingTooDeep { location: Location, limit: usize },

    /// A single binary operator chain ran past the configured length.
    #[error("{location}: expression has more than {limit} binary operators")]
    ExpressionTooLong { location: Location, limit: usize },

    /// A column was declared with a type keyword that has no column type.
    #[error("{location}: unsupported column type: {name}")]
    UnsupportedColumnType { location: Location, name: String },
}

impl SprigError {
    /// Location of the input that caused the error.
    pub fn location(&self) -> Location {
        match self {
            SprigError::Lex { location, .. }
            | SprigError::Parse { location, .. }
            | SprigError::NestingTooDeep { location, .. }
            | SprigError::ExpressionTooLong { location, .. }
            | SprigError::UnsupportedColumnType { location, .. } => *location,
        }
    }
}

/// A specialised [`Result`] type for Sprig operations.
pub type Result<T> = std::result::Result<T, SprigError>;
