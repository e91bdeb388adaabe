//! Typed vocabulary shared with downstream executors.
//!
//! This module provides:
//! - [`ColumnType`]: the column types a `CREATE TABLE` may declare, resolved
//!   from the datatype keyword of a [`ColumnDefinition`].
//! - [`Value`]: a single cell of a result set.

use std::fmt;

use crate::error::{Result, SprigError};
use crate::sql::ast::ColumnDefinition;
use crate::sql::token::{Keyword, Token};

// ---------------------------------------------------------------------------
// ColumnType
// ---------------------------------------------------------------------------

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Text,
    Bool,
}

impl ColumnType {
    /// Resolves a datatype keyword token (`int`, `text`, `bool`, `boolean`).
    ///
    /// # Errors
    ///
    /// Returns [`SprigError::UnsupportedColumnType`] for any other token, for
    /// example `CREATE TABLE t (x TABLE)`, which the grammar accepts because
    /// the datatype position takes any keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::sql::{Keyword, Token};
    /// use sprig::types::ColumnType;
    ///
    /// let ty = ColumnType::from_datatype(&Token::keyword(Keyword::Boolean)).unwrap();
    /// assert_eq!(ty, ColumnType::Bool);
    /// assert!(ColumnType::from_datatype(&Token::keyword(Keyword::From)).is_err());
    /// ```
    pub fn from_datatype(token: &Token) -> Result<ColumnType> {
        if token.is_keyword(Keyword::Int) {
            Ok(ColumnType::Int)
        } else if token.is_keyword(Keyword::Text) {
            Ok(ColumnType::Text)
        } else if token.is_keyword(Keyword::Bool) || token.is_keyword(Keyword::Boolean) {
            Ok(ColumnType::Bool)
        } else {
            Err(SprigError::UnsupportedColumnType {
                location: token.location,
                name: token.value.clone(),
            })
        }
    }

    /// Shorthand for [`ColumnType::from_datatype`] on a column definition.
    pub fn of(column: &ColumnDefinition) -> Result<ColumnType> {
        Self::from_datatype(&column.datatype)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Text => write!(f, "TEXT"),
            ColumnType::Bool => write!(f, "BOOL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single cell returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
    Bool(bool),
}

impl Value {
    /// The column type this value belongs to, or `None` for [`Value::Null`].
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(ColumnType::Int),
            Value::Text(_) => Some(ColumnType::Text),
            Value::Bool(_) => Some(ColumnType::Bool),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Formats a value for CLI output. Text is printed without quotes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::token::{Location, TokenKind};

    #[test]
    fn test_column_type_from_datatype() {
        let cases = [
            (Keyword::Int, ColumnType::Int),
            (Keyword::Text, ColumnType::Text),
            (Keyword::Bool, ColumnType::Bool),
            (Keyword::Boolean, ColumnType::Bool),
        ];
        for (keyword, expected) in cases {
            assert_eq!(ColumnType::from_datatype(&Token::keyword(keyword)).unwrap(), expected);
        }
    }

    #[test]
    fn test_column_type_rejects_other_keywords() {
        let token = Token::new(TokenKind::Keyword, "table", Location::new(0, 19));
        let err = ColumnType::from_datatype(&token).unwrap_err();
        assert_eq!(
            err,
            SprigError::UnsupportedColumnType {
                location: Location::new(0, 19),
                name: "table".into(),
            }
        );
    }

    #[test]
    fn test_column_type_rejects_identifiers_spelled_like_types() {
        let token = Token::new(TokenKind::Identifier, "int", Location::default());
        assert!(ColumnType::from_datatype(&token).is_err());
    }

    #[test]
    fn test_column_type_of_definition() {
        let column = ColumnDefinition {
            name: Token::new(TokenKind::Identifier, "id", Location::default()),
            datatype: Token::keyword(Keyword::Int),
        };
        assert_eq!(ColumnType::of(&column).unwrap(), ColumnType::Int);
    }

    #[test]
    fn test_value_column_type() {
        assert_eq!(Value::Null.column_type(), None);
        assert_eq!(Value::Int(1).column_type(), Some(ColumnType::Int));
        assert_eq!(Value::from("x").column_type(), Some(ColumnType::Text));
        assert_eq!(Value::Bool(false).column_type(), Some(ColumnType::Bool));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::from("hello").to_string(), "hello");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(ColumnType::Bool.to_string(), "BOOL");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(7i64), Value::Int(7));
        assert_eq!(Value::from(String::from("a")), Value::Text("a".into()));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert!(Value::from(None::<bool>).is_null());
        assert_eq!(Value::from(Some("b")), Value::Text("b".into()));
    }
}
