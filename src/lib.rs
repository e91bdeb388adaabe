//! # Sprig
//!
//! A small SQL front end: a lexer and a backtracking parser for a subset of
//! SQL (`SELECT`, `INSERT`, `CREATE TABLE`), producing a typed syntax tree
//! that a downstream executor consumes through the [`Backend`] trait.
//!
//! ```
//! let ast = sprig::parse("SELECT id, name FROM users WHERE age = 23;").unwrap();
//! assert_eq!(ast.len(), 1);
//! assert_eq!(ast.to_string(), "SELECT id, name FROM users WHERE age = 23;");
//! ```

pub mod error;
pub mod types;
pub mod sql;
pub mod backend;

pub use backend::{execute, Backend, Outcome, ResultColumn, Results};
pub use error::{Result, SprigError};
pub use sql::ast::{Ast, Statement};
pub use sql::lexer::lex;
pub use sql::parser::{parse, Parser, ParserOptions};
pub use sql::token::{Location, Token, TokenKind};
pub use types::{ColumnType, Value};
