//! SQL front-end for Sprig.
//!
//! This module contains the token model, the lexer (tokenizer), abstract
//! syntax tree (AST) definitions, and a backtracking recursive-descent parser
//! that transforms raw SQL text into a structured AST for a downstream
//! executor.

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;

pub use ast::*;
pub use lexer::{lex, Lexer};
pub use parser::{parse, Parser, ParserOptions};
pub use token::{Keyword, Location, Symbol, Token, TokenKind};
