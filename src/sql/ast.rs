//! Abstract syntax tree definitions for Sprig SQL.
//!
//! Every statement parsed by the [`super::parser::Parser`] is represented as a
//! tree of the types defined here. Leaves keep the [`Token`] they were parsed
//! from, so downstream consumers can still report source locations.
//!
//! Every node implements `Display`, rendering SQL text that parses back to an
//! equal tree (up to token locations).

use std::fmt;

use crate::sql::token::{Token, TokenKind};

/// The result of one parse call: statements in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ast {
    pub statements: Vec<Statement>,
}

impl Ast {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl IntoIterator for Ast {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;
    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

/// A top-level SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    CreateTable(CreateTableStatement),
}

/// A `SELECT` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectStatement {
    pub items: Vec<SelectItem>,
    pub from: Option<FromItem>,
    pub where_clause: Option<Expression>,
}

/// A single item in the SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// A bare `*`.
    Wildcard,
    /// An expression, optionally aliased (`expr AS alias`).
    Expression {
        expression: Expression,
        alias: Option<Token>,
    },
}

/// The table named in a `FROM` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromItem {
    pub table: Token,
}

/// An `INSERT INTO t VALUES (...)` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: Token,
    pub values: Vec<Expression>,
}

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    pub name: Token,
    pub columns: Vec<ColumnDefinition>,
}

/// A column definition inside `CREATE TABLE`. `datatype` is a keyword token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: Token,
    pub datatype: Token,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// An expression node.
///
/// Binary chains are right-nested in source order with no operator
/// precedence: `a = 1 AND b` is `a = (1 AND b)`. Only parentheses group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(Token),
    Binary(BinaryExpression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub operator: Token,
}

impl Expression {
    pub fn binary(left: Expression, operator: Token, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            left: Box::new(left),
            right: Box::new(right),
            operator,
        })
    }

    /// Tokens in scan order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            Expression::Literal(token) => out.push(token),
            Expression::Binary(binary) => {
                binary.left.collect_tokens(out);
                out.push(&binary.operator);
                binary.right.collect_tokens(out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Keywords are printed uppercase, everything else as the token renders.
fn write_word(f: &mut fmt::Formatter<'_>, token: &Token) -> fmt::Result {
    if token.kind == TokenKind::Keyword {
        f.write_str(&token.value.to_ascii_uppercase())
    } else {
        write!(f, "{token}")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(token) => write!(f, "{token}"),
            Expression::Binary(binary) => {
                // Right nesting is what the grammar produces without
                // parentheses, so only a compound left side needs them.
                match binary.left.as_ref() {
                    left @ Expression::Binary(_) => write!(f, "({left})")?,
                    left => write!(f, "{left}")?,
                }
                f.write_str(" ")?;
                write_word(f, &binary.operator)?;
                write!(f, " {}", binary.right)
            }
        }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItem::Wildcard => f.write_str("*"),
            SelectItem::Expression { expression, alias } => {
                write!(f, "{expression}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {alias}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.name)?;
        write_word(f, &self.datatype)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(select) => {
                f.write_str("SELECT")?;
                if !select.items.is_empty() {
                    f.write_str(" ")?;
                    comma_list(f, &select.items)?;
                }
                if let Some(from) = &select.from {
                    write!(f, " FROM {}", from.table)?;
                }
                if let Some(filter) = &select.where_clause {
                    write!(f, " WHERE {filter}")?;
                }
                Ok(())
            }
            Statement::Insert(insert) => {
                write!(f, "INSERT INTO {} VALUES (", insert.table)?;
                comma_list(f, &insert.values)?;
                f.write_str(")")
            }
            Statement::CreateTable(create) => {
                write!(f, "CREATE TABLE {} (", create.name)?;
                comma_list(f, &create.columns)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Ast {
    /// One statement per line, each terminated by `;`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{statement};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::token::{Keyword, Location, Symbol};

    fn ident(name: &str) -> Expression {
        Expression::Literal(Token::new(TokenKind::Identifier, name, Location::default()))
    }

    fn num(value: &str) -> Expression {
        Expression::Literal(Token::new(TokenKind::Numeric, value, Location::default()))
    }

    #[test]
    fn binary_expression_renders_keyword_operators_uppercase() {
        let expr = Expression::binary(
            ident("a"),
            Token::keyword(Keyword::And),
            Expression::binary(ident("b"), Token::symbol(Symbol::Eq), num("1")),
        );
        assert_eq!(expr.to_string(), "a AND b = 1");
    }

    #[test]
    fn compound_left_operand_is_parenthesized() {
        let expr = Expression::binary(
            Expression::binary(ident("age"), Token::symbol(Symbol::Eq), num("23")),
            Token::keyword(Keyword::Or),
            ident("admin"),
        );
        assert_eq!(expr.to_string(), "(age = 23) OR admin");
    }

    #[test]
    fn tokens_are_listed_in_scan_order() {
        let expr = Expression::binary(num("1"), Token::symbol(Symbol::Plus), num("2"));
        let values: Vec<&str> = expr.tokens().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, ["1", "+", "2"]);
    }

    #[test]
    fn statements_render_as_sql() {
        let create = Statement::CreateTable(CreateTableStatement {
            name: Token::new(TokenKind::Identifier, "users", Location::default()),
            columns: vec![ColumnDefinition {
                name: Token::new(TokenKind::Identifier, "id", Location::default()),
                datatype: Token::keyword(Keyword::Int),
            }],
        });
        let select = Statement::Select(SelectStatement {
            items: vec![
                SelectItem::Wildcard,
                SelectItem::Expression {
                    expression: ident("id"),
                    alias: Some(Token::new(TokenKind::Identifier, "Key", Location::default())),
                },
            ],
            from: Some(FromItem {
                table: Token::new(TokenKind::Identifier, "users", Location::default()),
            }),
            where_clause: None,
        });
        let ast = Ast {
            statements: vec![create, select],
        };
        assert_eq!(
            ast.to_string(),
            "CREATE TABLE users (id INT);\nSELECT *, id AS \"Key\" FROM users;"
        );
    }

    #[test]
    fn empty_ast() {
        let ast = Ast::default();
        assert!(ast.is_empty());
        assert_eq!(ast.to_string(), "");
    }
}
