//! Backtracking recursive-descent parser for Sprig SQL.
//!
//! The entry point is [`Parser::parse`], which tokenizes the input and then
//! parses one or more semicolon-terminated statements into an [`Ast`].
//!
//! Every grammar rule is a method of the shape `(cursor) -> Step<T>`: on
//! success it yields the node and the cursor just past it, on failure it
//! yields a failure and the caller still holds the cursor it started
//! from. A failed rule consumes nothing, so statement dispatch can try
//! SELECT, INSERT and CREATE TABLE from the same start.
//!
//! Binary expressions carry no precedence. Operators are tried in a fixed
//! order and chains nest to the right, so `a = 1 AND b` is `a = (1 AND b)`;
//! parentheses are the only way to group.

use std::slice;
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::error::{Result, SprigError};
use crate::sql::ast::*;
use crate::sql::lexer::Lexer;
use crate::sql::token::{Keyword, Location, Symbol, Token, TokenKind};

/// Parse `sql` with the default [`ParserOptions`].
pub fn parse(sql: &str) -> Result<Ast> {
    Parser::parse(sql)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for a parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum parenthesis nesting inside one expression. Operands of a flat
    /// chain such as `a OR b OR c` stay at the depth of the chain itself.
    pub max_depth: usize,
    /// Maximum binary operators in one flat chain.
    pub max_chain: usize,
}

impl ParserOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;
    pub const DEFAULT_MAX_CHAIN: usize = 4096;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_chain: Self::DEFAULT_MAX_CHAIN,
        }
    }
}

// ---------------------------------------------------------------------------
// Combinator results
// ---------------------------------------------------------------------------

/// Why a grammar rule did not match. Positions are token indices.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    /// The rule does not apply; alternatives may still be tried.
    Mismatch {
        position: usize,
        expected: &'static str,
    },
    /// The nesting limit was hit. Never retried by an alternative.
    TooDeep { position: usize },
    /// The chain length limit was hit. Never retried either.
    TooLong { position: usize },
}

impl Failure {
    fn mismatch(position: usize, expected: &'static str) -> Self {
        Failure::Mismatch { position, expected }
    }

    fn position(&self) -> usize {
        match self {
            Failure::Mismatch { position, .. }
            | Failure::TooDeep { position }
            | Failure::TooLong { position } => *position,
        }
    }

    fn is_fatal(&self) -> bool {
        !matches!(self, Failure::Mismatch { .. })
    }
}

/// A parsed node plus the cursor just past it.
type Step<T> = std::result::Result<(T, usize), Failure>;

type StatementRule<'a> = fn(&Parser<'a>, usize) -> Step<Statement>;

/// The binary operators, in the order they are tried.
fn binary_operators() -> &'static [Token] {
    static OPERATORS: OnceLock<Vec<Token>> = OnceLock::new();
    OPERATORS.get_or_init(|| {
        vec![
            Token::keyword(Keyword::And),
            Token::keyword(Keyword::Or),
            Token::symbol(Symbol::Eq),
            Token::symbol(Symbol::Neq),
            Token::symbol(Symbol::Neq2),
            Token::symbol(Symbol::Gt),
            Token::symbol(Symbol::Gte),
            Token::symbol(Symbol::Lt),
            Token::symbol(Symbol::Lte),
            Token::symbol(Symbol::Concat),
            Token::symbol(Symbol::Plus),
            Token::symbol(Symbol::Minus),
        ]
    })
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A recursive-descent parser over an immutable token slice.
///
/// The parser holds no mutable state; every rule receives and returns a
/// cursor, so one `Parser` can be queried from any position.
pub struct Parser<'a> {
    tokens: &'a [Token],
    /// Reported for failures past the last token.
    end: Location,
    options: ParserOptions,
}

impl<'a> Parser<'a> {
    /// Lex and parse a SQL string into a list of statements.
    pub fn parse(sql: &str) -> Result<Ast> {
        Self::parse_with(sql, ParserOptions::default())
    }

    /// Like [`Parser::parse`] with explicit options.
    pub fn parse_with(sql: &str, options: ParserOptions) -> Result<Ast> {
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize()?;
        Parser::new(&tokens)
            .with_end_location(lexer.location())
            .with_options(options)
            .parse_ast()
    }

    /// A parser over already-lexed tokens. Failures at end of input are
    /// located at the last token unless [`Parser::with_end_location`] is set.
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            end: tokens.last().map(|t| t.location).unwrap_or_default(),
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_end_location(mut self, end: Location) -> Self {
        self.end = end;
        self
    }

    /// Parse every token into statements, each followed by at least one `;`.
    ///
    /// Either all statements parse or the call fails; no partial [`Ast`].
    pub fn parse_ast(&self) -> Result<Ast> {
        let semicolon = Token::symbol(Symbol::Semicolon);
        let mut statements = Vec::new();
        let mut cursor = 0;

        while cursor < self.tokens.len() {
            let (statement, next) = self
                .parse_statement(cursor)
                .map_err(|failure| self.error(failure))?;
            statements.push(statement);
            cursor = next;

            let mut delimited = false;
            while let Ok((_, next)) = self.parse_token(cursor, &semicolon) {
                cursor = next;
                delimited = true;
            }
            if !delimited {
                return Err(self.error(Failure::mismatch(
                    cursor,
                    "expected semicolon delimiter between statements",
                )));
            }
        }

        debug!(statements = statements.len(), "parsed source");
        Ok(Ast { statements })
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    /// Turn a combinator failure into a located error.
    fn error(&self, failure: Failure) -> SprigError {
        let token = self.tokens.get(failure.position());
        let location = token.map_or(self.end, |t| t.location);
        match failure {
            Failure::Mismatch { expected, .. } => SprigError::Parse {
                location,
                expected: expected.to_string(),
                found: token.map(|t| t.value.clone()),
            },
            Failure::TooDeep { .. } => SprigError::NestingTooDeep {
                location,
                limit: self.options.max_depth,
            },
            Failure::TooLong { .. } => SprigError::ExpressionTooLong {
                location,
                limit: self.options.max_chain,
            },
        }
    }

    fn parse_token(&self, cursor: usize, expected: &Token) -> Step<&'a Token> {
        match self.tokens.get(cursor) {
            Some(token) if token.matches(expected) => Ok((token, cursor + 1)),
            _ => Err(Failure::mismatch(cursor, "unexpected token")),
        }
    }

    fn parse_token_kind(&self, cursor: usize, kind: TokenKind) -> Step<&'a Token> {
        match self.tokens.get(cursor) {
            Some(token) if token.kind == kind => Ok((token, cursor + 1)),
            _ => Err(Failure::mismatch(cursor, "unexpected token kind")),
        }
    }

    fn expect_token(
        &self,
        cursor: usize,
        expected: &Token,
        message: &'static str,
    ) -> Step<&'a Token> {
        self.parse_token(cursor, expected)
            .map_err(|_| Failure::mismatch(cursor, message))
    }

    fn expect_kind(
        &self,
        cursor: usize,
        kind: TokenKind,
        message: &'static str,
    ) -> Step<&'a Token> {
        self.parse_token_kind(cursor, kind)
            .map_err(|_| Failure::mismatch(cursor, message))
    }

    /// End of input, or the token at `cursor` is one of `delimiters`.
    fn at_delimiter(&self, cursor: usize, delimiters: &[Token]) -> bool {
        match self.tokens.get(cursor) {
            Some(token) => delimiters.iter().any(|d| token.matches(d)),
            None => true,
        }
    }

    // =======================================================================
    // Expressions
    // =======================================================================

    fn parse_literal_expression(&self, cursor: usize) -> Step<Expression> {
        const LITERAL_KINDS: [TokenKind; 4] = [
            TokenKind::Identifier,
            TokenKind::Numeric,
            TokenKind::String,
            TokenKind::Boolean,
        ];
        LITERAL_KINDS
            .iter()
            .find_map(|&kind| self.parse_token_kind(cursor, kind).ok())
            .map(|(token, next)| (Expression::Literal(token.clone()), next))
            .ok_or(Failure::mismatch(cursor, "expected expression"))
    }

    /// A literal, or a parenthesized expression one level deeper.
    fn parse_operand(&self, cursor: usize, delimiters: &[Token], depth: usize) -> Step<Expression> {
        let left_paren = Token::symbol(Symbol::LeftParen);
        let Ok((_, after_paren)) = self.parse_token(cursor, &left_paren) else {
            return self.parse_literal_expression(cursor);
        };
        if depth >= self.options.max_depth {
            return Err(Failure::TooDeep { position: cursor });
        }

        let right_paren = Token::symbol(Symbol::RightParen);
        let inner_delimiters = [delimiters, slice::from_ref(&right_paren)].concat();
        let (inner, next) = self.parse_expression(after_paren, &inner_delimiters, depth + 1)?;
        let (_, next) = self.expect_token(next, &right_paren, "expected closing paren")?;
        Ok((inner, next))
    }

    /// Operands separated by binary operators, up to a delimiter (not
    /// consumed). The chain is collected flat and folded from the right, so
    /// `a op b op c` becomes `a op (b op c)`.
    fn parse_expression(
        &self,
        cursor: usize,
        delimiters: &[Token],
        depth: usize,
    ) -> Step<Expression> {
        let (first, mut cursor) = self.parse_operand(cursor, delimiters, depth)?;
        let mut rest: Vec<(Token, Expression)> = Vec::new();

        while !self.at_delimiter(cursor, delimiters) {
            let (operator, next) = binary_operators()
                .iter()
                .find_map(|op| self.parse_token(cursor, op).ok())
                .ok_or(Failure::mismatch(cursor, "expected binary operator"))?;
            if rest.len() >= self.options.max_chain {
                return Err(Failure::TooLong { position: cursor });
            }
            let (operand, next) = self.parse_operand(next, delimiters, depth)?;
            rest.push((operator.clone(), operand));
            cursor = next;
        }

        let Some((mut operator, mut tail)) = rest.pop() else {
            return Ok((first, cursor));
        };
        while let Some((previous, operand)) = rest.pop() {
            tail = Expression::binary(operand, operator, tail);
            operator = previous;
        }
        Ok((Expression::binary(first, operator, tail), cursor))
    }

    /// Comma-separated expressions up to (not including) a delimiter.
    fn parse_expressions(&self, cursor: usize, delimiters: &[Token]) -> Step<Vec<Expression>> {
        let comma = Token::symbol(Symbol::Comma);
        let item_delimiters = [delimiters, slice::from_ref(&comma)].concat();
        let mut cursor = cursor;
        let mut expressions = Vec::new();

        while !self.at_delimiter(cursor, delimiters) {
            if !expressions.is_empty() {
                (_, cursor) = self.expect_token(cursor, &comma, "expected comma")?;
            }
            let (expression, next) = self.parse_expression(cursor, &item_delimiters, 0)?;
            expressions.push(expression);
            cursor = next;
        }

        Ok((expressions, cursor))
    }

    // =======================================================================
    // SELECT
    // =======================================================================

    fn parse_select_items(&self, cursor: usize, delimiters: &[Token]) -> Step<Vec<SelectItem>> {
        let comma = Token::symbol(Symbol::Comma);
        let asterisk = Token::symbol(Symbol::Asterisk);
        let as_keyword = Token::keyword(Keyword::As);
        let expression_delimiters = [delimiters, &[comma.clone(), as_keyword.clone()][..]].concat();
        let mut cursor = cursor;
        let mut items = Vec::new();

        while !self.at_delimiter(cursor, delimiters) {
            if !items.is_empty() {
                (_, cursor) = self.expect_token(cursor, &comma, "expected comma")?;
            }

            if let Ok((_, next)) = self.parse_token(cursor, &asterisk) {
                items.push(SelectItem::Wildcard);
                cursor = next;
                continue;
            }

            let (expression, next) = self.parse_expression(cursor, &expression_delimiters, 0)?;
            cursor = next;

            let mut alias = None;
            if let Ok((_, next)) = self.parse_token(cursor, &as_keyword) {
                let (name, next) =
                    self.expect_kind(next, TokenKind::Identifier, "expected identifier after AS")?;
                alias = Some(name.clone());
                cursor = next;
            }

            items.push(SelectItem::Expression { expression, alias });
        }

        Ok((items, cursor))
    }

    fn parse_from_item(&self, cursor: usize) -> Step<FromItem> {
        let (table, next) = self.expect_kind(cursor, TokenKind::Identifier, "expected table name")?;
        Ok((FromItem { table: table.clone() }, next))
    }

    fn parse_select_statement(&self, cursor: usize) -> Step<SelectStatement> {
        let semicolon = Token::symbol(Symbol::Semicolon);
        let from_keyword = Token::keyword(Keyword::From);
        let where_keyword = Token::keyword(Keyword::Where);

        let select_keyword = Token::keyword(Keyword::Select);
        let (_, cursor) = self.expect_token(cursor, &select_keyword, "expected SELECT")?;
        let (items, mut cursor) =
            self.parse_select_items(cursor, &[from_keyword.clone(), semicolon.clone()])?;
        let mut select = SelectStatement {
            items,
            ..SelectStatement::default()
        };

        if let Ok((_, next)) = self.parse_token(cursor, &from_keyword) {
            let (from, next) = self.parse_from_item(next)?;
            select.from = Some(from);
            cursor = next;
        }

        if let Ok((_, next)) = self.parse_token(cursor, &where_keyword) {
            let (filter, next) = self.parse_expression(next, slice::from_ref(&semicolon), 0)?;
            select.where_clause = Some(filter);
            cursor = next;
        }

        Ok((select, cursor))
    }

    // =======================================================================
    // INSERT
    // =======================================================================

    fn parse_insert_statement(&self, cursor: usize) -> Step<InsertStatement> {
        let left_paren = Token::symbol(Symbol::LeftParen);
        let right_paren = Token::symbol(Symbol::RightParen);

        let (_, cursor) =
            self.expect_token(cursor, &Token::keyword(Keyword::Insert), "expected INSERT")?;
        let (_, cursor) =
            self.expect_token(cursor, &Token::keyword(Keyword::Into), "expected INTO")?;
        let (table, cursor) =
            self.expect_kind(cursor, TokenKind::Identifier, "expected table name")?;
        let (_, cursor) =
            self.expect_token(cursor, &Token::keyword(Keyword::Values), "expected VALUES")?;
        let (_, cursor) = self.expect_token(cursor, &left_paren, "expected left paren")?;
        let (values, cursor) = self.parse_expressions(cursor, slice::from_ref(&right_paren))?;
        let (_, cursor) = self.expect_token(cursor, &right_paren, "expected right paren")?;

        Ok((
            InsertStatement {
                table: table.clone(),
                values,
            },
            cursor,
        ))
    }

    // =======================================================================
    // CREATE TABLE
    // =======================================================================

    fn parse_column_definitions(
        &self,
        cursor: usize,
        delimiter: &Token,
    ) -> Step<Vec<ColumnDefinition>> {
        let comma = Token::symbol(Symbol::Comma);
        let mut cursor = cursor;
        let mut columns = Vec::new();

        while !self.at_delimiter(cursor, slice::from_ref(delimiter)) {
            if !columns.is_empty() {
                (_, cursor) = self.expect_token(cursor, &comma, "expected comma")?;
            }
            let (name, next) =
                self.expect_kind(cursor, TokenKind::Identifier, "expected column name")?;
            let (datatype, next) =
                self.expect_kind(next, TokenKind::Keyword, "expected column type")?;
            columns.push(ColumnDefinition {
                name: name.clone(),
                datatype: datatype.clone(),
            });
            cursor = next;
        }

        Ok((columns, cursor))
    }

    fn parse_create_table_statement(&self, cursor: usize) -> Step<CreateTableStatement> {
        let left_paren = Token::symbol(Symbol::LeftParen);
        let right_paren = Token::symbol(Symbol::RightParen);

        let (_, cursor) =
            self.expect_token(cursor, &Token::keyword(Keyword::Create), "expected CREATE")?;
        let (_, cursor) =
            self.expect_token(cursor, &Token::keyword(Keyword::Table), "expected TABLE")?;
        let (name, cursor) =
            self.expect_kind(cursor, TokenKind::Identifier, "expected table name")?;
        let (_, cursor) = self.expect_token(cursor, &left_paren, "expected left parenthesis")?;
        let (columns, cursor) = self.parse_column_definitions(cursor, &right_paren)?;
        let (_, cursor) = self.expect_token(cursor, &right_paren, "expected right parenthesis")?;

        Ok((
            CreateTableStatement {
                name: name.clone(),
                columns,
            },
            cursor,
        ))
    }

    // =======================================================================
    // Statement dispatch
    // =======================================================================

    /// Try each statement form from the same `cursor`; the first that parses
    /// wins. When all fail, the failure that got furthest is reported, or
    /// "expected statement" if none got past the first token.
    fn parse_statement(&self, cursor: usize) -> Step<Statement> {
        let rules: [(&str, StatementRule<'a>); 3] = [
            ("select", |p, c| {
                p.parse_select_statement(c)
                    .map(|(s, next)| (Statement::Select(s), next))
            }),
            ("insert", |p, c| {
                p.parse_insert_statement(c)
                    .map(|(s, next)| (Statement::Insert(s), next))
            }),
            ("create table", |p, c| {
                p.parse_create_table_statement(c)
                    .map(|(s, next)| (Statement::CreateTable(s), next))
            }),
        ];

        let mut furthest = Failure::mismatch(cursor, "expected statement");
        for (name, rule) in rules {
            match rule(self, cursor) {
                Ok(parsed) => return Ok(parsed),
                Err(failure) if failure.is_fatal() => return Err(failure),
                Err(failure) => {
                    trace!(
                        statement = name,
                        position = failure.position(),
                        "statement form rejected"
                    );
                    if failure.position() > furthest.position() {
                        furthest = failure;
                    }
                }
            }
        }
        Err(furthest)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
